//! Deck draw in-browser WASM server.
//!
//! Exports `handle_request(method, path, query, body)` for the Service Worker
//! bridge to call. Uses `matchit` for URL routing — the same router
//! engine that powers Axum.
//!
//! The user loads up to four tables (characters, items, locations, quests),
//! picks one to draw from, and draws rows at random as expandable cards with
//! a marker tally. Everything lives in WASM memory for the browser session.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod deck;
pub mod routes;
pub mod table;

/// Process an HTTP-like request and return an HTML fragment.
///
/// Called from JavaScript (Web Worker) via wasm-bindgen.
///
/// # Arguments
/// * `method` — HTTP method (e.g., "GET", "POST")
/// * `path`   — URL path (e.g., "/api/deck/draw")
/// * `query`  — Query string (e.g., "?category=items")
/// * `body`   — Request body (form data, or JSON for bulk upload). Empty string for GET requests.
///
/// # Returns
/// An HTML string fragment suitable for HTMX to swap into the DOM
/// (JSON for `/api/deck/state`).
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    // Build the router. matchit compiles route patterns into a radix tree.
    let mut router = matchit::Router::new();

    router.insert("/api/deck/status", "deck_status").ok();
    router.insert("/api/deck/state", "deck_state").ok();
    router.insert("/api/deck/load", "deck_load").ok();
    router.insert("/api/deck/bulk", "deck_bulk").ok();
    router.insert("/api/deck/select", "deck_select").ok();
    router.insert("/api/deck/draw", "deck_draw").ok();
    router.insert("/api/deck/reshuffle", "deck_reshuffle").ok();
    router.insert("/api/deck/clear", "deck_clear").ok();
    router.insert("/api/deck/repeats", "deck_repeats").ok();
    router.insert("/api/deck/history", "deck_history").ok();
    router.insert("/api/deck/card", "deck_card").ok();
    router.insert("/api/roll", "roll").ok();

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            ("deck_status", "GET") => routes::deck::handle_status_get(query),
            ("deck_state", "GET") => routes::deck::handle_state_get(query),
            ("deck_history", "GET") => routes::history::handle_history_get(query),
            ("roll", "GET") => routes::roll::handle_get(query),

            ("deck_load", "POST") => routes::upload::handle_load_post(body),
            ("deck_bulk", "POST") => routes::upload::handle_bulk_post(body),
            ("deck_select", "POST") => routes::deck::handle_select_post(body),
            ("deck_draw", "POST") => routes::deck::handle_draw_post(body),
            ("deck_reshuffle", "POST") => routes::deck::handle_reshuffle_post(body),
            ("deck_clear", "POST") => routes::deck::handle_clear_post(body),
            ("deck_repeats", "POST") => routes::deck::handle_repeats_post(body),
            ("deck_card", "POST") => routes::history::handle_card_post(body),

            _ => method_not_allowed(),
        },
        Err(_) => not_found(),
    }
}

/// Replace the engine with one built from a JSON [`config::DeckConfig`].
///
/// Called once by the worker at start-up; an empty string means defaults.
/// Returns "ok" or an error message.
#[wasm_bindgen]
pub fn configure(config_json: &str) -> String {
    let config = if config_json.trim().is_empty() {
        config::DeckConfig::default()
    } else {
        match serde_json::from_str::<config::DeckConfig>(config_json) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "rejected engine config");
                return format!("error: Invalid deck config JSON: {}", e);
            }
        }
    };
    deck::state::reset_engine(&config);
    "ok".to_string()
}

fn not_found() -> String {
    r#"<span class="text-red-700">404 — route not found</span>"#.to_string()
}

fn method_not_allowed() -> String {
    r#"<span class="text-red-700">405 — method not allowed</span>"#.to_string()
}
