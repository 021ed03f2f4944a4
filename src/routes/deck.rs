//! `/api/deck/*` routes — category selection, drawing, reshuffling, and the
//! deck control panel.
//!
//! The panel shows how many rows each category holds, which category is
//! being drawn from, and how many cards are left. The Draw button is rendered
//! disabled whenever the engine would refuse the draw, which is the only way
//! an empty or exhausted deck is surfaced to the user.

use crate::deck::Category;
use crate::deck::state::{snapshot_json, with_engine, with_engine_mut};
use crate::routes::history::render_history;
use crate::routes::util::{category_param, error_fragment, get_param, parse_form_body};
use tracing::warn;

const BUTTON: &str = "bg-amber-800 hover:bg-amber-900 text-amber-50 font-bold py-2 px-4 rounded text-sm disabled:opacity-40 disabled:cursor-not-allowed";

/// Render the deck control panel. With `oob`, the fragment carries
/// `hx-swap-oob` so it can ride along with another route's response.
pub fn render_panel(oob: bool) -> String {
    with_engine(|engine| {
        let selected = engine.selected();
        let mut h = String::with_capacity(2048);
        h.push_str(&format!(
            r#"<div id="deck-panel" class="p-3 text-amber-900"{}>"#,
            if oob { r#" hx-swap-oob="true""# } else { "" }
        ));

        // Loaded tables
        h.push_str(r#"<ul class="grid grid-cols-2 gap-1 text-sm mb-3">"#);
        for c in Category::ALL {
            let n = engine.table_len(c);
            let status = if n == 0 {
                r#"<span class="opacity-60">empty</span>"#.to_string()
            } else {
                format!("{} {}", n, if n == 1 { "row" } else { "rows" })
            };
            h.push_str(&format!(
                r#"<li><strong>{}</strong>: {}</li>"#,
                c.label(),
                status
            ));
        }
        h.push_str(r#"</ul>"#);

        // Category selector
        h.push_str(r#"<label class="block text-xs font-bold mb-1" for="deckCategory">Draw From</label>"#);
        h.push_str(r##"<select id="deckCategory" name="category" hx-post="/api/deck/select" hx-trigger="change" hx-target="#deck-panel" hx-swap="outerHTML" class="w-full border rounded px-2 py-1 text-sm mb-3">"##);
        for c in Category::ALL {
            h.push_str(&format!(
                r#"<option value="{}"{}>{}</option>"#,
                c.as_str(),
                if c == selected { " selected" } else { "" },
                c.label()
            ));
        }
        h.push_str(r#"</select>"#);

        // Deck size / remaining
        let size = engine.table_len(selected);
        if engine.allow_repeats() {
            h.push_str(&format!(
                r#"<p class="text-sm mb-2">Deck: <strong>{}</strong> &middot; repeats allowed</p>"#,
                size
            ));
        } else {
            h.push_str(&format!(
                r#"<p class="text-sm mb-2">Deck: <strong>{}</strong> &middot; Remaining: <strong>{}</strong></p>"#,
                size,
                engine.remaining()
            ));
        }

        // Repeats toggle
        h.push_str(&format!(
            r##"<label class="flex items-center gap-2 text-sm mb-3"><input type="checkbox" id="allowRepeats"{} onclick="htmx.ajax('POST', '/api/deck/repeats', {{values: {{allow: this.checked}}, target: '#deck-panel', swap: 'outerHTML'}})">Allow repeats</label>"##,
            if engine.allow_repeats() { " checked" } else { "" }
        ));

        // Actions
        h.push_str(r#"<div class="flex gap-2">"#);
        h.push_str(&format!(
            r##"<button hx-post="/api/deck/draw" hx-target="#deck-history" hx-swap="outerHTML" class="flex-1 {}"{}>Draw</button>"##,
            BUTTON,
            if engine.can_draw() { "" } else { " disabled" }
        ));
        h.push_str(&format!(
            r##"<button hx-post="/api/deck/reshuffle" hx-target="#deck-panel" hx-swap="outerHTML" class="{}"{}>Reshuffle</button>"##,
            BUTTON,
            if size == 0 { " disabled" } else { "" }
        ));
        h.push_str(&format!(
            r##"<button hx-post="/api/deck/clear" hx-target="#deck-history" hx-swap="outerHTML" class="{}"{}>Clear</button>"##,
            BUTTON,
            if engine.history().is_empty() { " disabled" } else { "" }
        ));
        h.push_str(r#"</div>"#);

        h.push_str(r#"</div>"#);
        h
    })
}

// ── GET /api/deck/status ───────────────────────────────────────────

pub fn handle_status_get(_query: &str) -> String {
    render_panel(false)
}

// ── GET /api/deck/state ────────────────────────────────────────────

/// Engine snapshot as JSON, for debugging and client-side tooling.
pub fn handle_state_get(_query: &str) -> String {
    snapshot_json()
}

// ── POST /api/deck/select ──────────────────────────────────────────

/// Handle POST /api/deck/select
/// Body: category={characters|items|locations|quests} (singular accepted)
pub fn handle_select_post(body: &str) -> String {
    let params = parse_form_body(body);
    match category_param(&params) {
        Some(category) => {
            with_engine_mut(|e| e.select_category(category));
            render_panel(false)
        }
        None => {
            warn!(body, "select with unknown category");
            error_fragment("Unknown or missing category")
        }
    }
}

// ── POST /api/deck/draw ────────────────────────────────────────────

/// Handle POST /api/deck/draw
/// Draws one card if the deck allows it. Returns the history plus an
/// out-of-band panel refresh so the remaining count stays current.
pub fn handle_draw_post(_body: &str) -> String {
    with_engine_mut(|e| {
        e.draw();
    });
    let mut html = render_history(false);
    html.push_str(&render_panel(true));
    html
}

// ── POST /api/deck/reshuffle ───────────────────────────────────────

pub fn handle_reshuffle_post(_body: &str) -> String {
    with_engine_mut(|e| e.reshuffle());
    render_panel(false)
}

// ── POST /api/deck/clear ───────────────────────────────────────────

/// Handle POST /api/deck/clear
/// Empties the history; the remaining pool is untouched.
pub fn handle_clear_post(_body: &str) -> String {
    with_engine_mut(|e| e.clear_history());
    let mut html = render_history(false);
    html.push_str(&render_panel(true));
    html
}

// ── POST /api/deck/repeats ─────────────────────────────────────────

/// Handle POST /api/deck/repeats
/// Body: allow={true|false}. Anything other than "true"/"on"/"1" turns
/// repeats off.
pub fn handle_repeats_post(body: &str) -> String {
    let params = parse_form_body(body);
    let allow = matches!(get_param(&params, "allow"), Some("true" | "on" | "1"));
    with_engine_mut(|e| e.set_allow_repeats(allow));
    render_panel(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeckConfig;
    use crate::deck::state::reset_engine;
    use crate::table::parse_table;

    fn setup() {
        reset_engine(&DeckConfig::seeded(5));
        let records = parse_table("name\nA\nB\nC\n").unwrap();
        with_engine_mut(|e| e.load_category(Category::Characters, records));
    }

    fn teardown() {
        reset_engine(&DeckConfig::default());
    }

    #[test]
    fn panel_shows_counts_and_selector() {
        setup();
        let html = handle_status_get("");
        assert!(html.contains("<strong>Characters</strong>: 3 rows"));
        assert!(html.contains(r#"<option value="characters" selected>"#));
        assert!(html.contains("Remaining: <strong>3</strong>"));
        assert!(html.contains(">Draw</button>"));
        assert!(!html.contains(" disabled>Draw</button>"));
        teardown();
    }

    #[test]
    fn draw_button_disabled_on_empty_deck() {
        reset_engine(&DeckConfig::seeded(1));
        let html = render_panel(false);
        assert!(html.contains(" disabled>Draw</button>"));
        teardown();
    }

    #[test]
    fn draw_returns_history_and_oob_panel() {
        setup();
        let html = handle_draw_post("");
        assert!(html.contains(r#"<div id="deck-history">"#));
        assert!(html.contains(r#"hx-swap-oob="true""#));
        assert!(html.contains("Remaining: <strong>2</strong>"));
        teardown();
    }

    #[test]
    fn exhausted_deck_disables_draw() {
        setup();
        for _ in 0..3 {
            handle_draw_post("");
        }
        let html = handle_draw_post("");
        assert!(html.contains("Remaining: <strong>0</strong>"));
        assert!(html.contains(" disabled>Draw</button>"));
        assert_eq!(with_engine(|e| e.history().len()), 3);

        let html = handle_reshuffle_post("");
        assert!(html.contains("Remaining: <strong>3</strong>"));
        teardown();
    }

    #[test]
    fn select_switches_category() {
        setup();
        let html = handle_select_post("category=quest");
        assert!(html.contains(r#"<option value="quests" selected>"#));
        assert!(html.contains(" disabled>Draw</button>"));
        assert!(handle_select_post("category=dragons").contains("Unknown or missing category"));
        assert_eq!(with_engine(|e| e.selected()), Category::Quests);
        teardown();
    }

    #[test]
    fn clear_empties_history_only() {
        setup();
        handle_draw_post("");
        let html = handle_clear_post("");
        assert!(html.contains("No cards drawn yet"));
        assert!(html.contains("Remaining: <strong>2</strong>"));
        teardown();
    }

    #[test]
    fn repeats_toggle() {
        setup();
        let html = handle_repeats_post("allow=true");
        assert!(html.contains("repeats allowed"));
        assert!(html.contains(r#"id="allowRepeats" checked"#));
        let html = handle_repeats_post("allow=false");
        assert!(html.contains("Remaining:"));
        teardown();
    }

    #[test]
    fn state_is_json() {
        setup();
        let json = handle_state_get("");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["selected"], "characters");
        assert_eq!(value["remaining"], 3);
        teardown();
    }
}
