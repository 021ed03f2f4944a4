//! `/api/deck/history` and `/api/deck/card` — the drawn-card list.
//!
//! Each card is an Alpine.js collapsible showing every field of the drawn
//! row, plus a manual marker tally with +/clear buttons and a dismiss button.
//! Card actions post back here and the whole list is re-rendered from the
//! engine.

use crate::config::MARKER_CEILING;
use crate::deck::DrawnCard;
use crate::deck::state::{with_engine, with_engine_mut};
use crate::routes::util::{error_fragment, escape_html, get_param, parse_form_body};
use tracing::warn;

/// Tally marks: one five-bundle glyph per five markers, then single strokes.
pub fn tally(count: u8) -> String {
    let mut s = String::new();
    for _ in 0..count / 5 {
        s.push('\u{1D378}'); // 𝍸
    }
    for _ in 0..count % 5 {
        s.push('\u{1D377}'); // 𝍷
    }
    s
}

fn card_button(id: &str, action: &str, label: &str, aria: &str, disabled: bool) -> String {
    format!(
        r##"<button hx-post="/api/deck/card" hx-vals='{{"id":"{id}","action":"{action}"}}' hx-target="#deck-history" hx-swap="outerHTML" class="px-2 py-0.5 rounded text-xs font-bold border border-amber-800 hover:bg-amber-100 disabled:opacity-40" aria-label="{aria}"{dis}>{label}</button>"##,
        id = escape_html(id),
        action = action,
        aria = aria,
        label = label,
        dis = if disabled { " disabled" } else { "" },
    )
}

fn render_card(card: &DrawnCard, open: bool) -> String {
    let id = card.id.as_str();
    let title = card
        .record
        .title()
        .map(escape_html)
        .unwrap_or_else(|| format!("Row {}", card.table_index + 1));

    let mut h = String::with_capacity(1024);
    h.push_str(&format!(
        r#"<div id="card-{}" class="bg-amber-50 rounded-lg shadow p-3 mb-2 text-amber-900" x-data="{{ open: {} }}">"#,
        escape_html(id),
        open
    ));

    // Header: title, category, row number, dismiss
    h.push_str(r#"<div class="flex items-center gap-2">"#);
    h.push_str(&format!(
        r#"<button @click="open = !open" class="flex-1 text-left font-bold cursor-pointer">{}</button>"#,
        title
    ));
    h.push_str(&format!(
        r#"<span class="text-xs opacity-70">{} #{}</span>"#,
        card.category.label(),
        card.table_index + 1
    ));
    h.push_str(&card_button(id, "dismiss", "&#x2715;", "Dismiss card", false));
    h.push_str(r#"</div>"#);

    // Body: every field of the row
    h.push_str(r#"<dl x-show="open" x-transition class="grid grid-cols-3 gap-x-2 text-sm mt-2">"#);
    for (key, value) in card.record.fields() {
        h.push_str(&format!(
            r#"<dt class="font-bold col-span-1">{}</dt><dd class="col-span-2 whitespace-pre-wrap">{}</dd>"#,
            escape_html(key),
            escape_html(value)
        ));
    }
    h.push_str(r#"</dl>"#);

    // Marker tally
    h.push_str(r#"<div class="flex items-center gap-2 mt-2">"#);
    h.push_str(&format!(
        r#"<span class="text-lg min-w-16" aria-label="{n} markers">{}</span><span class="text-xs">{n}/{max}</span>"#,
        tally(card.marker_count),
        n = card.marker_count,
        max = MARKER_CEILING
    ));
    h.push_str(&card_button(
        id,
        "mark",
        "+",
        "Add marker",
        card.marker_count >= MARKER_CEILING,
    ));
    h.push_str(&card_button(id, "unmark", "Clear", "Clear markers", card.marker_count == 0));
    h.push_str(r#"</div>"#);

    h.push_str(r#"</div>"#);
    h
}

/// Render the history container. With `oob`, the fragment carries
/// `hx-swap-oob` so it can ride along with another route's response.
pub fn render_history(oob: bool) -> String {
    with_engine(|engine| {
        let cards = engine.history();
        let mut h = String::with_capacity(256 + cards.len() * 1024);
        h.push_str(&format!(
            r#"<div id="deck-history"{}>"#,
            if oob { r#" hx-swap-oob="true""# } else { "" }
        ));
        if cards.is_empty() {
            h.push_str(r#"<p class="text-sm italic text-amber-900">No cards drawn yet.</p>"#);
        }
        for (i, card) in cards.iter().enumerate() {
            // Newest card starts expanded.
            h.push_str(&render_card(card, i == 0));
        }
        h.push_str(r#"</div>"#);
        h
    })
}

// ── GET /api/deck/history ──────────────────────────────────────────

pub fn handle_history_get(_query: &str) -> String {
    render_history(false)
}

// ── POST /api/deck/card ────────────────────────────────────────────

/// Handle POST /api/deck/card
/// Body params:
///   - id={card}&action=dismiss → remove the card from the history
///   - id={card}&action=mark    → add one marker (capped)
///   - id={card}&action=unmark  → reset markers to zero
///
/// Returns the re-rendered history.
pub fn handle_card_post(body: &str) -> String {
    let params = parse_form_body(body);
    let id = match get_param(&params, "id") {
        Some(s) if !s.is_empty() => s,
        _ => return error_fragment("Missing card id"),
    };

    match get_param(&params, "action").unwrap_or("") {
        "dismiss" => with_engine_mut(|e| e.dismiss(id)),
        "mark" => with_engine_mut(|e| e.increment_marker(id)),
        "unmark" => with_engine_mut(|e| e.clear_marker(id)),
        other => {
            warn!(action = other, "unknown card action");
            return error_fragment(&format!("Unknown card action: {other}"));
        }
    }
    render_history(false)
}
