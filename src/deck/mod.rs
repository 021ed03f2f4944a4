//! Deck module — the four category tables, the draw pool, and the history of
//! drawn cards. State lives in WASM memory (thread_local) for the lifetime of
//! the Web Worker.

pub mod engine;
pub mod state;

pub use engine::{DeckEngine, DeckSnapshot};

use crate::table::Record;
use serde::{Deserialize, Serialize};

/// One of the four fixed table slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Characters,
    Items,
    Locations,
    Quests,
}

impl Category {
    /// Fixed enumeration order. Bulk upload falls back through this order.
    pub const ALL: [Category; 4] = [
        Category::Characters,
        Category::Items,
        Category::Locations,
        Category::Quests,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Characters => "characters",
            Category::Items => "items",
            Category::Locations => "locations",
            Category::Quests => "quests",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Category::Characters => "character",
            Category::Items => "item",
            Category::Locations => "location",
            Category::Quests => "quest",
        }
    }

    /// Capitalized label for headings.
    pub fn label(self) -> &'static str {
        match self {
            Category::Characters => "Characters",
            Category::Items => "Items",
            Category::Locations => "Locations",
            Category::Quests => "Quests",
        }
    }

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse a category name, plural or singular, ignoring case and
    /// surrounding whitespace.
    pub fn parse(s: &str) -> Option<Category> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| s.eq_ignore_ascii_case(c.as_str()) || s.eq_ignore_ascii_case(c.singular()))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A card materialized from one draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawnCard {
    /// Unique for the session; never reused after dismissal.
    pub id: String,
    /// Row index into the category's table at draw time.
    pub table_index: usize,
    pub category: Category,
    pub record: Record,
    /// Manual tally, 0..=MARKER_CEILING.
    pub marker_count: u8,
}
