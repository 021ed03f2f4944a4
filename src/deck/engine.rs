//! The deck/draw engine.
//!
//! Holds one table per [`Category`], the remaining-index pool for the
//! selected category, and the history of drawn cards (most recent first).
//!
//! The pool is `None` after a reset event (load, category switch) and is
//! refilled by [`DeckEngine::ensure_pool_populated`], which runs after every
//! operation. A pool emptied by drawing stays `Some(empty)` until the user
//! reshuffles, reloads, or switches category, so an exhausted deck stays
//! exhausted.

use crate::config::{DeckConfig, MARKER_CEILING};
use crate::deck::{Category, DrawnCard};
use crate::table::Record;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct DeckEngine {
    tables: [Vec<Record>; 4],
    selected: Category,
    pool: Option<Vec<usize>>,
    history: VecDeque<DrawnCard>,
    allow_repeats: bool,
    rng: ChaCha8Rng,
    next_id: u64,
}

/// Serializable view of the engine, returned by `GET /api/deck/state`.
#[derive(Debug, Clone, Serialize)]
pub struct DeckSnapshot<'a> {
    pub selected: Category,
    pub allow_repeats: bool,
    pub table_sizes: [(Category, usize); 4],
    pub remaining: usize,
    pub history: &'a VecDeque<DrawnCard>,
}

impl Default for DeckEngine {
    fn default() -> Self {
        Self::new(&DeckConfig::default())
    }
}

impl DeckEngine {
    pub fn new(config: &DeckConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            tables: Default::default(),
            selected: Category::Characters,
            pool: None,
            history: VecDeque::new(),
            allow_repeats: config.allow_repeats,
            rng,
            next_id: 0,
        }
    }

    // ── Operations ─────────────────────────────────────────────────

    /// Replace a category's table. Any table change invalidates every
    /// in-flight draw, so the pool and the whole history are cleared.
    pub fn load_category(&mut self, category: Category, records: Vec<Record>) {
        info!(%category, rows = records.len(), "loading table");
        self.tables[category.index()] = records;
        self.pool = None;
        self.history.clear();
        self.ensure_pool_populated();
    }

    pub fn select_category(&mut self, category: Category) {
        debug!(%category, "selecting category");
        self.selected = category;
        self.pool = None;
        self.ensure_pool_populated();
    }

    /// Refill a reset pool with every row index of the selected table.
    /// An exhausted pool is left alone.
    pub fn ensure_pool_populated(&mut self) {
        let len = self.selected_table().len();
        if self.pool.is_none() && len > 0 {
            debug!(category = %self.selected, len, "pool populated");
            self.pool = Some((0..len).collect());
        }
    }

    /// Draw one card from the selected table. Returns `None` (and changes
    /// nothing) when the table is empty or, without repeats, the pool is
    /// exhausted.
    pub fn draw(&mut self) -> Option<&DrawnCard> {
        let len = self.selected_table().len();
        if len == 0 {
            return None;
        }

        let index = if self.allow_repeats {
            self.rng.gen_range(0..len)
        } else {
            let pool = self.pool.as_mut().filter(|p| !p.is_empty())?;
            let pos = self.rng.gen_range(0..pool.len());
            pool.swap_remove(pos)
        };

        self.next_id += 1;
        let card = DrawnCard {
            id: format!("{}-{}-{}", self.selected.singular(), index, self.next_id),
            table_index: index,
            category: self.selected,
            record: self.selected_table()[index].clone(),
            marker_count: 0,
        };
        debug!(id = %card.id, index, remaining = self.remaining(), "drew card");
        self.history.push_front(card);
        self.ensure_pool_populated();
        self.history.front()
    }

    /// Put every row of the selected table back in the pool. History stays.
    pub fn reshuffle(&mut self) {
        self.pool = None;
        self.ensure_pool_populated();
        debug!(category = %self.selected, remaining = self.remaining(), "reshuffled");
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.ensure_pool_populated();
    }

    /// Remove one card from the history. Unknown ids are ignored.
    pub fn dismiss(&mut self, card_id: &str) {
        if let Some(pos) = self.history.iter().position(|c| c.id == card_id) {
            self.history.remove(pos);
        }
        self.ensure_pool_populated();
    }

    /// Add one marker, capped at [`MARKER_CEILING`].
    pub fn increment_marker(&mut self, card_id: &str) {
        if let Some(card) = self.card_mut(card_id) {
            if card.marker_count < MARKER_CEILING {
                card.marker_count += 1;
            }
        }
        self.ensure_pool_populated();
    }

    pub fn clear_marker(&mut self, card_id: &str) {
        if let Some(card) = self.card_mut(card_id) {
            card.marker_count = 0;
        }
        self.ensure_pool_populated();
    }

    /// Switch between drawing with and without replacement. The pool keeps
    /// whatever depletion it already has.
    pub fn set_allow_repeats(&mut self, allow: bool) {
        debug!(allow, "allow repeats");
        self.allow_repeats = allow;
        self.ensure_pool_populated();
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn selected(&self) -> Category {
        self.selected
    }

    pub fn allow_repeats(&self) -> bool {
        self.allow_repeats
    }

    pub fn table(&self, category: Category) -> &[Record] {
        &self.tables[category.index()]
    }

    pub fn table_len(&self, category: Category) -> usize {
        self.table(category).len()
    }

    pub fn selected_table(&self) -> &[Record] {
        self.table(self.selected)
    }

    /// Cards left in the pool for the selected category.
    pub fn remaining(&self) -> usize {
        self.pool.as_ref().map_or(0, Vec::len)
    }

    /// Whether the next `draw` would produce a card.
    pub fn can_draw(&self) -> bool {
        !self.selected_table().is_empty() && (self.allow_repeats || self.remaining() > 0)
    }

    /// Drawn cards, most recent first.
    pub fn history(&self) -> &VecDeque<DrawnCard> {
        &self.history
    }

    pub fn card(&self, card_id: &str) -> Option<&DrawnCard> {
        self.history.iter().find(|c| c.id == card_id)
    }

    fn card_mut(&mut self, card_id: &str) -> Option<&mut DrawnCard> {
        self.history.iter_mut().find(|c| c.id == card_id)
    }

    pub fn snapshot(&self) -> DeckSnapshot<'_> {
        DeckSnapshot {
            selected: self.selected,
            allow_repeats: self.allow_repeats,
            table_sizes: Category::ALL.map(|c| (c, self.table_len(c))),
            remaining: self.remaining(),
            history: &self.history,
        }
    }
}
