//! Engine configuration.

use serde::Deserialize;

/// Highest value a card's marker tally can reach.
pub const MARKER_CEILING: u8 = 10;

/// Largest table a single upload may hold. Keeps a stray multi-megabyte
/// export from filling the worker's memory.
pub const MAX_TABLE_ROWS: usize = 10_000;

/// Start-up options for a [`DeckEngine`](crate::deck::DeckEngine).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Draw with replacement instead of from the remaining pool.
    pub allow_repeats: bool,
    /// Fixed RNG seed. `None` seeds from the browser's entropy source.
    pub seed: Option<u64>,
}

#[cfg(test)]
impl DeckConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}
