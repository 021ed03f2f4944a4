//! Global deck engine container.
//!
//! Uses `thread_local!` + `RefCell` for safe mutable access in single-threaded
//! WASM. The Web Worker keeps the WASM module alive, so the loaded tables and
//! draw history persist across `handle_request` calls for the browser session
//! and vanish when the tab closes.

use crate::config::DeckConfig;
use crate::deck::DeckEngine;
use std::cell::RefCell;

thread_local! {
    static ENGINE: RefCell<DeckEngine> = RefCell::new(DeckEngine::default());
}

/// Execute a closure with read access to the engine.
pub fn with_engine<F, R>(f: F) -> R
where
    F: FnOnce(&DeckEngine) -> R,
{
    ENGINE.with(|e| f(&e.borrow()))
}

/// Execute a closure with mutable access to the engine.
pub fn with_engine_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut DeckEngine) -> R,
{
    ENGINE.with(|e| f(&mut e.borrow_mut()))
}

/// Replace the engine with a fresh one built from `config`.
pub fn reset_engine(config: &DeckConfig) {
    ENGINE.with(|e| {
        *e.borrow_mut() = DeckEngine::new(config);
    });
}

/// Engine snapshot as JSON.
pub fn snapshot_json() -> String {
    with_engine(|engine| {
        serde_json::to_string(&engine.snapshot()).unwrap_or_else(|_| "{}".to_string())
    })
}
