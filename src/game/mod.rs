//! Game module — the crafting board, its transitions and its persistence.
//! The live board is held in WASM memory (thread_local) for the lifetime of
//! the Web Worker; every saved-state change is written back to localStorage.

pub mod catalog;
pub mod error;
pub mod matching;
pub mod persist;
pub mod state;
pub mod transition;
pub mod view;
