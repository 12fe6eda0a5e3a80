//! Error types for crafting transitions and save decoding.

use thiserror::Error;

/// Why an action left the board unchanged (or, for `InventoryFull`, why the
/// crafted item went nowhere).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    #[error("slot {0} is already occupied")]
    SlotOccupied(String),
    #[error("nothing to move out of slot {0}")]
    EmptySource(String),
    #[error("slot {0} is out of range")]
    SlotOutOfRange(String),
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("{0} is not a palette resource")]
    NotAResource(String),
    #[error("malformed slot descriptor: {0}")]
    BadSlot(String),
    #[error("no recipe matches the crafting grid")]
    NoMatchingRecipe,
    #[error("Inventory full! Make room before crafting {0}.")]
    InventoryFull(&'static str),
}

/// Why a stored save was rejected.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("invalid save JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("save is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("unsupported save version {0}")]
    UnsupportedVersion(u32),
    #[error("expected {expected} inventory slots, found {found}")]
    SlotCount { expected: usize, found: usize },
    #[error("unknown item in inventory: {0}")]
    UnknownItem(String),
    #[error("unknown recipe in discoveries: {0}")]
    UnknownRecipe(String),
}
