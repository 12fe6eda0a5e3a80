//! Game state container.
//!
//! `GameState` is the persisted part (inventory, discoveries, completion
//! flag). `CraftGrid` is transient and starts empty every session. `Board`
//! bundles the two so transitions see everything they need.
//!
//! The live board sits in a `thread_local!` + `RefCell`, which is safe for
//! single-threaded WASM. The Web Worker keeps the module alive, so the board
//! survives across `handle_request` calls for the whole page session.

use std::cell::RefCell;
use std::collections::BTreeSet;

pub const INVENTORY_SLOTS: usize = 18;
pub const GRID_SLOTS: usize = 9;

/// Fixed slot array. Slot index is identity; `None` is an empty slot.
pub type Inventory = [Option<&'static str>; INVENTORY_SLOTS];

/// 3×3 crafting grid, row-major.
pub type CraftGrid = [Option<&'static str>; GRID_SLOTS];

/// Everything that survives a reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub inventory: Inventory,
    /// Recipe ids crafted at least once. Only grows, except on full reset.
    pub discovered: BTreeSet<&'static str>,
    /// Set the first time the final recipe is crafted. Never cleared except
    /// on full reset.
    pub final_crafted: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            inventory: [None; INVENTORY_SLOTS],
            discovered: BTreeSet::new(),
            final_crafted: false,
        }
    }
}

impl GameState {
    /// Index of the first empty inventory slot.
    pub fn first_empty_slot(&self) -> Option<usize> {
        self.inventory.iter().position(Option::is_none)
    }

    pub fn is_discovered(&self, recipe_id: &str) -> bool {
        self.discovered.contains(recipe_id)
    }
}

/// Persisted state plus the session's crafting grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub game: GameState,
    pub grid: CraftGrid,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            game: GameState::default(),
            grid: [None; GRID_SLOTS],
        }
    }
}

impl Board {
    /// A fresh board around a loaded `GameState`. The grid is never persisted.
    pub fn with_game(game: GameState) -> Self {
        Self {
            game,
            ..Self::default()
        }
    }

    /// Every non-empty item across inventory and grid.
    pub fn all_items(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.game
            .inventory
            .iter()
            .chain(self.grid.iter())
            .filter_map(|slot| *slot)
    }
}

thread_local! {
    static BOARD: RefCell<Board> = RefCell::new(Board::default());
}

/// Execute a closure with read access to the board.
pub fn with_board<F, R>(f: F) -> R
where
    F: FnOnce(&Board) -> R,
{
    BOARD.with(|b| f(&b.borrow()))
}

/// Execute a closure with mutable access to the board.
pub fn with_board_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut Board) -> R,
{
    BOARD.with(|b| f(&mut b.borrow_mut()))
}

/// Replace the entire board (restore, import, reset).
pub fn replace_board(board: Board) {
    BOARD.with(|b| {
        *b.borrow_mut() = board;
    });
}

/// Back to a created-fresh board.
pub fn reset_board() {
    replace_board(Board::default());
}
