//! Board transitions — every user interaction becomes one `Action`, and
//! `apply` maps `(board, action)` to the next board plus an `Outcome`.
//!
//! `apply` is pure: it takes the board by value and hands back the next one.
//! Rejected actions return the board untouched with `Outcome::Ignored`.
//!
//! Occupancy rules, by source → target:
//!
//! | source    | target    | target empty | target occupied |
//! |-----------|-----------|--------------|-----------------|
//! | palette   | any slot  | place        | ignored         |
//! | inventory | inventory | swap         | swap            |
//! | craft     | craft     | swap         | swap            |
//! | inventory | craft     | move         | ignored         |
//! | craft     | inventory | move         | ignored         |

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::game::catalog;
use crate::game::error::CraftError;
use crate::game::matching;
use crate::game::state::{Board, GRID_SLOTS, INVENTORY_SLOTS};

/// An addressable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRef {
    Inventory(usize),
    Craft(usize),
}

impl SlotRef {
    fn in_range(self) -> bool {
        match self {
            SlotRef::Inventory(i) => i < INVENTORY_SLOTS,
            SlotRef::Craft(i) => i < GRID_SLOTS,
        }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotRef::Inventory(i) => write!(f, "inventory:{}", i),
            SlotRef::Craft(i) => write!(f, "craft:{}", i),
        }
    }
}

impl FromStr for SlotRef {
    type Err = CraftError;

    /// Parse `inventory:<i>` or `craft:<i>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CraftError::BadSlot(s.to_string());
        let (origin, index) = s.split_once(':').ok_or_else(bad)?;
        let index: usize = index.parse().map_err(|_| bad())?;
        match origin {
            "inventory" => Ok(SlotRef::Inventory(index)),
            "craft" => Ok(SlotRef::Craft(index)),
            _ => Err(bad()),
        }
    }
}

/// Where a drag started: the palette (infinite supply) or a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    Palette(&'static str),
    Slot(SlotRef),
}

impl FromStr for DragSource {
    type Err = CraftError;

    /// Parse `palette:<resource id>` or a slot descriptor.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix("palette:") {
            Some(id) => catalog::resource(id)
                .map(|r| DragSource::Palette(r.id))
                .ok_or_else(|| CraftError::NotAResource(id.to_string())),
            None => s.parse().map(DragSource::Slot),
        }
    }
}

/// One discrete user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Drop a palette resource onto a specific slot.
    PlaceFromPalette { resource: &'static str, target: SlotRef },
    /// Click a palette resource: first empty inventory slot.
    CollectResource(&'static str),
    /// Drag between slots.
    MoveItem { source: SlotRef, target: SlotRef },
    DeleteInventoryItem(usize),
    ConfirmCraft,
    /// Empty inventory and grid, keep discoveries.
    ClearGrids,
    /// Back to fresh state. Callers must have confirmed with the player.
    ResetGame,
}

impl Action {
    /// Build the action for a drop of `source` onto `target`.
    pub fn on_drop(source: DragSource, target: SlotRef) -> Self {
        match source {
            DragSource::Palette(resource) => Action::PlaceFromPalette { resource, target },
            DragSource::Slot(source) => Action::MoveItem { source, target },
        }
    }

    /// Whether a successful apply changes persisted state.
    pub fn touches_saved_state(&self) -> bool {
        match self {
            Action::PlaceFromPalette { target, .. } => matches!(target, SlotRef::Inventory(_)),
            Action::MoveItem { source, target } => {
                matches!(source, SlotRef::Inventory(_)) || matches!(target, SlotRef::Inventory(_))
            }
            _ => true,
        }
    }
}

/// What `apply` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(CraftError),
    Crafted(&'static str),
    /// Ingredients consumed and the recipe discovered, but the output had
    /// nowhere to go.
    InventoryFull(&'static str),
    Reset,
}

impl Outcome {
    /// The board differs from before.
    pub fn changed(&self) -> bool {
        !matches!(self, Outcome::Ignored(_))
    }
}

/// The single transition dispatcher.
pub fn apply(board: Board, action: Action) -> (Board, Outcome) {
    let before = board.clone();
    let mut next = board;
    let outcome = match step(&mut next, action) {
        Ok(outcome) => outcome,
        Err(err) => {
            debug!(?action, %err, "action ignored");
            return (before, Outcome::Ignored(err));
        }
    };
    (next, outcome)
}

fn step(board: &mut Board, action: Action) -> Result<Outcome, CraftError> {
    match action {
        Action::PlaceFromPalette { resource, target } => {
            place(board, resource, target)?;
            Ok(Outcome::Applied)
        }
        Action::CollectResource(resource) => {
            let index = board
                .game
                .first_empty_slot()
                .ok_or_else(|| CraftError::SlotOccupied("inventory".to_string()))?;
            place(board, resource, SlotRef::Inventory(index))?;
            Ok(Outcome::Applied)
        }
        Action::MoveItem { source, target } => {
            move_item(board, source, target)?;
            Ok(Outcome::Applied)
        }
        Action::DeleteInventoryItem(index) => {
            let slot = board
                .game
                .inventory
                .get_mut(index)
                .ok_or_else(|| CraftError::SlotOutOfRange(SlotRef::Inventory(index).to_string()))?;
            *slot = None;
            Ok(Outcome::Applied)
        }
        Action::ConfirmCraft => confirm_craft(board),
        Action::ClearGrids => {
            board.game.inventory = [None; INVENTORY_SLOTS];
            board.grid = [None; GRID_SLOTS];
            Ok(Outcome::Applied)
        }
        Action::ResetGame => {
            *board = Board::default();
            info!("game reset");
            Ok(Outcome::Reset)
        }
    }
}

fn slot_mut(board: &mut Board, slot: SlotRef) -> Result<&mut Option<&'static str>, CraftError> {
    let cell = match slot {
        SlotRef::Inventory(i) => board.game.inventory.get_mut(i),
        SlotRef::Craft(i) => board.grid.get_mut(i),
    };
    cell.ok_or_else(|| CraftError::SlotOutOfRange(slot.to_string()))
}

fn place(board: &mut Board, resource: &str, target: SlotRef) -> Result<(), CraftError> {
    let resource = catalog::resource(resource)
        .ok_or_else(|| CraftError::NotAResource(resource.to_string()))?;
    let cell = slot_mut(board, target)?;
    if cell.is_some() {
        return Err(CraftError::SlotOccupied(target.to_string()));
    }
    *cell = Some(resource.id);
    Ok(())
}

fn move_item(board: &mut Board, source: SlotRef, target: SlotRef) -> Result<(), CraftError> {
    for slot in [source, target] {
        if !slot.in_range() {
            return Err(CraftError::SlotOutOfRange(slot.to_string()));
        }
    }
    let item = *slot_mut(board, source)?;
    if item.is_none() {
        return Err(CraftError::EmptySource(source.to_string()));
    }
    if source == target {
        return Ok(());
    }

    match (source, target) {
        (SlotRef::Inventory(a), SlotRef::Inventory(b)) => board.game.inventory.swap(a, b),
        (SlotRef::Craft(a), SlotRef::Craft(b)) => board.grid.swap(a, b),
        _ => {
            let cell = slot_mut(board, target)?;
            if cell.is_some() {
                return Err(CraftError::SlotOccupied(target.to_string()));
            }
            *cell = item;
            *slot_mut(board, source)? = None;
        }
    }
    Ok(())
}

fn confirm_craft(board: &mut Board) -> Result<Outcome, CraftError> {
    let recipe = matching::preview(&board.grid).ok_or(CraftError::NoMatchingRecipe)?;

    // First occurrence of each ingredient, in grid order.
    for ingredient in recipe.ingredients {
        if let Some(cell) = board.grid.iter_mut().find(|c| **c == Some(*ingredient)) {
            *cell = None;
        }
    }

    board.game.discovered.insert(recipe.id);
    if catalog::is_final(recipe.id) && !board.game.final_crafted {
        board.game.final_crafted = true;
        info!(recipe = recipe.id, "final item crafted");
    }

    match board.game.first_empty_slot() {
        Some(index) => {
            board.game.inventory[index] = Some(recipe.id);
            info!(recipe = recipe.id, slot = index, "crafted");
            Ok(Outcome::Crafted(recipe.id))
        }
        None => {
            warn!(recipe = recipe.id, "inventory full, crafted item lost");
            Ok(Outcome::InventoryFull(recipe.id))
        }
    }
}
