//! `/api/craft/*` board routes — palette placement, drag/drop moves,
//! inventory deletes, crafting, clearing and resetting.
//!
//! Every POST dispatches one `Action` against the live board and returns the
//! re-rendered board. When saved state changed, the fragment carries a
//! `localStorage` script; an inventory-full craft also carries an alert.

use crate::game::error::CraftError;
use crate::game::persist::{self, BrowserStore};
use crate::game::state;
use crate::game::transition::{self, Action, DragSource, Outcome, SlotRef};
use crate::game::{catalog, view};
use crate::routes::util::{get_param, parse_form_body, parse_param};

use tracing::warn;

/// Apply `action` to the live board, persist, and render the response.
pub fn dispatch(action: Action) -> String {
    let outcome = state::with_board_mut(|board| {
        let (next, outcome) = transition::apply(std::mem::take(board), action);
        *board = next;
        outcome
    });

    let mut store = BrowserStore::new();
    match &outcome {
        Outcome::Reset => persist::erase(&mut store),
        o if o.changed() && action.touches_saved_state() => {
            let saved = state::with_board(|b| persist::save(&b.game, &mut store));
            if let Err(e) = saved {
                warn!(error = %e, "save failed, keeping in-memory state");
            }
        }
        _ => {}
    }

    let mut html = state::with_board(view::render_board);
    html.push_str(&store.into_script());
    if let Outcome::InventoryFull(recipe) = outcome {
        let name = catalog::recipe(recipe)
            .map(|r| r.display_name)
            .unwrap_or(recipe);
        html.push_str(&view::render_alert(&CraftError::InventoryFull(name).to_string()));
    }
    html
}

/// Render the current board without touching it.
fn current_board() -> String {
    state::with_board(view::render_board)
}

// ── GET /api/craft/board ───────────────────────────────────────────

/// Handle GET /api/craft/board
pub fn handle_board_get(_query: &str) -> String {
    current_board()
}

// ── GET /api/craft/progress ────────────────────────────────────────

/// Handle GET /api/craft/progress
/// Returns only the discovery panel (for `#craft-progress` refreshes).
pub fn handle_progress_get(_query: &str) -> String {
    state::with_board(view::render_progress)
}

// ── POST /api/craft/place ──────────────────────────────────────────

/// Handle POST /api/craft/place
/// Body params:
///   - resource={id}&target={slot} → drop a palette resource on a slot
///   - resource={id}               → palette click, first empty inventory slot
pub fn handle_place_post(body: &str) -> String {
    let params = parse_form_body(body);
    let Some(resource) = get_param(&params, "resource").and_then(catalog::resource) else {
        return current_board();
    };
    match get_param(&params, "target") {
        None | Some("") => dispatch(Action::CollectResource(resource.id)),
        Some(target) => match target.parse::<SlotRef>() {
            Ok(target) => dispatch(Action::PlaceFromPalette {
                resource: resource.id,
                target,
            }),
            Err(_) => current_board(),
        },
    }
}

// ── POST /api/craft/move ───────────────────────────────────────────

/// Handle POST /api/craft/move
/// Body: source={palette:id|inventory:i|craft:i}&target={inventory:i|craft:i}
pub fn handle_move_post(body: &str) -> String {
    let params = parse_form_body(body);
    let source = get_param(&params, "source").and_then(|s| s.parse::<DragSource>().ok());
    let target = get_param(&params, "target").and_then(|s| s.parse::<SlotRef>().ok());
    match (source, target) {
        (Some(source), Some(target)) => dispatch(Action::on_drop(source, target)),
        _ => current_board(),
    }
}

// ── POST /api/craft/delete ─────────────────────────────────────────

/// Handle POST /api/craft/delete
/// Body: index={n}
pub fn handle_delete_post(body: &str) -> String {
    let params = parse_form_body(body);
    match parse_param::<usize>(&params, "index") {
        Some(index) => dispatch(Action::DeleteInventoryItem(index)),
        None => current_board(),
    }
}

// ── POST /api/craft/confirm ────────────────────────────────────────

/// Handle POST /api/craft/confirm
pub fn handle_confirm_post(_body: &str) -> String {
    dispatch(Action::ConfirmCraft)
}

// ── POST /api/craft/clear ──────────────────────────────────────────

/// Handle POST /api/craft/clear
/// Empties inventory and grid; discoveries survive.
pub fn handle_clear_post(_body: &str) -> String {
    dispatch(Action::ClearGrids)
}

// ── POST /api/craft/reset ──────────────────────────────────────────

/// Handle POST /api/craft/reset
/// Body: confirm=yes. Without the confirmation the board is left alone.
pub fn handle_reset_post(body: &str) -> String {
    let params = parse_form_body(body);
    if get_param(&params, "confirm") != Some("yes") {
        return current_board();
    }
    dispatch(Action::ResetGame)
}
