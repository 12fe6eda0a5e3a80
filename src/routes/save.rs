//! `/api/craft/{state,restore,export,import}` routes — moving the save
//! between WASM memory, localStorage and export files.

use crate::game::persist::{self, BrowserStore, STORAGE_KEY};
use crate::game::state::{self, Board};
use crate::game::view;
use crate::routes::util::{get_param, parse_form_body};

use tracing::info;

/// Pull the save payload out of a POST body: a `state=` form field, or the
/// raw body when the page posts the stored string as-is.
fn state_param(body: &str) -> String {
    let params = parse_form_body(body);
    match get_param(&params, "state") {
        Some(state) => state.to_string(),
        None => body.trim().to_string(),
    }
}

// ── GET /api/craft/state ───────────────────────────────────────────

/// Handle GET /api/craft/state
/// Returns the save JSON exactly as it would be written to localStorage.
pub fn handle_state_get(_query: &str) -> String {
    state::with_board(|b| persist::encode(&b.game)).unwrap_or_else(|_| "{}".to_string())
}

// ── POST /api/craft/restore ────────────────────────────────────────

/// Handle POST /api/craft/restore
/// Called on page load with whatever localStorage holds. Missing or corrupt
/// data silently becomes a fresh game. The crafting grid always starts empty.
pub fn handle_restore_post(body: &str) -> String {
    let stored = state_param(body);
    let store = if stored.is_empty() {
        BrowserStore::new()
    } else {
        BrowserStore::seeded(STORAGE_KEY, &stored)
    };
    let game = persist::load_or_fresh(&store);
    state::replace_board(Board::with_game(game));
    state::with_board(view::render_board)
}

// ── GET /api/craft/export ──────────────────────────────────────────

/// Handle GET /api/craft/export
/// Returns a <script> tag that downloads the save as a base64 text file.
pub fn handle_export_get(_query: &str) -> String {
    let encoded = match state::with_board(|b| persist::export_base64(&b.game)) {
        Ok(encoded) => encoded,
        Err(e) => {
            return format!(r#"<span class="text-red-600">Export failed: {}</span>"#, e);
        }
    };
    format!(
        r#"<script>
(function() {{
  var b = new Blob(['{state}'], {{type: 'text/plain'}});
  var a = document.createElement('a');
  a.href = URL.createObjectURL(b);
  a.download = 'dewdrop-workshop-save.txt';
  a.click();
  URL.revokeObjectURL(a.href);
}})();
</script>"#,
        state = encoded
    )
}

// ── POST /api/craft/import ─────────────────────────────────────────

/// Handle POST /api/craft/import
/// Accepts a base64 save (from an export file). Unlike restore, a bad file
/// is reported and the current game is kept.
pub fn handle_import_post(body: &str) -> String {
    match persist::import_base64(&state_param(body)) {
        Ok(game) => {
            info!(discovered = game.discovered.len(), "save imported");
            state::replace_board(Board::with_game(game));
            let mut store = BrowserStore::new();
            let mut html = String::from(
                r#"<span class="text-emerald-600">Save imported successfully</span>"#,
            );
            if state::with_board(|b| persist::save(&b.game, &mut store)).is_ok() {
                html.push_str(&store.into_script());
            }
            html
        }
        Err(e) => format!(r#"<span class="text-red-600">Import failed: {}</span>"#, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::GameState;
    use crate::routes::util::percent_decode;

    fn reset() {
        state::reset_board();
    }

    fn sample_game() -> GameState {
        let mut game = GameState::default();
        game.inventory[2] = Some("sparkling_dew");
        game.discovered.insert("sparkling_dew");
        game.final_crafted = true;
        game
    }

    #[test]
    fn state_get_returns_save_json() {
        reset();
        let json = handle_state_get("");
        assert!(json.starts_with("{\"version\":1"));
        assert!(json.contains("\"finalCrafted\":false"));
        reset();
    }

    #[test]
    fn restore_roundtrip_through_state_get() {
        reset();
        state::replace_board(Board::with_game(sample_game()));
        let json = handle_state_get("");
        reset();

        let html = handle_restore_post(&json);
        assert!(html.contains("workshop is complete"));
        state::with_board(|b| assert_eq!(b.game, sample_game()));
        reset();
    }

    #[test]
    fn restore_accepts_form_encoded_state() {
        reset();
        let json = persist::encode(&sample_game()).unwrap();
        let body = format!(
            "state={}",
            json.replace('%', "%25")
                .replace('&', "%26")
                .replace('=', "%3D")
                .replace('+', "%2B")
        );
        assert_eq!(percent_decode(&body[6..]), json);
        handle_restore_post(&body);
        state::with_board(|b| assert!(b.game.final_crafted));
        reset();
    }

    #[test]
    fn restore_corrupt_or_empty_gives_fresh_game() {
        reset();
        state::with_board_mut(|b| b.game.inventory[0] = Some("leaf"));
        handle_restore_post("state=%7Bnot+json");
        state::with_board(|b| assert_eq!(*b, Board::default()));

        state::with_board_mut(|b| b.game.inventory[0] = Some("leaf"));
        handle_restore_post("");
        state::with_board(|b| assert_eq!(*b, Board::default()));
        reset();
    }

    #[test]
    fn restore_empties_crafting_grid() {
        reset();
        state::with_board_mut(|b| b.grid[0] = Some("petal"));
        let json = persist::encode(&GameState::default()).unwrap();
        handle_restore_post(&json);
        state::with_board(|b| assert!(b.grid.iter().all(Option::is_none)));
        reset();
    }

    #[test]
    fn export_then_import() {
        reset();
        state::replace_board(Board::with_game(sample_game()));
        let script = handle_export_get("");
        assert!(script.contains("dewdrop-workshop-save.txt"));
        let encoded = persist::export_base64(&sample_game()).unwrap();
        assert!(script.contains(&encoded));
        reset();

        let html = handle_import_post(&encoded);
        assert!(html.contains("imported successfully"));
        assert!(html.contains("localStorage.setItem"));
        state::with_board(|b| assert_eq!(b.game, sample_game()));
        reset();
    }

    #[test]
    fn import_garbage_keeps_current_game() {
        reset();
        state::with_board_mut(|b| b.game.inventory[0] = Some("leaf"));
        let html = handle_import_post("state=%21%21%21");
        assert!(html.contains("Import failed"));
        state::with_board(|b| assert_eq!(b.game.inventory[0], Some("leaf")));
        reset();
    }
}
