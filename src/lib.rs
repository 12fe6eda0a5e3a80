//! Dewdrop Workshop — in-browser WASM backend for a small crafting game.
//!
//! Exports `handle_request(method, path, query, body)` for the Service Worker
//! bridge to call. Uses `matchit` for URL routing, the same router engine
//! that powers Axum.
//!
//! The player drags resources from a palette into a 3×3 crafting grid or an
//! 18-slot inventory, crafts recipes whose ingredients match the grid
//! exactly, and collects discoveries. Progress lives in localStorage; the
//! crafting grid is per-session.

use wasm_bindgen::prelude::*;

pub mod game;
pub mod routes;

/// Process an HTTP-like request and return an HTML fragment.
///
/// Called from JavaScript (Web Worker) via wasm-bindgen.
///
/// # Arguments
/// * `method` — HTTP method (e.g., "GET", "POST")
/// * `path`   — URL path (e.g., "/api/craft/board")
/// * `query`  — Query string (e.g., "?index=3")
/// * `body`   — Request body (e.g., POST form data). Empty string for GET requests.
///
/// # Returns
/// An HTML string fragment suitable for HTMX to swap into the DOM
/// (`/api/craft/state` returns the save JSON instead).
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    // Build the router. matchit compiles route patterns into a radix tree.
    let mut router = matchit::Router::new();

    // Register routes — the value is a &str tag we match on below
    router.insert("/api/craft/board", "board").ok();
    router.insert("/api/craft/progress", "progress").ok();
    router.insert("/api/craft/place", "place").ok();
    router.insert("/api/craft/move", "move").ok();
    router.insert("/api/craft/delete", "delete").ok();
    router.insert("/api/craft/confirm", "confirm").ok();
    router.insert("/api/craft/clear", "clear").ok();
    router.insert("/api/craft/reset", "reset").ok();

    // Save persistence
    router.insert("/api/craft/state", "state").ok();
    router.insert("/api/craft/restore", "restore").ok();
    router.insert("/api/craft/export", "export").ok();
    router.insert("/api/craft/import", "import").ok();

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            ("board", "GET") => routes::craft::handle_board_get(query),
            ("progress", "GET") => routes::craft::handle_progress_get(query),
            ("place", "POST") => routes::craft::handle_place_post(body),
            ("move", "POST") => routes::craft::handle_move_post(body),
            ("delete", "POST") => routes::craft::handle_delete_post(body),
            ("confirm", "POST") => routes::craft::handle_confirm_post(body),
            ("clear", "POST") => routes::craft::handle_clear_post(body),
            ("reset", "POST") => routes::craft::handle_reset_post(body),

            ("state", "GET") => routes::save::handle_state_get(query),
            ("restore", "POST") => routes::save::handle_restore_post(body),
            ("export", "GET") => routes::save::handle_export_get(query),
            ("import", "POST") => routes::save::handle_import_post(body),

            _ => method_not_allowed(),
        },
        Err(_) => not_found(),
    }
}

fn not_found() -> String {
    r#"<span class="text-red-600">404 — route not found</span>"#.to_string()
}

fn method_not_allowed() -> String {
    r#"<span class="text-red-600">405 — method not allowed</span>"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state;

    #[test]
    fn routes_board() {
        state::reset_board();
        let html = handle_request("GET", "/api/craft/board", "", "");
        assert!(html.contains("craft-board-inner"));
        assert!(html.contains("Resources"));
        assert!(html.contains("Inventory"));
    }

    #[test]
    fn returns_404_for_unknown_route() {
        let html = handle_request("GET", "/api/nonexistent", "", "");
        assert!(html.contains("404"));
    }

    #[test]
    fn returns_405_for_wrong_method() {
        let html = handle_request("POST", "/api/craft/board", "", "");
        assert!(html.contains("405"));
        let html = handle_request("GET", "/api/craft/confirm", "", "");
        assert!(html.contains("405"));
    }

    #[test]
    fn routes_progress() {
        state::reset_board();
        let html = handle_request("GET", "/api/craft/progress", "", "");
        assert!(html.contains("Discoveries 0 / 2"));
    }

    #[test]
    fn full_session_reaches_final_item() {
        state::reset_board();
        handle_request("POST", "/api/craft/restore", "", "");
        for (resource, slot) in [("petal", 0), ("petal", 1), ("leaf", 2)] {
            handle_request(
                "POST",
                "/api/craft/move",
                "",
                &format!("source=palette%3A{}&target=craft%3A{}", resource, slot),
            );
        }
        let html = handle_request("POST", "/api/craft/confirm", "", "");
        assert!(html.contains("Flower Bundle"));
        assert!(!html.contains("workshop is complete"));

        for (resource, slot) in [("drop", 3), ("petal", 4), ("leaf", 5)] {
            handle_request(
                "POST",
                "/api/craft/place",
                "",
                &format!("resource={}&target=craft:{}", resource, slot),
            );
        }
        let html = handle_request("POST", "/api/craft/confirm", "", "");
        assert!(html.contains("workshop is complete"));

        let saved = handle_request("GET", "/api/craft/state", "", "");
        assert!(saved.contains("\"finalCrafted\":true"));
        assert!(saved.contains("\"flower_bundle\":true"));
        assert!(saved.contains("\"sparkling_dew\":true"));

        // Reload: the save survives, the grid does not.
        state::reset_board();
        handle_request("POST", "/api/craft/restore", "", &saved);
        state::with_board(|b| {
            assert!(b.game.final_crafted);
            assert_eq!(b.game.inventory[0], Some("flower_bundle"));
            assert_eq!(b.game.inventory[1], Some("sparkling_dew"));
        });
        state::reset_board();
    }

    #[test]
    fn routes_reset_with_confirmation() {
        state::reset_board();
        handle_request("POST", "/api/craft/place", "", "resource=drop");
        let html = handle_request("POST", "/api/craft/reset", "", "confirm=yes");
        assert!(html.contains("localStorage.removeItem"));
        state::with_board(|b| assert!(b.game.inventory.iter().all(Option::is_none)));
        state::reset_board();
    }

    #[test]
    fn routes_export_import() {
        state::reset_board();
        handle_request("POST", "/api/craft/place", "", "resource=leaf");
        let script = handle_request("GET", "/api/craft/export", "", "");
        assert!(script.contains("new Blob"));
        let html = handle_request("POST", "/api/craft/import", "", "state=%%%");
        assert!(html.contains("Import failed"));
        state::reset_board();
    }
}
