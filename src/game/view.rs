//! Board rendering — HTML fragments for the palette, crafting grid,
//! inventory and discovery panel.
//!
//! Every interactive element posts back to `/api/craft/*` and swaps the
//! returned board into `#craft-board`. Drag and drop uses the native HTML
//! events: `ondragstart` stores a source descriptor (`palette:<id>`,
//! `inventory:<i>`, `craft:<i>`) in the drag payload, every slot cancels
//! `dragover` so it accepts drops, and `ondrop` posts source + target.

use crate::game::catalog::{self, RECIPES, RESOURCES};
use crate::game::matching;
use crate::game::state::Board;
use crate::game::transition::SlotRef;

/// Quote a string as a JS literal that is safe inside an inline `<script>`.
pub fn js_string(s: &str) -> String {
    serde_json::to_string(s)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

/// A blocking browser alert.
pub fn render_alert(message: &str) -> String {
    format!("<script>alert({});</script>", js_string(message))
}

/// Render the whole board.
pub fn render_board(board: &Board) -> String {
    let mut html = String::with_capacity(8192);
    html.push_str(r#"<div id="craft-board-inner" class="flex flex-col gap-4">"#);
    html.push_str(&render_palette());
    html.push_str(&render_craft_grid(board));
    html.push_str(&render_inventory(board));
    html.push_str(r#"<div id="craft-progress">"#);
    html.push_str(&render_progress(board));
    html.push_str(r#"</div>"#);
    html.push_str(r#"</div>"#);
    html
}

fn drag_attrs(source: &str) -> String {
    format!(
        r#"draggable="true" ondragstart="event.dataTransfer.setData('text/plain', '{}')""#,
        source
    )
}

fn drop_attrs(target: SlotRef) -> String {
    format!(
        "ondragover=\"event.preventDefault()\" ondrop=\"event.preventDefault(); htmx.ajax('POST', '/api/craft/move', {{values: {{source: event.dataTransfer.getData('text/plain'), target: '{}'}}, target: '#craft-board', swap: 'innerHTML'}})\"",
        target
    )
}

/// One slot cell, occupied or empty.
fn render_slot(slot: SlotRef, item: Option<&str>) -> String {
    match item.and_then(catalog::resolve_item) {
        Some(def) => format!(
            r#"<div class="slot" data-slot="{slot}" {drop} {drag} title="{name}">{icon}</div>"#,
            slot = slot,
            drop = drop_attrs(slot),
            drag = drag_attrs(&slot.to_string()),
            name = def.display_name(),
            icon = def.icon(),
        ),
        None => format!(
            r#"<div class="slot empty" data-slot="{}" {}></div>"#,
            slot,
            drop_attrs(slot)
        ),
    }
}

/// Resource palette. Click collects into the inventory; drag places anywhere.
pub fn render_palette() -> String {
    let mut html = String::with_capacity(1024);
    html.push_str(r#"<div class="palette"><p class="font-bold">Resources</p><div class="flex gap-2">"#);
    for r in RESOURCES {
        html.push_str(&format!(
            r##"<button class="palette-item" {drag} hx-post="/api/craft/place" hx-vals='{{"resource":"{id}"}}' hx-target="#craft-board" hx-swap="innerHTML" title="{name}">{icon}</button>"##,
            drag = drag_attrs(&format!("palette:{}", r.id)),
            id = r.id,
            name = r.display_name,
            icon = r.icon,
        ));
    }
    html.push_str(r#"</div></div>"#);
    html
}

/// 3×3 crafting grid with the recipe preview and craft button.
pub fn render_craft_grid(board: &Board) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str(r#"<div class="crafting"><p class="font-bold">Crafting</p>"#);
    html.push_str(r#"<div class="grid grid-cols-3 gap-1">"#);
    for (i, item) in board.grid.iter().enumerate() {
        html.push_str(&render_slot(SlotRef::Craft(i), *item));
    }
    html.push_str(r#"</div>"#);

    match matching::preview(&board.grid) {
        Some(recipe) => {
            html.push_str(&format!(
                r#"<div class="preview"><span>{} {}</span>"#,
                recipe.icon, recipe.display_name
            ));
            html.push_str(r##"<button class="craft-button" hx-post="/api/craft/confirm" hx-target="#craft-board" hx-swap="innerHTML">Craft</button></div>"##);
        }
        None => {
            html.push_str(r#"<div class="preview text-slate-400">No recipe matches</div>"#);
        }
    }
    html.push_str(r#"</div>"#);
    html
}

/// Inventory grid with per-slot delete buttons.
pub fn render_inventory(board: &Board) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(r#"<div class="inventory"><p class="font-bold">Inventory</p>"#);
    html.push_str(r#"<div class="grid grid-cols-6 gap-1">"#);
    for (i, item) in board.game.inventory.iter().enumerate() {
        html.push_str(r#"<div class="relative">"#);
        html.push_str(&render_slot(SlotRef::Inventory(i), *item));
        if item.is_some() {
            html.push_str(&format!(
                r##"<button class="delete" hx-post="/api/craft/delete" hx-vals='{{"index":"{}"}}' hx-target="#craft-board" hx-swap="innerHTML" aria-label="Delete item">&#x2715;</button>"##,
                i
            ));
        }
        html.push_str(r#"</div>"#);
    }
    html.push_str(r#"</div>"#);
    html.push_str(r##"<button class="clear" hx-post="/api/craft/clear" hx-target="#craft-board" hx-swap="innerHTML">Clear</button>"##);
    html.push_str(r##"<button class="reset" hx-post="/api/craft/reset" hx-vals='{"confirm":"yes"}' hx-confirm="Erase all progress and start over?" hx-target="#craft-board" hx-swap="innerHTML">Reset Game</button>"##);
    html.push_str(r#"</div>"#);
    html
}

/// Discovery/progress panel: discovered recipes, what's craftable from
/// current holdings, and the completion banner.
pub fn render_progress(board: &Board) -> String {
    let game = &board.game;
    let mut html = String::with_capacity(2048);
    html.push_str(r#"<div class="progress">"#);
    html.push_str(&format!(
        r#"<p class="font-bold">Discoveries {} / {}</p>"#,
        game.discovered.len(),
        RECIPES.len()
    ));

    html.push_str(r#"<ul>"#);
    for recipe in RECIPES {
        if game.is_discovered(recipe.id) {
            html.push_str(&format!(
                r#"<li class="discovered">{} <strong>{}</strong> — {}</li>"#,
                recipe.icon, recipe.display_name, recipe.description
            ));
        } else {
            html.push_str(r#"<li class="undiscovered">❓ ???</li>"#);
        }
    }
    html.push_str(r#"</ul>"#);

    let craftable = matching::craftable_now(board);
    if !craftable.is_empty() {
        let names: Vec<&str> = craftable
            .iter()
            .map(|r| {
                if game.is_discovered(r.id) {
                    r.display_name
                } else {
                    "something new"
                }
            })
            .collect();
        html.push_str(&format!(
            r#"<p class="hint">You have what you need for: {}</p>"#,
            names.join(", ")
        ));
    }

    if game.final_crafted {
        let final_name = catalog::final_recipe()
            .map(|r| r.display_name)
            .unwrap_or("the final item");
        html.push_str(&format!(
            r#"<div class="complete">🎉 You crafted {}! The workshop is complete.</div>"#,
            final_name
        ));
    }
    html.push_str(r#"</div>"#);
    html
}
