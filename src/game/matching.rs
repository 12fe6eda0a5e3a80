//! Recipe matching.
//!
//! Two policies live side by side:
//! - grid preview: the grid's non-empty entries must equal the ingredient
//!   multiset exactly (no extras, no omissions);
//! - availability: a recipe is craftable when its ingredients are a
//!   sub-multiset of everything the player holds across inventory and grid.

use std::collections::BTreeMap;

use crate::game::catalog::{RECIPES, RecipeDef};
use crate::game::state::Board;

/// Count occurrences of each id.
fn multiset<'a, I>(items: I) -> BTreeMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for id in items {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

/// True iff the non-empty grid entries are exactly `recipe.ingredients`.
pub fn matches(grid: &[Option<&str>], recipe: &RecipeDef) -> bool {
    let occupied = grid.iter().filter(|slot| slot.is_some()).count();
    if occupied != recipe.ingredients.len() {
        return false;
    }
    multiset(grid.iter().filter_map(|slot| *slot)) == multiset(recipe.ingredients.iter().copied())
}

/// The recipe previewed for the current grid: first exact match in catalog order.
pub fn preview(grid: &[Option<&str>]) -> Option<&'static RecipeDef> {
    RECIPES.iter().find(|r| matches(grid, r))
}

/// Every recipe whose ingredients the player could gather from inventory and
/// grid combined, in catalog order.
pub fn craftable_now(board: &Board) -> Vec<&'static RecipeDef> {
    let held = multiset(board.all_items());
    RECIPES
        .iter()
        .filter(|r| {
            multiset(r.ingredients.iter().copied())
                .iter()
                .all(|(id, need)| held.get(id).copied().unwrap_or(0) >= *need)
        })
        .collect()
}
