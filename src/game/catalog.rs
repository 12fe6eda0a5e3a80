//! Static catalog — the resources the palette hands out and the recipes the
//! crafting grid can turn them into.
//!
//! Catalog order matters: the grid preview picks the first exact match, and
//! the last recipe is the final item whose first craft completes the game.

/// A raw resource, available in unlimited supply from the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDef {
    pub id: &'static str,
    pub display_name: &'static str,
    pub icon: &'static str,
}

/// A recipe: consumes an exact ingredient multiset and yields one item whose
/// id is the recipe id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeDef {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Ingredient multiset. Repeats count.
    pub ingredients: &'static [&'static str],
}

pub static RESOURCES: &[ResourceDef] = &[
    ResourceDef {
        id: "petal",
        display_name: "Petal",
        icon: "\u{1F338}", // 🌸
    },
    ResourceDef {
        id: "leaf",
        display_name: "Leaf",
        icon: "\u{1F343}", // 🍃
    },
    ResourceDef {
        id: "drop",
        display_name: "Dew Drop",
        icon: "\u{1F4A7}", // 💧
    },
];

pub static RECIPES: &[RecipeDef] = &[
    RecipeDef {
        id: "flower_bundle",
        display_name: "Flower Bundle",
        description: "Two petals tied together with a leaf.",
        icon: "\u{1F490}", // 💐
        ingredients: &["petal", "petal", "leaf"],
    },
    RecipeDef {
        id: "sparkling_dew",
        display_name: "Sparkling Dew",
        description: "A drop of morning dew caught between a petal and a leaf.",
        icon: "\u{2728}", // ✨
        ingredients: &["drop", "petal", "leaf"],
    },
];

/// Anything that can sit in a slot: a resource or a recipe output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemDef {
    Resource(&'static ResourceDef),
    Recipe(&'static RecipeDef),
}

impl ItemDef {
    pub fn id(&self) -> &'static str {
        match self {
            ItemDef::Resource(r) => r.id,
            ItemDef::Recipe(r) => r.id,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ItemDef::Resource(r) => r.display_name,
            ItemDef::Recipe(r) => r.display_name,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ItemDef::Resource(r) => r.icon,
            ItemDef::Recipe(r) => r.icon,
        }
    }
}

pub fn resource(id: &str) -> Option<&'static ResourceDef> {
    RESOURCES.iter().find(|r| r.id == id)
}

pub fn recipe(id: &str) -> Option<&'static RecipeDef> {
    RECIPES.iter().find(|r| r.id == id)
}

/// Resolve a slot item: resources are checked first, then recipes.
pub fn resolve_item(id: &str) -> Option<ItemDef> {
    resource(id)
        .map(ItemDef::Resource)
        .or_else(|| recipe(id).map(ItemDef::Recipe))
}

/// Map an untrusted id (form field, stored save) to the catalog's own
/// `'static` id, or `None` if the catalog doesn't know it.
pub fn intern(id: &str) -> Option<&'static str> {
    resolve_item(id).map(|item| item.id())
}

/// The last recipe in catalog order. Crafting it sets the completion flag.
pub fn final_recipe() -> Option<&'static RecipeDef> {
    RECIPES.last()
}

pub fn is_final(recipe_id: &str) -> bool {
    final_recipe().is_some_and(|r| r.id == recipe_id)
}
