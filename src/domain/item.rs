/// Collectible desk items and their properties.
/// Point values and effect tags are queried via methods, not stored as
/// fields, so item semantics are centralized here.

use crate::domain::grid::Position;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ItemKind {
    Coffee,
    Laptop,
    Pencil,
    Folder,
    Cup,
}

/// Effect tag carried by an item. Surfaced to the UI for flavor text;
/// the simulation rules do not act on it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ItemEffect {
    Invincible,
    Extend,
    Shield,
    Speed,
}

impl ItemEffect {
    /// Flavor tag appended to the pickup message.
    pub fn label(self) -> &'static str {
        match self {
            ItemEffect::Invincible => "invincible",
            ItemEffect::Extend => "extend",
            ItemEffect::Shield => "shield",
            ItemEffect::Speed => "speed",
        }
    }
}

impl ItemKind {
    /// All kinds, for uniform random selection at spawn time.
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Coffee,
        ItemKind::Laptop,
        ItemKind::Pencil,
        ItemKind::Folder,
        ItemKind::Cup,
    ];

    pub fn points(self) -> u32 {
        match self {
            ItemKind::Coffee => 5,
            ItemKind::Laptop => 3,
            ItemKind::Pencil => 1,
            ItemKind::Folder => 2,
            ItemKind::Cup => 2,
        }
    }

    pub fn effect(self) -> Option<ItemEffect> {
        match self {
            ItemKind::Coffee => Some(ItemEffect::Invincible),
            ItemKind::Laptop => Some(ItemEffect::Extend),
            ItemKind::Pencil => None,
            ItemKind::Folder => Some(ItemEffect::Shield),
            ItemKind::Cup => Some(ItemEffect::Speed),
        }
    }

    /// Display name for the HUD / pickup message.
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Coffee => "Coffee",
            ItemKind::Laptop => "Laptop",
            ItemKind::Pencil => "Pencil",
            ItemKind::Folder => "Folder",
            ItemKind::Cup => "Cup",
        }
    }
}

/// An item placed on the board. At most one exists at a time.
#[derive(Clone, Copy, Debug)]
pub struct Item {
    pub kind: ItemKind,
    pub position: Position,
}

impl Item {
    pub fn new(kind: ItemKind, position: Position) -> Self {
        Item { kind, position }
    }

    pub fn points(&self) -> u32 {
        self.kind.points()
    }
}
