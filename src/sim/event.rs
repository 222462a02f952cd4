/// Events emitted during a simulation tick.
/// The presentation layer consumes these for status messages.

use crate::domain::item::ItemKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    ItemPicked { kind: ItemKind, points: u32 },
    ItemSpawned { x: i32, y: i32 },
    NewHighScore { score: u32 },
    LifeLost { remaining: u32 },
    GameOver { score: u32 },
}
