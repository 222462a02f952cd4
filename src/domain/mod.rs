pub mod grid;
pub mod item;
