/// Grid value types: positions and movement directions.
///
/// Coordinates are signed so that a step off the board is representable
/// without wrapping; in-play cells lie in `[0, grid_size)` on both axes.
/// Bounds checking itself lives in `WorldState`, which knows the size.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The cell one step away in the given direction.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Position { x: self.x + dx, y: self.y + dy }
    }
}

/// Movement direction. y grows downward (screen order).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Is `other` the exact 180-degree reverse of this direction?
    pub fn is_reverse_of(self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }
}
