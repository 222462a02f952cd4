/// WorldState: the complete snapshot of a running game.
///
/// The snake is a head-first list of cells, pairwise distinct while
/// alive. All gameplay mutation goes through `sim::step`; the renderer
/// only reads. `high_score` is the one field that survives `new_game`
/// within a session.

use crate::domain::grid::{Direction, Position};
use crate::domain::item::Item;

/// Direction of the freshly spawned snake.
pub const START_DIRECTION: Direction = Direction::Right;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Playing,
    GameOver,
}

pub struct WorldState {
    // ── Board ──
    pub grid_size: i32,

    // ── Gameplay ──
    /// Body cells, head at index 0.
    pub snake: Vec<Position>,
    pub direction: Direction,
    pub item: Option<Item>,
    pub score: u32,
    pub high_score: u32,
    pub lives: u32,

    // ── Meta ──
    pub phase: Phase,
    pub paused: bool,
    /// Binary cadence toggle, read by the host scheduler only.
    pub slow_mode: bool,
    pub tick: u64,

    // ── Initial configuration, restored on life loss / new game ──
    pub start_lives: u32,
    pub start_length: usize,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
}

impl WorldState {
    pub fn new(grid_size: i32, lives: u32, snake_length: usize) -> Self {
        WorldState {
            grid_size,
            snake: initial_snake(grid_size, snake_length),
            direction: START_DIRECTION,
            item: None,
            score: 0,
            high_score: 0,
            lives,
            phase: Phase::Title,
            paused: false,
            slow_mode: false,
            tick: 0,
            start_lives: lives,
            start_length: snake_length,
            message: String::new(),
            message_timer: 0,
        }
    }

    /// Is this cell on the board?
    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.grid_size && pos.y >= 0 && pos.y < self.grid_size
    }

    /// Does any snake segment occupy this cell?
    #[inline]
    pub fn snake_at(&self, pos: Position) -> bool {
        self.snake.contains(&pos)
    }

    /// All cells not occupied by the snake, in column-major scan order.
    /// Item spawning draws uniformly from this set.
    pub fn free_cells(&self) -> Vec<Position> {
        let mut free = Vec::with_capacity((self.grid_size * self.grid_size) as usize);
        for x in 0..self.grid_size {
            for y in 0..self.grid_size {
                let pos = Position::new(x, y);
                if !self.snake_at(pos) {
                    free.push(pos);
                }
            }
        }
        free
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Count down the transient status message. Called once per host
    /// interval regardless of phase, so messages expire while paused.
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }
}

/// The spawn configuration: head at the board center, body extending
/// left, facing right. A 20-cell board with length 3 yields
/// (10,10) (9,10) (8,10).
pub fn initial_snake(grid_size: i32, length: usize) -> Vec<Position> {
    let head = Position::new(grid_size / 2, grid_size / 2);
    (0..length as i32).map(|i| Position::new(head.x - i, head.y)).collect()
}
