/// The transition engine: advances the game by one tick and applies
/// player input events.
///
/// Tick processing order:
///   1. Compute the head's target cell from the current direction
///   2. Wall / self-collision check → life loss or game over
///   3. Commit the move (head grows in)
///   4. Item consumption → score, growth, replacement spawn
///   5. Otherwise the tail cell vacates (constant length)
///
/// Boundary policy: edge-is-death. Stepping outside the board costs a
/// life; there is no wrap-around. Item placement is the only
/// non-deterministic operation — the random source is injected so
/// tests can seed it.

use rand::Rng;

use crate::domain::grid::Direction;
use crate::domain::item::{Item, ItemKind};
use super::event::GameEvent;
use super::world::{initial_snake, Phase, WorldState, START_DIRECTION};

// ══════════════════════════════════════════════════════════════
// Tick
// ══════════════════════════════════════════════════════════════

pub fn tick(world: &mut WorldState, rng: &mut impl Rng) -> Vec<GameEvent> {
    if world.phase != Phase::Playing || world.paused {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    let new_head = world.snake[0].step(world.direction);

    // Wall hit and self-collision share the life-loss branch.
    // The tail cell still counts as occupied: it only vacates once the
    // move commits.
    if !world.in_bounds(new_head) || world.snake_at(new_head) {
        lose_life(world, &mut events);
        return events;
    }

    world.snake.insert(0, new_head);

    match world.item {
        Some(item) if item.position == new_head => {
            // Consume: no tail pop this tick, so the snake grows by one.
            world.item = None;
            world.score += item.points();
            events.push(GameEvent::ItemPicked { kind: item.kind, points: item.points() });
            if world.score > world.high_score {
                world.high_score = world.score;
                events.push(GameEvent::NewHighScore { score: world.score });
            }
            spawn_item(world, rng, &mut events);
        }
        _ => {
            world.snake.pop();
        }
    }

    events
}

/// Life loss: while lives remain, the snake and direction return to
/// their spawn configuration and play continues. The active item stays
/// where it was. On the last life the phase becomes GameOver and the
/// world freezes.
fn lose_life(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    world.lives = world.lives.saturating_sub(1);
    if world.lives == 0 {
        world.phase = Phase::GameOver;
        events.push(GameEvent::GameOver { score: world.score });
    } else {
        world.snake = initial_snake(world.grid_size, world.start_length);
        world.direction = START_DIRECTION;
        events.push(GameEvent::LifeLost { remaining: world.lives });
    }
}

// ══════════════════════════════════════════════════════════════
// Input events
// ══════════════════════════════════════════════════════════════

/// Steer the snake. A 180-degree reverse is silently ignored while the
/// snake is longer than one segment (it would be an instant
/// self-collision); a length-1 snake may turn any way. Between two
/// ticks the last accepted call wins.
///
/// Validation is against the live `direction` field, which each
/// accepted call overwrites. Two quick turns between ticks (Up then
/// Left while travelling Right) can therefore still land on the neck;
/// the resulting collision is handled as an ordinary life loss.
pub fn set_direction(world: &mut WorldState, dir: Direction) {
    if world.phase != Phase::Playing {
        return;
    }
    if world.snake.len() > 1 && dir.is_reverse_of(world.direction) {
        return;
    }
    world.direction = dir;
}

/// Flip the pause flag. While paused, `tick` is a no-op.
pub fn toggle_pause(world: &mut WorldState) {
    if world.phase == Phase::Playing {
        world.paused = !world.paused;
    }
}

/// Flip the normal/slow cadence flag. The host scheduler reads it to
/// pick the tick interval; the simulation itself never does.
pub fn toggle_slow_mode(world: &mut WorldState) {
    world.slow_mode = !world.slow_mode;
}

/// Start a fresh game: spawn snake and item, restore score and lives.
/// The session high score is the one thing preserved.
pub fn new_game(world: &mut WorldState, rng: &mut impl Rng) -> Vec<GameEvent> {
    world.snake = initial_snake(world.grid_size, world.start_length);
    world.direction = START_DIRECTION;
    world.score = 0;
    world.lives = world.start_lives;
    world.paused = false;
    world.slow_mode = false;
    world.tick = 0;
    world.item = None;
    world.message.clear();
    world.message_timer = 0;
    world.phase = Phase::Playing;

    let mut events = Vec::new();
    spawn_item(world, rng, &mut events);
    events
}

// ══════════════════════════════════════════════════════════════
// Item spawning
// ══════════════════════════════════════════════════════════════

/// Place a new item on a uniformly random free cell. When the snake
/// covers the whole board there is nowhere to spawn, and the item slot
/// stays empty.
fn spawn_item(world: &mut WorldState, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    let free = world.free_cells();
    if free.is_empty() {
        world.item = None;
        return;
    }
    let position = free[rng.gen_range(0..free.len())];
    let kind = ItemKind::ALL[rng.gen_range(0..ItemKind::ALL.len())];
    world.item = Some(Item::new(kind, position));
    events.push(GameEvent::ItemSpawned { x: position.x, y: position.y });
}

// ══════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Position;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    /// A world already in the Playing phase, no item on the board.
    fn playing_world(grid_size: i32, lives: u32, snake_length: usize) -> WorldState {
        let mut world = WorldState::new(grid_size, lives, snake_length);
        world.phase = Phase::Playing;
        world
    }

    fn assert_distinct(snake: &[Position]) {
        for (i, a) in snake.iter().enumerate() {
            for b in &snake[i + 1..] {
                assert_ne!(a, b, "duplicate segment in {:?}", snake);
            }
        }
    }

    #[test]
    fn tick_moves_head_preserves_length() {
        let mut world = playing_world(20, 5, 3);
        let mut rng = rng();

        let events = tick(&mut world, &mut rng);

        assert!(events.is_empty());
        assert_eq!(world.snake[0], Position::new(11, 10));
        assert_eq!(world.snake.len(), 3);
        assert_distinct(&world.snake);
    }

    #[test]
    fn tick_is_noop_while_paused() {
        let mut world = playing_world(20, 5, 3);
        world.paused = true;
        let snake_before = world.snake.clone();
        let mut rng = rng();

        let events = tick(&mut world, &mut rng);

        assert!(events.is_empty());
        assert_eq!(world.snake, snake_before);
        assert_eq!(world.tick, 0);
    }

    #[test]
    fn tick_is_noop_on_title_and_game_over() {
        let mut rng = rng();
        for phase in [Phase::Title, Phase::GameOver] {
            let mut world = WorldState::new(20, 5, 3);
            world.phase = phase;
            let snake_before = world.snake.clone();

            let events = tick(&mut world, &mut rng);

            assert!(events.is_empty());
            assert_eq!(world.snake, snake_before);
        }
    }

    #[test]
    fn reverse_direction_is_rejected() {
        let mut world = playing_world(20, 5, 3);
        assert_eq!(world.direction, Direction::Right);

        set_direction(&mut world, Direction::Left);

        assert_eq!(world.direction, Direction::Right);
    }

    #[test]
    fn length_one_snake_may_reverse() {
        let mut world = playing_world(20, 5, 1);
        assert_eq!(world.snake.len(), 1);

        set_direction(&mut world, Direction::Left);

        assert_eq!(world.direction, Direction::Left);
    }

    #[test]
    fn last_valid_direction_wins() {
        let mut world = playing_world(20, 5, 3);

        // Two inputs between ticks: Up, then Left (valid from Up).
        set_direction(&mut world, Direction::Up);
        set_direction(&mut world, Direction::Left);

        let mut rng = rng();
        tick(&mut world, &mut rng);
        assert_eq!(world.snake[0], Position::new(9, 10));
    }

    #[test]
    fn wall_hit_costs_a_life_and_respawns() {
        let mut world = playing_world(20, 3, 3);
        world.snake = vec![Position::new(19, 10), Position::new(18, 10), Position::new(17, 10)];
        world.direction = Direction::Right;
        let mut rng = rng();

        let events = tick(&mut world, &mut rng);

        assert_eq!(events, vec![GameEvent::LifeLost { remaining: 2 }]);
        assert_eq!(world.lives, 2);
        assert_eq!(world.phase, Phase::Playing);
        assert_eq!(world.snake, initial_snake(20, 3));
        assert_eq!(world.direction, START_DIRECTION);
    }

    #[test]
    fn wall_hit_on_last_life_ends_the_game() {
        let mut world = playing_world(20, 1, 3);
        world.snake = vec![Position::new(0, 10), Position::new(1, 10), Position::new(2, 10)];
        world.direction = Direction::Left;
        world.score = 7;
        let mut rng = rng();

        let events = tick(&mut world, &mut rng);

        assert_eq!(events, vec![GameEvent::GameOver { score: 7 }]);
        assert_eq!(world.phase, Phase::GameOver);
        assert_eq!(world.lives, 0);

        // Frozen: further ticks change nothing.
        let snake_after = world.snake.clone();
        let events = tick(&mut world, &mut rng);
        assert!(events.is_empty());
        assert_eq!(world.snake, snake_after);
        assert_eq!(world.score, 7);
    }

    #[test]
    fn self_collision_takes_the_life_loss_branch() {
        let mut world = playing_world(20, 3, 4);
        let mut rng = rng();

        // Clockwise box: Right, Down, Left, then Up runs into the body.
        tick(&mut world, &mut rng);
        set_direction(&mut world, Direction::Down);
        tick(&mut world, &mut rng);
        set_direction(&mut world, Direction::Left);
        tick(&mut world, &mut rng);
        set_direction(&mut world, Direction::Up);
        let events = tick(&mut world, &mut rng);

        assert_eq!(events, vec![GameEvent::LifeLost { remaining: 2 }]);
        assert_eq!(world.snake, initial_snake(20, 4));
    }

    #[test]
    fn consumption_scores_and_grows() {
        let mut world = playing_world(20, 5, 3);
        world.item = Some(Item::new(ItemKind::Coffee, Position::new(11, 10)));
        let mut rng = rng();

        let events = tick(&mut world, &mut rng);

        assert_eq!(world.score, 5);
        assert_eq!(world.high_score, 5);
        assert_eq!(world.snake.len(), 4);
        assert_distinct(&world.snake);
        assert!(events.contains(&GameEvent::ItemPicked { kind: ItemKind::Coffee, points: 5 }));
        assert!(events.contains(&GameEvent::NewHighScore { score: 5 }));

        // A replacement item exists, off the snake.
        let item = world.item.expect("replacement item should spawn");
        assert!(world.in_bounds(item.position));
        assert!(!world.snake_at(item.position));
    }

    #[test]
    fn life_loss_leaves_item_in_place() {
        let mut world = playing_world(20, 3, 3);
        world.item = Some(Item::new(ItemKind::Pencil, Position::new(2, 2)));
        world.snake = vec![Position::new(19, 5), Position::new(18, 5), Position::new(17, 5)];
        world.direction = Direction::Right;
        let mut rng = rng();

        tick(&mut world, &mut rng);

        let item = world.item.expect("item should survive a life loss");
        assert_eq!(item.position, Position::new(2, 2));
    }

    #[test]
    fn high_score_survives_new_game() {
        let mut world = playing_world(20, 5, 3);
        world.item = Some(Item::new(ItemKind::Laptop, Position::new(11, 10)));
        let mut rng = rng();

        tick(&mut world, &mut rng);
        assert_eq!(world.high_score, 3);

        new_game(&mut world, &mut rng);

        assert_eq!(world.score, 0);
        assert_eq!(world.high_score, 3);
        assert_eq!(world.lives, 5);
        assert_eq!(world.snake, initial_snake(20, 3));
        assert_eq!(world.direction, START_DIRECTION);
        assert!(!world.paused);
        assert!(!world.slow_mode);
        assert_eq!(world.phase, Phase::Playing);
        assert!(world.item.is_some());
    }

    #[test]
    fn high_score_is_monotone() {
        let mut world = playing_world(20, 5, 3);
        let mut rng = rng();
        let mut best = 0;

        // Random-ish walk with consumption forced every few ticks.
        for i in 0..200 {
            if world.phase == Phase::GameOver {
                new_game(&mut world, &mut rng);
            }
            if i % 3 == 0 {
                world.item = Some(Item::new(ItemKind::Cup, world.snake[0].step(world.direction)));
            }
            tick(&mut world, &mut rng);
            assert!(world.high_score >= best);
            best = world.high_score;
            assert_distinct(&world.snake);
        }
    }

    #[test]
    fn no_spawn_when_board_is_full() {
        // 2x2 board; consuming the last free cell fills it completely.
        let mut world = playing_world(2, 5, 1);
        world.snake = vec![Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)];
        world.direction = Direction::Down;
        world.item = Some(Item::new(ItemKind::Pencil, Position::new(0, 1)));
        let mut rng = rng();

        let events = tick(&mut world, &mut rng);

        assert_eq!(world.snake.len(), 4);
        assert_eq!(world.score, 1);
        assert!(world.item.is_none());
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ItemSpawned { .. })));
    }

    #[test]
    fn pause_toggle_blocks_and_releases_ticks() {
        let mut world = playing_world(20, 5, 3);
        let mut rng = rng();

        toggle_pause(&mut world);
        assert!(world.paused);
        tick(&mut world, &mut rng);
        assert_eq!(world.snake[0], Position::new(10, 10));

        toggle_pause(&mut world);
        assert!(!world.paused);
        tick(&mut world, &mut rng);
        assert_eq!(world.snake[0], Position::new(11, 10));
    }

    #[test]
    fn slow_mode_touches_nothing_else() {
        let mut world = playing_world(20, 5, 3);
        let snake_before = world.snake.clone();

        toggle_slow_mode(&mut world);

        assert!(world.slow_mode);
        assert_eq!(world.snake, snake_before);
        assert!(!world.paused);
        assert_eq!(world.phase, Phase::Playing);
    }

    #[test]
    fn crossing_the_board_to_an_item() {
        // Snake [(5,5)] heading right, item at (10,10), lives 3.
        let mut world = playing_world(20, 3, 1);
        world.snake = vec![Position::new(5, 5)];
        world.item = Some(Item::new(ItemKind::Folder, Position::new(10, 10)));
        let mut rng = rng();

        for _ in 0..5 {
            tick(&mut world, &mut rng);
        }
        assert_eq!(world.snake[0], Position::new(10, 5));
        assert_eq!(world.score, 0);
        assert!(world.item.is_some());

        set_direction(&mut world, Direction::Down);
        for _ in 0..5 {
            tick(&mut world, &mut rng);
        }
        assert_eq!(world.snake[0], Position::new(10, 10));
        assert_eq!(world.score, 2);
        assert_eq!(world.snake.len(), 2);
        let replacement = world.item.expect("replacement item should spawn");
        assert!(!world.snake_at(replacement.position));
    }
}
