/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::rngs::ThreadRng;
use rand::thread_rng;

use config::GameConfig;
use domain::grid::Direction;
use domain::item::ItemKind;
use sim::event::GameEvent;
use sim::step;
use sim::world::{Phase, WorldState};
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Message durations, in ticks of the active interval.
const MSG_SHORT: u32 = 4;
const MSG_LONG: u32 = 8;

fn main() {
    let config = GameConfig::load();

    let mut world = WorldState::new(
        config.board.grid_size,
        config.board.lives,
        config.board.snake_length,
    );

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Desk Viper!");
    println!("Session High Score: {}", world.high_score);
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut rng = thread_rng();
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(world, &kb, &mut rng) {
            break;
        }

        // Direction presses replay in arrival order: the last valid
        // one is what the next tick sees.
        if world.phase == Phase::Playing {
            for code in kb.presses() {
                if let Some(dir) = direction_for(*code) {
                    step::set_direction(world, dir);
                }
            }
        }

        let tick_rate = Duration::from_millis(if world.slow_mode {
            config.speed.slow_ms
        } else {
            config.speed.normal_ms
        });

        if last_tick.elapsed() >= tick_rate {
            let events = step::tick(world, &mut rng);
            process_events(world, &events);
            world.tick_message();
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_events(world: &mut WorldState, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::ItemPicked { kind, points } => {
                world.set_message(&pickup_message(*kind, *points), MSG_SHORT);
            }
            GameEvent::LifeLost { remaining } => {
                world.set_message(&format!("Crash! {remaining} lives left"), MSG_LONG);
            }
            _ => {}
        }
    }
}

/// Pickup message: item name, points, and the effect tag when the
/// kind carries one.
fn pickup_message(kind: ItemKind, points: u32) -> String {
    match kind.effect() {
        Some(effect) => format!("{} +{} ({})", kind.label(), points, effect.label()),
        None => format!("{} +{}", kind.label(), points),
    }
}

// ── Key Constants ──

const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];
const KEY_SLOW: &[KeyCode] = &[KeyCode::Char(' ')];
const KEY_CONFIRM: &[KeyCode] = &[KeyCode::Enter];

fn direction_for(code: KeyCode) -> Option<Direction> {
    if KEYS_UP.contains(&code) {
        Some(Direction::Up)
    } else if KEYS_DOWN.contains(&code) {
        Some(Direction::Down)
    } else if KEYS_LEFT.contains(&code) {
        Some(Direction::Left)
    } else if KEYS_RIGHT.contains(&code) {
        Some(Direction::Right)
    } else {
        None
    }
}

/// Back to the title screen. Gameplay state is discarded; the session
/// high score lives in the same world and survives.
fn return_to_title(world: &mut WorldState) {
    world.phase = Phase::Title;
    world.paused = false;
    world.message.clear();
    world.message_timer = 0;
}

/// Phase-dependent meta keys. Returns true to quit the application.
fn handle_meta(world: &mut WorldState, kb: &InputState, rng: &mut ThreadRng) -> bool {
    let confirm = kb.any_pressed(KEY_CONFIRM);
    let esc = kb.any_pressed(&[KeyCode::Esc]);

    match world.phase {
        Phase::Title => {
            if confirm {
                step::new_game(world, rng);
            } else if esc || kb.any_pressed(KEYS_QUIT) {
                return true;
            }
        }

        Phase::Playing => {
            if esc {
                return_to_title(world);
                return false;
            }
            if kb.any_pressed(KEYS_PAUSE) {
                step::toggle_pause(world);
            }
            if kb.any_pressed(KEY_SLOW) {
                step::toggle_slow_mode(world);
                let mode = if world.slow_mode { "slow" } else { "normal" };
                world.set_message(&format!("Mode: {mode}"), MSG_SHORT);
            }
            if kb.any_pressed(KEYS_RESTART) {
                step::new_game(world, rng);
                world.set_message("New game", MSG_SHORT);
            }
        }

        Phase::GameOver => {
            if confirm || kb.any_pressed(KEYS_RESTART) {
                step::new_game(world, rng);
            } else if esc {
                return_to_title(world);
            } else if kb.any_pressed(KEYS_QUIT) {
                return true;
            }
        }
    }

    false
}
