/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::Rng;

use config::GameConfig;
use domain::entity::{Direction, FrameInput};
use sim::event::GameEvent;
use sim::level::{load_maze, validate_spawns};
use sim::step;
use sim::world::{Status, WorldState};
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Frames a transient HUD message stays up.
const MESSAGE_FRAMES: u32 = 90;

fn main() {
    let config = GameConfig::load();

    let maze = match load_maze(config.maze_file.as_deref()) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Maze error: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = validate_spawns(&maze, &config.spawns) {
        eprintln!("Maze error: {e}");
        std::process::exit(1);
    }

    let seed: u64 = rand::rng().random();
    let mut world = WorldState::new(maze, &config, seed);

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
    println!("Final Score: {}", world.player.score);
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];

fn detect_facing(kb: &InputState) -> Option<Direction> {
    if kb.any_pressed(KEYS_UP) {
        Some(Direction::Up)
    } else if kb.any_pressed(KEYS_DOWN) {
        Some(Direction::Down)
    } else if kb.any_pressed(KEYS_LEFT) {
        Some(Direction::Left)
    } else if kb.any_pressed(KEYS_RIGHT) {
        Some(Direction::Right)
    } else {
        None
    }
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.speed.frame_ms);

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) {
            break;
        }
        if kb.any_pressed(KEYS_RESTART) {
            world.restart();
        }

        if last_tick.elapsed() >= tick_rate {
            if world.status() == Status::Running {
                let frame_input = FrameInput { facing: detect_facing(&kb) };
                let events = step::step(world, frame_input);
                apply_event_messages(world, &events);
            }
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn apply_event_messages(world: &mut WorldState, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::PowerPelletEaten { .. } => {
                world.set_message("POWER UP! Ghosts are frightened!", MESSAGE_FRAMES);
            }
            GameEvent::FrightenedEnded => {
                world.set_message("Ghosts recovered...", MESSAGE_FRAMES);
            }
            GameEvent::GhostEaten { identity } => {
                let name = match identity {
                    domain::entity::Identity::Blinky => "Blinky",
                    domain::entity::Identity::Pinky => "Pinky",
                    domain::entity::Identity::Inky => "Inky",
                    domain::entity::Identity::Clyde => "Clyde",
                };
                world.set_message(&format!("{name} sent home!"), MESSAGE_FRAMES);
            }
            GameEvent::PlayerCaught => {
                world.set_message("CAUGHT!", MESSAGE_FRAMES);
            }
            _ => {}
        }
    }
}
