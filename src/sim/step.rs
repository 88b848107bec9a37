/// The step function: advances the world by one frame.
///
/// Processing order (one frame of the 60-per-second loop):
///   1. Buffered input → player facing
///   2. Mode clock advance, ghost mode/icon sync
///   3. On decision frames: ghost moves, then player move + animation
///   4. Player tile effects (pellet, power pellet, portal)
///   5. Mode re-sync (a power pellet frightens within the same frame)
///   6. Presentation snapshot rebuild + agent stamping
///   7. Collision resolution (capture vs. eaten-ghost respawn)
///
/// Win detection is the caller's job via `WorldState::status` — it needs
/// no mutation and is not repeated here.

use crate::domain::ai;
use crate::domain::entity::{FrameInput, Mode, FRIGHTENED_ICON};
use crate::domain::tile::Tile;
use crate::sim::event::GameEvent;
use crate::sim::world::{Status, WorldState};

pub fn step(world: &mut WorldState, input: FrameInput) -> Vec<GameEvent> {
    if world.status() != Status::Running {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    if world.message_timer > 0 {
        world.message_timer -= 1;
        if world.message_timer == 0 {
            world.message.clear();
        }
    }

    // Input only changes the facing; movement happens on decision frames.
    if let Some(dir) = input.facing {
        world.player.facing = dir;
    }

    let cadence = world.modes.advance_frame();
    if cadence.frightened_expired {
        events.push(GameEvent::FrightenedEnded);
    }
    sync_ghost_modes(world);

    if cadence.decision {
        resolve_ghost_movement(world);
        resolve_player_movement(world);
        world.player.advance_anim();
    }

    resolve_player_tile(world, &mut events);
    // A power pellet eaten above must frighten the ghosts before the
    // collision check below sees their modes.
    sync_ghost_modes(world);

    world.compose_frame();
    resolve_collisions(world, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Mode sync
// ══════════════════════════════════════════════════════════════

/// All four ghosts follow the shared clock; the icon is identity-based
/// except while Frightened. Restoring icons here is what makes the whole
/// pack recover in the same tick the countdown expires.
fn sync_ghost_modes(world: &mut WorldState) {
    let mode = world.modes.mode();
    for ghost in world.ghosts.iter_mut() {
        ghost.mode = mode;
        ghost.icon = if mode == Mode::Frightened {
            FRIGHTENED_ICON
        } else {
            ghost.identity.icon()
        };
    }
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

fn resolve_ghost_movement(world: &mut WorldState) {
    let (rows, cols) = (world.rows, world.cols);
    // Frozen for the whole tick: every ghost sees the same Blinky tile.
    let blinky = (world.ghosts[0].row, world.ghosts[0].col);
    let WorldState {
        tiles,
        ghosts,
        player,
        rng,
        ..
    } = world;

    for ghost in ghosts.iter_mut() {
        let chosen = ai::decide_move(tiles, ghost, player, blinky, rows, cols, rng);

        // No survivor → hold position, previous-move memory untouched.
        if let Some((dir, (row, col))) = chosen {
            ghost.row = row;
            ghost.col = col;
            ghost.prev_move = Some(dir);
        }
    }
}

fn resolve_player_movement(world: &mut WorldState) {
    let (dr, dc) = world.player.facing.delta();
    let nr = world.player.row as i32 + dr;
    let nc = world.player.col as i32 + dc;
    if nr < 0 || nc < 0 {
        return;
    }
    let (nr, nc) = (nr as usize, nc as usize);
    if world.tile_at(nr, nc).passable_for_player() {
        world.player.row = nr;
        world.player.col = nc;
    }
    // Blocked: hold position. The facing itself only changes via input.
}

// ══════════════════════════════════════════════════════════════
// Tile effects
// ══════════════════════════════════════════════════════════════

fn resolve_player_tile(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let (row, col) = (world.player.row, world.player.col);

    match world.tile_at(row, col) {
        Tile::Pellet => {
            world.clear_pellet(row, col);
            world.player.score += 10;
            events.push(GameEvent::PelletEaten { row, col });
        }
        Tile::PowerPellet => {
            world.clear_pellet(row, col);
            world.player.score += 50;
            world.modes.frighten();
            events.push(GameEvent::PowerPelletEaten { row, col });
        }
        Tile::PortalA | Tile::PortalB => {
            if let Some(portals) = world.portals {
                if let Some((dr, dc)) = portals.exit_for((row, col)) {
                    world.player.row = dr;
                    world.player.col = dc;
                    events.push(GameEvent::Teleported { row: dr, col: dc });
                }
            }
        }
        _ => {}
    }
}

// ══════════════════════════════════════════════════════════════
// Collisions
// ══════════════════════════════════════════════════════════════

fn resolve_collisions(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let (prow, pcol) = (world.player.row, world.player.col);

    for ghost in world.ghosts.iter_mut() {
        if (ghost.row, ghost.col) != (prow, pcol) {
            continue;
        }
        if ghost.mode == Mode::Frightened {
            // Only this ghost is affected; the player and the other
            // three carry on.
            events.push(GameEvent::GhostEaten {
                identity: ghost.identity,
            });
            ghost.respawn();
        } else if !world.player.lost {
            // Sticky: first capture wins, never cleared.
            world.player.lost = true;
            events.push(GameEvent::PlayerCaught);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::entity::{Direction, Identity};
    use crate::sim::level::parse_maze;

    // 7x7 arena with a portal row and both pellet kinds.
    const ARENA: &str = concat!(
        "#######\n",
        "#.....#\n",
        "#.###.#\n",
        "[..@..]\n",
        "#.###.#\n",
        "#.....#\n",
        "#######",
    );

    fn test_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.spawns.player = (1, 1);
        config.spawns.ghost_home = (5, 5);
        config.spawns.ghosts = [(5, 1), (5, 2), (5, 3), (5, 4)];
        config
    }

    fn arena_world() -> WorldState {
        WorldState::new(parse_maze(ARENA).unwrap(), &test_config(), 7)
    }

    /// Step with no input until the next decision frame has run.
    fn run_one_decision(world: &mut WorldState) -> Vec<GameEvent> {
        let mut events = vec![];
        for _ in 0..10 {
            events.extend(step(world, FrameInput::default()));
        }
        events
    }

    fn park_ghosts(world: &mut WorldState, at: (usize, usize)) {
        for g in world.ghosts.iter_mut() {
            g.row = at.0;
            g.col = at.1;
        }
    }

    #[test]
    fn pellet_ahead_is_eaten_in_one_move() {
        let mut world = arena_world();
        park_ghosts(&mut world, (5, 5));
        world.clear_pellet(1, 1); // nothing underfoot
        world.player.facing = Direction::Right; // pellet at (1, 2)
        let events = run_one_decision(&mut world);
        assert_eq!(world.player.score, 10);
        assert_eq!(world.tile_at(1, 2), Tile::Empty);
        assert!(events.contains(&GameEvent::PelletEaten { row: 1, col: 2 }));
    }

    #[test]
    fn cleared_pellet_cell_scores_only_once() {
        let mut world = arena_world();
        park_ghosts(&mut world, (5, 5));
        world.player.row = 1;
        world.player.col = 2;
        // Consume the pellet underfoot, then sit on the cell for a while.
        let mut events = run_one_decision(&mut world);
        world.player.row = 1;
        world.player.col = 2;
        world.player.facing = Direction::Up; // wall — stays put
        for _ in 0..5 {
            events.extend(run_one_decision(&mut world));
            world.player.row = 1;
            world.player.col = 2;
        }
        let pellet_events = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PelletEaten { row: 1, col: 2 }))
            .count();
        assert_eq!(pellet_events, 1);
    }

    #[test]
    fn score_changes_only_by_pellet_amounts() {
        let mut world = arena_world();
        park_ghosts(&mut world, (5, 5));
        let mut last = world.player.score;
        let mut dirs = [
            Direction::Right,
            Direction::Down,
            Direction::Left,
            Direction::Up,
        ]
        .iter()
        .cycle();
        for frame in 0..600 {
            let facing = if frame % 40 == 0 {
                Some(*dirs.next().unwrap())
            } else {
                None
            };
            step(&mut world, FrameInput { facing });
            let now = world.player.score;
            assert!(now >= last);
            assert!(matches!(now - last, 0 | 10 | 50));
            last = now;
        }
    }

    #[test]
    fn power_pellet_frightens_all_ghosts_immediately() {
        let mut world = arena_world();
        park_ghosts(&mut world, (5, 5));
        world.player.row = 3;
        world.player.col = 3; // on the power pellet
        world.player.facing = Direction::Up; // wall above is '#' → holds
        let events = step(&mut world, FrameInput::default());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::PowerPelletEaten { .. })));
        assert_eq!(world.player.score, 50);
        for g in &world.ghosts {
            assert_eq!(g.mode, Mode::Frightened);
            assert_eq!(g.icon, FRIGHTENED_ICON);
        }
    }

    #[test]
    fn frightened_expiry_restores_all_icons_same_tick() {
        let mut world = arena_world();
        park_ghosts(&mut world, (5, 5));
        world.modes.frighten();
        let mut ended_seen = false;
        for _ in 0..60 * 11 {
            let events = step(&mut world, FrameInput::default());
            if events.contains(&GameEvent::FrightenedEnded) {
                ended_seen = true;
                for g in &world.ghosts {
                    assert_eq!(g.mode, Mode::Chase);
                    assert_eq!(g.icon, g.identity.icon());
                }
                break;
            }
        }
        assert!(ended_seen);
    }

    #[test]
    fn portal_teleports_one_tile_inward_without_looping() {
        let mut world = arena_world();
        park_ghosts(&mut world, (5, 5));
        world.player.row = 3;
        world.player.col = 0; // standing on '['
        world.player.facing = Direction::Down; // wall below → no drift
        let events = step(&mut world, FrameInput::default());
        // Lands left of ']' at (3, 6) → (3, 5), not on the portal itself.
        assert_eq!((world.player.row, world.player.col), (3, 5));
        assert!(events.contains(&GameEvent::Teleported { row: 3, col: 5 }));
        // Sitting there must not bounce back.
        let events = step(&mut world, FrameInput::default());
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::Teleported { .. })));
    }

    #[test]
    fn capture_sets_sticky_loss() {
        let mut world = arena_world();
        world.ghosts[0].row = 1;
        world.ghosts[0].col = 1; // on the player
        park_ghosts_except_first(&mut world);
        let events = step(&mut world, FrameInput::default());
        assert!(events.contains(&GameEvent::PlayerCaught));
        assert_eq!(world.status(), Status::Lost);
        // Separating afterwards does not clear it.
        world.ghosts[0].row = 5;
        step(&mut world, FrameInput::default());
        assert_eq!(world.status(), Status::Lost);
    }

    fn park_ghosts_except_first(world: &mut WorldState) {
        for g in world.ghosts.iter_mut().skip(1) {
            g.row = 5;
            g.col = 5;
        }
    }

    #[test]
    fn eating_frightened_ghost_respawns_only_that_ghost() {
        let mut world = arena_world();
        world.clear_pellet(1, 1); // keep the score untouched
        world.modes.frighten();
        world.ghosts[2].row = 1;
        world.ghosts[2].col = 1; // Inky on the player
        let others_before: Vec<(usize, usize)> = world
            .ghosts
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 2)
            .map(|(_, g)| (g.row, g.col))
            .collect();
        let score_before = world.player.score;

        let events = step(&mut world, FrameInput::default());

        assert!(events.contains(&GameEvent::GhostEaten {
            identity: Identity::Inky
        }));
        // Eaten ghost back at the home tile, identity icon, Chase.
        // (park positions may shift on decision frames, so check right away)
        assert_eq!((world.ghosts[2].row, world.ghosts[2].col), (5, 5));
        assert_eq!(world.player.score, score_before);
        assert_eq!((world.player.row, world.player.col), (1, 1));
        assert_eq!(world.status(), Status::Running);
        let others_after: Vec<(usize, usize)> = world
            .ghosts
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 2)
            .map(|(_, g)| (g.row, g.col))
            .collect();
        assert_eq!(others_before, others_after);
    }

    #[test]
    fn ghosts_never_reverse_over_many_ticks() {
        let mut world = arena_world();
        // Keep the player clear of the ghosts' row.
        world.player.facing = Direction::Up;
        let mut prev: [Option<Direction>; 4] = [None; 4];
        for _ in 0..600 {
            step(&mut world, FrameInput::default());
            for (i, g) in world.ghosts.iter().enumerate() {
                if let (Some(before), Some(after)) = (prev[i], g.prev_move) {
                    if after != before {
                        assert_ne!(after, before.opposite());
                    }
                }
                prev[i] = g.prev_move;
            }
            if world.status() != Status::Running {
                break;
            }
        }
    }
}
