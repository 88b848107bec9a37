/// WorldState: the complete snapshot of a running game.
///
/// ## Tile Architecture
///
/// Two tile layers plus a presentation snapshot:
///   - `base_tiles` — the maze as loaded. **Never mutated** after load.
///   - `tiles`      — the effective layer; identical to base except that
///     consumed Pellet/PowerPellet cells become Empty. All passability
///     queries read this layer, never the snapshot.
///   - `frame`      — per-tick char snapshot for rendering: rebuilt from
///     `tiles` every tick, then player and ghost icons are stamped on.
///     Overlays from a previous tick can therefore never leak into
///     passability checks.
///
/// `restart()` resets `tiles = base_tiles.clone()` and re-seats agents.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{GameConfig, SpawnConfig};
use crate::domain::entity::{Ghost, Identity, Player};
use crate::domain::tile::Tile;
use crate::sim::level::{MazeDef, PortalPair};
use crate::sim::mode::ModeController;

/// Externally visible game status. Win detection lives here (it needs no
/// mutation), not in the tick resolver.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    Running,
    Won,
    Lost,
}

pub struct WorldState {
    // ── Tile layers ──
    /// Original maze. Never mutated after construction.
    pub base_tiles: Vec<Vec<Tile>>,
    /// Effective layer: base minus consumed pellets.
    pub tiles: Vec<Vec<Tile>>,
    pub rows: usize,
    pub cols: usize,
    pub portals: Option<PortalPair>,

    // ── Agents ──
    pub player: Player,
    /// Fixed order: Blinky, Pinky, Inky, Clyde. Inky's targeting reads
    /// `ghosts[0]` as the Blinky anchor.
    pub ghosts: [Ghost; 4],

    // ── Shared mode clock ──
    pub modes: ModeController,

    // ── Presentation ──
    /// Char snapshot with agent overlays, rebuilt every tick.
    pub frame: Vec<Vec<char>>,
    pub message: String,
    pub message_timer: u32,

    // ── Meta ──
    pub tick: u64,
    pub rng: StdRng,

    spawns: SpawnConfig,
}

impl WorldState {
    pub fn new(maze: MazeDef, config: &GameConfig, seed: u64) -> Self {
        let spawns = config.spawns.clone();
        let player = Player::new(spawns.player.0, spawns.player.1, maze.max_score);
        let ghosts = spawn_ghosts(&spawns);
        let modes = ModeController::new(
            config.speed.frames_per_second,
            config.speed.frames_per_move,
            config.rules.scatter_secs,
            config.rules.frightened_charges,
        );

        let mut world = WorldState {
            base_tiles: maze.tiles.clone(),
            tiles: maze.tiles,
            rows: maze.rows,
            cols: maze.cols,
            portals: maze.portals,
            player,
            ghosts,
            modes,
            frame: vec![],
            message: String::new(),
            message_timer: 0,
            tick: 0,
            rng: StdRng::seed_from_u64(seed),
            spawns,
        };
        world.compose_frame();
        world
    }

    /// Fresh game on the same maze: pellets restored, agents re-seated,
    /// mode clock rewound. The RNG keeps its stream.
    pub fn restart(&mut self) {
        self.tiles = self.base_tiles.clone();
        let max_score = self.player.max_score;
        self.player = Player::new(self.spawns.player.0, self.spawns.player.1, max_score);
        self.ghosts = spawn_ghosts(&self.spawns);
        self.modes.reset();
        self.tick = 0;
        self.message.clear();
        self.message_timer = 0;
        self.compose_frame();
    }

    // ── Tile query / mutation API ──

    /// Effective tile at (row, col). Out of bounds reads as wall.
    #[inline]
    pub fn tile_at(&self, row: usize, col: usize) -> Tile {
        if row < self.rows && col < self.cols {
            self.tiles[row][col]
        } else {
            Tile::Wall('#')
        }
    }

    /// Consume a pellet cell: permanently Empty in the effective layer.
    #[inline]
    pub fn clear_pellet(&mut self, row: usize, col: usize) {
        if row < self.rows && col < self.cols {
            self.tiles[row][col] = Tile::Empty;
        }
    }

    // ── Status ──

    pub fn status(&self) -> Status {
        if self.player.lost {
            Status::Lost
        } else if self.player.score == self.player.max_score {
            Status::Won
        } else {
            Status::Running
        }
    }

    // ── Presentation snapshot ──

    /// Rebuild `frame` from the effective tile layer, then stamp the
    /// player and all four ghosts. Ghosts are stamped last: a ghost may
    /// visually overwrite the player's cell, never the reverse.
    pub fn compose_frame(&mut self) {
        self.frame = self
            .tiles
            .iter()
            .map(|row| row.iter().map(|t| t.glyph()).collect())
            .collect();
        self.frame[self.player.row][self.player.col] = self.player.icon();
        for ghost in &self.ghosts {
            self.frame[ghost.row][ghost.col] = ghost.icon;
        }
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }
}

fn spawn_ghosts(spawns: &SpawnConfig) -> [Ghost; 4] {
    const IDENTITIES: [Identity; 4] = [
        Identity::Blinky,
        Identity::Pinky,
        Identity::Inky,
        Identity::Clyde,
    ];
    std::array::from_fn(|i| {
        let (row, col) = spawns.ghosts[i];
        Ghost::new(IDENTITIES[i], row, col, spawns.ghost_home)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::parse_maze;

    fn small_world() -> WorldState {
        let maze = parse_maze(concat!(
            "#######\n",
            "#.....#\n",
            "#.###.#\n",
            "#.....#\n",
            "#######",
        ))
        .unwrap();
        let mut config = GameConfig::default();
        config.spawns.player = (1, 1);
        config.spawns.ghost_home = (3, 3);
        config.spawns.ghosts = [(3, 1), (3, 2), (3, 3), (3, 4)];
        WorldState::new(maze, &config, 42)
    }

    #[test]
    fn ghost_order_is_blinky_first() {
        let w = small_world();
        assert_eq!(w.ghosts[0].identity, Identity::Blinky);
        assert_eq!(w.ghosts[3].identity, Identity::Clyde);
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let w = small_world();
        assert_eq!(w.tile_at(99, 0), Tile::Wall('#'));
        assert!(!w.tile_at(0, 99).passable_for_player());
    }

    #[test]
    fn frame_stamps_ghosts_over_player() {
        let mut w = small_world();
        w.ghosts[0].row = 1;
        w.ghosts[0].col = 1; // same cell as the player
        w.compose_frame();
        assert_eq!(w.frame[1][1], 'B');
    }

    #[test]
    fn restart_restores_pellets_and_positions() {
        let mut w = small_world();
        w.clear_pellet(1, 2);
        w.player.score = 10;
        w.player.lost = true;
        w.restart();
        assert_eq!(w.tile_at(1, 2), Tile::Pellet);
        assert_eq!(w.player.score, 0);
        assert_eq!(w.status(), Status::Running);
        assert_eq!((w.ghosts[1].row, w.ghosts[1].col), (3, 2));
    }

    #[test]
    fn won_when_score_reaches_max() {
        let mut w = small_world();
        w.player.score = w.player.max_score;
        assert_eq!(w.status(), Status::Won);
    }
}
