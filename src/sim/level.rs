/// Maze loader.
///
/// ## Sources (priority order):
///   1. Maze file resolved by the config (`maze.txt` next to the
///      executable or in the CWD)
///   2. Built-in embedded maze
///
/// ## Tile legend:
///   '#' '|' '-' '*' = Wall        '.' = Pellet (+10)
///   '@' = PowerPellet (+50)       '[' ']' = portal pair
///   ' ' = Empty                   '~' = ghost door (blocks the player only)
///
/// Short rows are padded with Empty to the widest row. Anything else in
/// the file is a configuration error, fatal before the simulation starts.

use std::path::Path;

use thiserror::Error;

use crate::config::SpawnConfig;
use crate::domain::tile::Tile;

/// Default maze compiled into the binary.
pub const EMBEDDED_MAZE: &str = include_str!("../../maze.txt");

#[derive(Debug, Error)]
pub enum MazeError {
    #[error("could not read maze file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("maze contains no rows")]
    Empty,
    #[error("invalid maze character {ch:?} at row {row}, col {col}")]
    InvalidChar { ch: char, row: usize, col: usize },
    #[error("more than one {glyph:?} portal marker")]
    DuplicatePortal { glyph: char },
    #[error("portal markers must come as a '[' ']' pair")]
    UnpairedPortal,
    #[error("portal exit at ({row}, {col}) is not an open cell")]
    BadPortalExit { row: usize, col: usize },
    #[error("{name} spawn at ({row}, {col}) is not an open cell")]
    BadSpawn {
        name: &'static str,
        row: usize,
        col: usize,
    },
}

/// The two portal cells. Entering one end relocates the player one tile
/// inward of the other end, never onto the portal tile itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortalPair {
    /// The ']' cell.
    pub a: (usize, usize),
    /// The '[' cell.
    pub b: (usize, usize),
}

impl PortalPair {
    /// Landing tile for a player standing on `pos`, if it is an endpoint.
    pub fn exit_for(&self, pos: (usize, usize)) -> Option<(usize, usize)> {
        if pos == self.a {
            Some((self.b.0, self.b.1 + 1))
        } else if pos == self.b {
            Some((self.a.0, self.a.1.saturating_sub(1)))
        } else {
            None
        }
    }
}

/// Parsed maze: the static tile layer plus everything the simulation
/// needs that is derived once at load time.
#[derive(Clone, Debug)]
pub struct MazeDef {
    pub tiles: Vec<Vec<Tile>>,
    pub rows: usize,
    pub cols: usize,
    /// 10 per Pellet + 50 per PowerPellet, fixed for the whole game.
    pub max_score: u32,
    pub portals: Option<PortalPair>,
}

/// Parse maze text into a rectangular tile grid.
pub fn parse_maze(text: &str) -> Result<MazeDef, MazeError> {
    let lines: Vec<&str> = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .collect();
    let lines: Vec<&str> = {
        // Drop trailing blank lines, keep interior ones as empty rows.
        let last = lines.iter().rposition(|l| !l.is_empty());
        match last {
            Some(i) => lines[..=i].to_vec(),
            None => return Err(MazeError::Empty),
        }
    };

    let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let mut tiles = Vec::with_capacity(lines.len());
    let mut max_score = 0u32;
    let mut portal_a = None;
    let mut portal_b = None;

    for (row, line) in lines.iter().enumerate() {
        let mut cells = Vec::with_capacity(cols);
        for (col, ch) in line.chars().enumerate() {
            let tile = match ch {
                '#' | '|' | '-' | '*' => Tile::Wall(ch),
                ' ' => Tile::Empty,
                '~' => Tile::Door,
                '.' => {
                    max_score += 10;
                    Tile::Pellet
                }
                '@' => {
                    max_score += 50;
                    Tile::PowerPellet
                }
                ']' => {
                    if portal_a.replace((row, col)).is_some() {
                        return Err(MazeError::DuplicatePortal { glyph: ']' });
                    }
                    Tile::PortalA
                }
                '[' => {
                    if portal_b.replace((row, col)).is_some() {
                        return Err(MazeError::DuplicatePortal { glyph: '[' });
                    }
                    Tile::PortalB
                }
                other => return Err(MazeError::InvalidChar { ch: other, row, col }),
            };
            cells.push(tile);
        }
        cells.resize(cols, Tile::Empty);
        tiles.push(cells);
    }

    let portals = match (portal_a, portal_b) {
        (Some(a), Some(b)) => {
            // Both landing cells must exist and be enterable, or a
            // teleport would either index off the grid or land back on
            // the portal tile and re-trigger forever.
            for (row, col) in [(b.0, b.1 + 1), (a.0, a.1.saturating_sub(1))] {
                let open = row < tiles.len()
                    && col < cols
                    && matches!(
                        tiles[row][col],
                        Tile::Empty | Tile::Pellet | Tile::PowerPellet
                    );
                if !open {
                    return Err(MazeError::BadPortalExit { row, col });
                }
            }
            Some(PortalPair { a, b })
        }
        (None, None) => None,
        _ => return Err(MazeError::UnpairedPortal),
    };

    Ok(MazeDef {
        rows: tiles.len(),
        cols,
        tiles,
        max_score,
        portals,
    })
}

/// Load the maze from the resolved file path, or the embedded default
/// when no file was found.
pub fn load_maze(path: Option<&Path>) -> Result<MazeDef, MazeError> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p).map_err(|source| MazeError::Io {
                path: p.display().to_string(),
                source,
            })?;
            parse_maze(&text)
        }
        None => parse_maze(EMBEDDED_MAZE),
    }
}

/// Spawn coordinates must land on open cells of this particular maze.
pub fn validate_spawns(maze: &MazeDef, spawns: &SpawnConfig) -> Result<(), MazeError> {
    let open_for_player = |(r, c): (usize, usize)| {
        r < maze.rows && c < maze.cols && maze.tiles[r][c].passable_for_player()
    };
    let open_for_ghost = |(r, c): (usize, usize)| {
        r < maze.rows && c < maze.cols && maze.tiles[r][c].passable_for_ghost()
    };

    if !open_for_player(spawns.player) {
        return Err(MazeError::BadSpawn {
            name: "player",
            row: spawns.player.0,
            col: spawns.player.1,
        });
    }
    if !open_for_ghost(spawns.ghost_home) {
        return Err(MazeError::BadSpawn {
            name: "ghost home",
            row: spawns.ghost_home.0,
            col: spawns.ghost_home.1,
        });
    }
    for &pos in &spawns.ghosts {
        if !open_for_ghost(pos) {
            return Err(MazeError::BadSpawn {
                name: "ghost",
                row: pos.0,
                col: pos.1,
            });
        }
    }
    Ok(())
}
