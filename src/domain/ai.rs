/// Ghost AI — per-identity targeting plus greedy tile selection.
///
/// Reference: https://gameinternals.com/understanding-pac-man-ghost-behavior
///
/// Targeting computes a tile (fresh every decision, possibly outside the
/// grid — targets are signed and only neighbor cells are bounds-checked).
/// Movement then evaluates the four cardinal neighbors in fixed order,
/// rejects out-of-bounds, ghost-impassable and reverse-of-last-move cells,
/// and takes the first candidate with minimal Manhattan distance to the
/// target. Frightened ghosts skip targeting entirely and draw uniformly
/// from the surviving directions.

use rand::Rng;

use super::entity::{Direction, Ghost, Identity, Mode, Player, DIRECTIONS};
use super::tile::Tile;

fn manhattan(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

// ── Targeting ──

/// Fixed per-identity corner, one tile inward from the maze corners.
pub fn scatter_target(identity: Identity, rows: usize, cols: usize) -> (i32, i32) {
    let (rows, cols) = (rows as i32, cols as i32);
    match identity {
        Identity::Blinky => (1, cols - 2),
        Identity::Pinky => (1, 1),
        Identity::Inky => (rows - 2, cols - 2),
        Identity::Clyde => (rows - 2, 1),
    }
}

/// A tile `n` steps ahead of the player along its facing.
///
/// When the player faces Up the offset is applied `n` up AND `n` left.
/// This reproduces the overflow artifact of the original arcade targeting
/// code and is deliberate behavior, not a bug to fix.
fn ahead_of_player(player: &Player, n: i32) -> (i32, i32) {
    let (r, c) = (player.row as i32, player.col as i32);
    match player.facing {
        Direction::Up => (r - n, c - n),
        Direction::Down => (r + n, c),
        Direction::Left => (r, c - n),
        Direction::Right => (r, c + n),
    }
}

/// Chase-mode target for one identity.
///
/// Clyde always targets his scatter corner here: the original's
/// distance-8 rule sits behind an unconditional early exit and never
/// runs, so the reachable behavior is the corner (see DESIGN.md).
pub fn chase_target(
    identity: Identity,
    player: &Player,
    blinky_pos: (usize, usize),
    rows: usize,
    cols: usize,
) -> (i32, i32) {
    match identity {
        Identity::Blinky => (player.row as i32, player.col as i32),
        Identity::Pinky => ahead_of_player(player, 4),
        Identity::Inky => {
            // Anchor two tiles ahead (with the Up quirk), then extend by
            // the per-axis magnitude of Blinky's offset from the anchor.
            // Magnitude only: the original folds the sign away, so this
            // is not true vector doubling.
            let anchor = ahead_of_player(player, 2);
            let dr = (blinky_pos.0 as i32 - anchor.0).abs();
            let dc = (blinky_pos.1 as i32 - anchor.1).abs();
            (anchor.0 + dr, anchor.1 + dc)
        }
        Identity::Clyde => scatter_target(Identity::Clyde, rows, cols),
    }
}

// ── Movement selection ──

/// Neighbor of (row, col) one step in `dir`, if it is on the grid and
/// ghost-passable.
fn ghost_step(tiles: &[Vec<Tile>], row: usize, col: usize, dir: Direction) -> Option<(usize, usize)> {
    let (dr, dc) = dir.delta();
    let nr = row as i32 + dr;
    let nc = col as i32 + dc;
    if nr < 0 || nc < 0 {
        return None;
    }
    let (nr, nc) = (nr as usize, nc as usize);
    if nr >= tiles.len() || nc >= tiles[nr].len() {
        return None;
    }
    if !tiles[nr][nc].passable_for_ghost() {
        return None;
    }
    Some((nr, nc))
}

/// Greedy non-Frightened move: first minimal Manhattan distance to the
/// target in DIRECTIONS order, never the reverse of the previous move.
/// None means no candidate survived — the ghost holds position and its
/// previous-move memory must stay untouched.
pub fn choose_move(
    tiles: &[Vec<Tile>],
    ghost: &Ghost,
    target: (i32, i32),
) -> Option<(Direction, (usize, usize))> {
    let mut best: Option<(i32, Direction, (usize, usize))> = None;

    for dir in DIRECTIONS {
        if ghost.prev_move == Some(dir.opposite()) {
            continue;
        }
        let Some((nr, nc)) = ghost_step(tiles, ghost.row, ghost.col, dir) else {
            continue;
        };
        let dist = manhattan((nr as i32, nc as i32), target);
        // Strict '<' keeps the first minimal candidate on ties.
        if best.map_or(true, |(d, _, _)| dist < d) {
            best = Some((dist, dir, (nr, nc)));
        }
    }

    best.map(|(_, dir, pos)| (dir, pos))
}

/// Frightened move: uniform-random draw over the not-yet-tried
/// directions, rejecting the reverse of the last move and impassable
/// cells. At most four draws; None when all four fail (hold position).
pub fn choose_frightened_move<R: Rng>(
    tiles: &[Vec<Tile>],
    ghost: &Ghost,
    rng: &mut R,
) -> Option<(Direction, (usize, usize))> {
    let mut remaining: Vec<Direction> = DIRECTIONS.to_vec();

    while !remaining.is_empty() {
        let dir = remaining.swap_remove(rng.random_range(0..remaining.len()));
        if ghost.prev_move == Some(dir.opposite()) {
            continue;
        }
        if let Some(pos) = ghost_step(tiles, ghost.row, ghost.col, dir) {
            return Some((dir, pos));
        }
    }

    None
}

/// Decide one ghost's move for this decision frame. The mode dispatch
/// lives here so targeting can never be handed a Frightened ghost:
/// Frightened routes straight to the random pick and computes no target.
pub fn decide_move<R: Rng>(
    tiles: &[Vec<Tile>],
    ghost: &Ghost,
    player: &Player,
    blinky_pos: (usize, usize),
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> Option<(Direction, (usize, usize))> {
    match ghost.mode {
        Mode::Frightened => choose_frightened_move(tiles, ghost, rng),
        Mode::Scatter => choose_move(tiles, ghost, scatter_target(ghost.identity, rows, cols)),
        Mode::Chase => choose_move(
            tiles,
            ghost,
            chase_target(ghost.identity, player, blinky_pos, rows, cols),
        ),
    }
}
