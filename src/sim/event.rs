/// Events emitted during a simulation step.
/// The presentation layer consumes these for HUD messages.

use crate::domain::entity::Identity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PelletEaten { row: usize, col: usize },
    PowerPelletEaten { row: usize, col: usize },
    /// Player left through a portal; coordinates are the landing tile.
    Teleported { row: usize, col: usize },
    GhostEaten { identity: Identity },
    PlayerCaught,
    /// Frightened countdown hit zero; all four ghosts recovered at once.
    FrightenedEnded,
}
