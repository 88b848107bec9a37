/// ModeController: the single shared mode clock for all four ghosts.
///
/// Two timers, both driven by an explicit sub-tick frame counter rather
/// than any clock API:
///   - elapsed seconds drive the one-shot Scatter → Chase unlock;
///   - an independent Frightened countdown, decremented once per simulated
///     second, overrides both while it runs.
///
/// Re-frightening while already Frightened resets the countdown; there is
/// no stacking or queueing. When the countdown expires the controller
/// reports Chase even if the Scatter window had not elapsed yet.

use crate::domain::entity::Mode;

/// What one frame of clock advance means for the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cadence {
    /// Agents move on this frame.
    pub decision: bool,
    /// The Frightened countdown reached zero on this frame.
    pub frightened_expired: bool,
}

#[derive(Clone, Debug)]
pub struct ModeController {
    frame: u32,
    frames_per_second: u32,
    frames_per_move: u32,
    elapsed_secs: u32,
    scatter_secs: u32,
    chase_unlocked: bool,
    frightened_left: u32,
    frightened_charges: u32,
}

impl ModeController {
    pub fn new(
        frames_per_second: u32,
        frames_per_move: u32,
        scatter_secs: u32,
        frightened_charges: u32,
    ) -> Self {
        ModeController {
            frame: 0,
            frames_per_second: frames_per_second.max(1),
            frames_per_move: frames_per_move.max(1),
            elapsed_secs: 0,
            scatter_secs,
            chase_unlocked: false,
            frightened_left: 0,
            frightened_charges,
        }
    }

    /// Mode every ghost is in right now.
    pub fn mode(&self) -> Mode {
        if self.frightened_left > 0 {
            Mode::Frightened
        } else if self.chase_unlocked {
            Mode::Chase
        } else {
            Mode::Scatter
        }
    }

    /// (Re)start the Frightened countdown. Called on power-pellet
    /// consumption; a running countdown is reset, not extended.
    pub fn frighten(&mut self) {
        self.frightened_left = self.frightened_charges;
    }

    /// Advance one frame of the 60-per-second loop.
    pub fn advance_frame(&mut self) -> Cadence {
        self.frame += 1;
        let decision = self.frame % self.frames_per_move == 0;
        let mut frightened_expired = false;

        if self.frame >= self.frames_per_second {
            self.frame = 0;

            // Scatter → Chase fires exactly once per game.
            if !self.chase_unlocked {
                self.elapsed_secs += 1;
                if self.elapsed_secs >= self.scatter_secs {
                    self.chase_unlocked = true;
                }
            }

            if self.frightened_left > 0 {
                self.frightened_left -= 1;
                if self.frightened_left == 0 {
                    // Frightened always hands over to Chase.
                    self.chase_unlocked = true;
                    frightened_expired = true;
                }
            }
        }

        Cadence { decision, frightened_expired }
    }

    /// Back to the initial state (same cadence settings). Used on restart.
    pub fn reset(&mut self) {
        self.frame = 0;
        self.elapsed_secs = 0;
        self.chase_unlocked = false;
        self.frightened_left = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_seconds(m: &mut ModeController, secs: u32) -> Vec<Cadence> {
        let mut out = vec![];
        for _ in 0..secs * 60 {
            out.push(m.advance_frame());
        }
        out
    }

    #[test]
    fn scatter_switches_to_chase_after_threshold() {
        let mut m = ModeController::new(60, 10, 7, 10);
        assert_eq!(m.mode(), Mode::Scatter);
        run_seconds(&mut m, 6);
        assert_eq!(m.mode(), Mode::Scatter);
        run_seconds(&mut m, 1);
        assert_eq!(m.mode(), Mode::Chase);
        // One-directional: stays Chase from here on.
        run_seconds(&mut m, 20);
        assert_eq!(m.mode(), Mode::Chase);
    }

    #[test]
    fn decision_frames_fire_every_tenth_frame() {
        let mut m = ModeController::new(60, 10, 7, 10);
        let decisions = run_seconds(&mut m, 1)
            .iter()
            .filter(|c| c.decision)
            .count();
        assert_eq!(decisions, 6);
    }

    #[test]
    fn frighten_overrides_and_expires_into_chase() {
        let mut m = ModeController::new(60, 10, 7, 3);
        m.frighten();
        assert_eq!(m.mode(), Mode::Frightened);
        let cadences = run_seconds(&mut m, 3);
        assert!(cadences.iter().any(|c| c.frightened_expired));
        // Expiry unlocks Chase even though only 3 seconds elapsed.
        assert_eq!(m.mode(), Mode::Chase);
    }

    #[test]
    fn refrightening_resets_countdown_without_stacking() {
        let mut m = ModeController::new(60, 10, 7, 3);
        m.frighten();
        run_seconds(&mut m, 2); // 1 charge left
        m.frighten();           // back to 3 charges
        let cadences = run_seconds(&mut m, 2);
        assert!(cadences.iter().all(|c| !c.frightened_expired));
        assert_eq!(m.mode(), Mode::Frightened);
        let cadences = run_seconds(&mut m, 1);
        assert!(cadences.iter().any(|c| c.frightened_expired));
    }

    #[test]
    fn reset_returns_to_scatter() {
        let mut m = ModeController::new(60, 10, 7, 10);
        run_seconds(&mut m, 8);
        m.frighten();
        m.reset();
        assert_eq!(m.mode(), Mode::Scatter);
    }
}
