//! Fuse traversal state machine
//!
//! A fuse is armed with a path and a burn duration, advances a normalized
//! progress value every tick, and reports completion exactly once. Canceling
//! (a successful defuse) freezes it for the rest of the round.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contract violations when arming a fuse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FuseError {
    /// A path with fewer than 2 points has no traversable segment
    #[error("fuse path has {0} point(s), need at least 2")]
    DegeneratePath(usize),
}

/// Fuse lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FuseState {
    /// No path armed yet
    #[default]
    Idle,
    /// Burning - progress advances each tick
    Armed,
    /// Burned to the end; terminal until re-armed
    Completed,
    /// Defused before completion; terminal until re-armed
    Canceled,
}

/// A single cube's fuse
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Fuse {
    path: Vec<Vec3>,
    state: FuseState,
    /// Normalized burn progress in [0, 1]
    progress: f32,
    /// Total burn time in seconds for this arm cycle
    duration: f32,
}

impl Fuse {
    pub fn state(&self) -> FuseState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn path(&self) -> &[Vec3] {
        &self.path
    }

    pub fn is_armed(&self) -> bool {
        self.state == FuseState::Armed
    }

    /// Arm the fuse with a fresh path and burn duration
    ///
    /// Resets progress and transitions to `Armed` from any state. Fails fast
    /// on a path too short to traverse.
    pub fn arm(&mut self, path: Vec<Vec3>, duration_seconds: f32) -> Result<(), FuseError> {
        if path.len() < 2 {
            return Err(FuseError::DegeneratePath(path.len()));
        }
        debug_assert!(duration_seconds > 0.0);
        self.path = path;
        self.duration = duration_seconds;
        self.progress = 0.0;
        self.state = FuseState::Armed;
        Ok(())
    }

    /// Advance the burn by `dt` seconds
    ///
    /// Returns `true` exactly once per arm cycle: on the tick that reaches
    /// full progress. Ticks in any other state change nothing.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.state != FuseState::Armed {
            return false;
        }
        self.progress += dt / self.duration;
        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.state = FuseState::Completed;
            return true;
        }
        false
    }

    /// Cancel the burn (successful defuse)
    ///
    /// Only an armed fuse can be canceled; the completion signal will never
    /// fire afterward.
    pub fn cancel(&mut self) {
        if self.state == FuseState::Armed {
            self.state = FuseState::Canceled;
        }
    }

    /// Current fuse point position along the path polyline
    ///
    /// `None` until a valid path has been armed. The path has `n - 1`
    /// segments; progress maps linearly onto them.
    pub fn position(&self) -> Option<Vec3> {
        let n = self.path.len();
        if n < 2 {
            return None;
        }
        let segment_float = self.progress * (n - 1) as f32;
        let segment_index = (segment_float as usize).min(n - 2);
        let segment_t = segment_float - segment_index as f32;
        Some(self.path[segment_index].lerp(self.path[segment_index + 1], segment_t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square_path() -> Vec<Vec3> {
        vec![
            Vec3::new(-1.25, -1.25, 1.25),
            Vec3::new(1.25, 1.25, 1.25),
            Vec3::new(1.25, 1.25, -1.25),
            Vec3::new(0.0, 0.0, -1.25),
        ]
    }

    #[test]
    fn test_arm_rejects_degenerate_path() {
        let mut fuse = Fuse::default();
        assert_eq!(
            fuse.arm(vec![Vec3::ZERO], 10.0),
            Err(FuseError::DegeneratePath(1))
        );
        assert_eq!(fuse.state(), FuseState::Idle);
        assert_eq!(fuse.position(), None);
    }

    #[test]
    fn test_completion_fires_exactly_once() {
        let mut fuse = Fuse::default();
        fuse.arm(square_path(), 1.0).unwrap();

        let dt = 1.0 / 60.0;
        let mut completions = 0;
        // Run well past the burn duration
        for _ in 0..180 {
            if fuse.tick(dt) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(fuse.state(), FuseState::Completed);
        assert_eq!(fuse.progress(), 1.0);
    }

    #[test]
    fn test_completion_independent_of_dt_granularity() {
        for &dt in &[1.0 / 144.0, 1.0 / 60.0, 1.0 / 30.0, 0.25] {
            let mut fuse = Fuse::default();
            fuse.arm(square_path(), 2.0).unwrap();
            let mut completions = 0;
            let mut t = 0.0;
            while t < 4.0 {
                if fuse.tick(dt) {
                    completions += 1;
                }
                t += dt;
            }
            assert_eq!(completions, 1, "dt={dt}");
        }
    }

    #[test]
    fn test_cancel_stops_burn_and_signal() {
        let mut fuse = Fuse::default();
        fuse.arm(square_path(), 1.0).unwrap();
        fuse.tick(0.5);
        let frozen = fuse.position();

        fuse.cancel();
        assert_eq!(fuse.state(), FuseState::Canceled);
        for _ in 0..120 {
            assert!(!fuse.tick(1.0));
        }
        assert_eq!(fuse.position(), frozen);
    }

    #[test]
    fn test_cancel_after_completion_is_noop() {
        let mut fuse = Fuse::default();
        fuse.arm(square_path(), 1.0).unwrap();
        fuse.tick(2.0);
        assert_eq!(fuse.state(), FuseState::Completed);
        fuse.cancel();
        assert_eq!(fuse.state(), FuseState::Completed);
    }

    #[test]
    fn test_position_endpoints() {
        let path = square_path();
        let mut fuse = Fuse::default();
        fuse.arm(path.clone(), 10.0).unwrap();

        assert_eq!(fuse.position(), Some(path[0]));
        fuse.tick(20.0);
        let end = fuse.position().unwrap();
        assert!((end - path[3]).length() < 1e-6);
    }

    #[test]
    fn test_rearm_resets_cycle() {
        let mut fuse = Fuse::default();
        fuse.arm(square_path(), 1.0).unwrap();
        assert!(fuse.tick(2.0));
        fuse.arm(square_path(), 1.0).unwrap();
        assert_eq!(fuse.state(), FuseState::Armed);
        assert_eq!(fuse.progress(), 0.0);
        // Fresh cycle gets a fresh completion signal
        assert!(fuse.tick(2.0));
    }

    proptest! {
        /// Position is continuous in progress: nearby progress values give
        /// nearby positions, and the ends match the path ends.
        #[test]
        fn prop_position_continuous(steps in 2u32..500) {
            let path = square_path();
            let mut fuse = Fuse::default();
            fuse.arm(path.clone(), 1.0).unwrap();

            let dt = 1.0 / steps as f32;
            let mut prev = fuse.position().unwrap();
            prop_assert_eq!(prev, path[0]);

            // Progress moves at (segment length) * (n-1) per unit, so the
            // longest segment bounds how far one step can move
            let max_seg: f32 = path
                .windows(2)
                .map(|w| (w[1] - w[0]).length())
                .fold(0.0, f32::max);
            let max_step = max_seg * (path.len() - 1) as f32 * dt * 1.001;

            while !fuse.tick(dt) {
                let cur = fuse.position().unwrap();
                prop_assert!((cur - prev).length() <= max_step + 1e-4);
                prev = cur;
            }
            let end = fuse.position().unwrap();
            prop_assert!((end - path[path.len() - 1]).length() < 1e-5);
        }
    }
}
