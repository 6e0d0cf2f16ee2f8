//! Per-cube state
//!
//! Each cube owns its orientation, fuse, rigid body, shrink tween, and the
//! outcome of the current armed cycle. The outcome is strictly first-wins:
//! once a cube is defused or detonated, the other transition is a no-op
//! until the next round arms it again.

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::fuse::Fuse;
use super::physics::Body;
use super::tween::ShrinkTween;
use crate::tuning::Tuning;

/// Resolution of one armed cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Outcome {
    /// Fuse still burning (or round not started)
    #[default]
    Pending,
    /// Player clicked the target in time
    Defused,
    /// Fuse burned to the end
    Detonated,
}

/// A cube in the room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cube {
    pub index: usize,
    /// Position the cube rests at when a round starts
    pub home: Vec3,
    pub orientation: Quat,
    /// Auto-spin; rotation input turns it off, `r` turns it back on
    pub spinning: bool,
    pub body: Body,
    pub fuse: Fuse,
    pub shrink: ShrinkTween,
    pub outcome: Outcome,
    /// Clickable target cube offset in cube-local space
    pub target_offset: Vec3,
}

impl Cube {
    pub fn new(index: usize, home: Vec3, half_extent: f32) -> Self {
        Self {
            index,
            home,
            orientation: Quat::IDENTITY,
            spinning: true,
            body: Body::at(home),
            fuse: Fuse::default(),
            shrink: ShrinkTween::default(),
            outcome: Outcome::Pending,
            // Back-face center, where the fuse target sits
            target_offset: Vec3::new(0.0, 0.0, -half_extent),
        }
    }

    /// Return the cube to its resting state for a fresh round
    ///
    /// Orientation is cosmetic and carries over; everything the previous
    /// round touched is reset.
    pub fn reset_for_round(&mut self) {
        self.body = Body::at(self.home);
        self.shrink = ShrinkTween::default();
        self.outcome = Outcome::Pending;
        self.spinning = true;
    }

    /// Apply a world-axis rotation delta (radians around x, then y)
    pub fn rotate_world(&mut self, dx: f32, dy: f32) {
        let delta = Quat::from_euler(EulerRot::XYZ, dx, dy, 0.0);
        self.orientation = (delta * self.orientation).normalize();
    }

    /// One tick of auto-spin
    pub fn spin(&mut self, spin_speed: f32) {
        if self.spinning {
            self.rotate_world(spin_speed, spin_speed);
        }
    }

    /// Drag rotation from normalized pointer movement
    ///
    /// Movement comes in normalized by the viewport; sensitivity scales it
    /// and a full unit of movement is a half-turn.
    pub fn drag(&mut self, dx_norm: f32, dy_norm: f32, sensitivity: f32) {
        let dx = dy_norm * sensitivity * std::f32::consts::PI;
        let dy = dx_norm * sensitivity * std::f32::consts::PI;
        self.rotate_world(dx, dy);
    }

    /// Player clicked the target cube
    ///
    /// Valid only while the fuse is armed and the cycle unresolved: cancels
    /// the burn, kicks the body with a mild upward+lateral impulse, and
    /// starts the shrink cue. Returns whether the defuse took effect.
    pub fn defuse(&mut self, rng: &mut Pcg32, tuning: &Tuning) -> bool {
        if self.outcome != Outcome::Pending || !self.fuse.is_armed() {
            return false;
        }
        self.fuse.cancel();
        self.outcome = Outcome::Defused;
        self.body.activate(scatter_impulse(
            rng,
            tuning.defuse_impulse_up,
            tuning.defuse_impulse_lateral,
        ));
        self.shrink.start(tuning.shrink_seconds, tuning.shrink_target);
        true
    }

    /// The fuse burned to the end
    ///
    /// Driven by the fuse's one-shot completion signal; the stronger
    /// explosive kick, no shrink. Returns whether the detonation took
    /// effect.
    pub fn detonate(&mut self, rng: &mut Pcg32, tuning: &Tuning) -> bool {
        if self.outcome != Outcome::Pending {
            return false;
        }
        self.outcome = Outcome::Detonated;
        self.body.activate(scatter_impulse(
            rng,
            tuning.detonate_impulse_up,
            tuning.detonate_impulse_lateral,
        ));
        true
    }

    /// Current uniform scale (shrinks only after a defuse)
    pub fn scale(&self) -> Vec3 {
        self.shrink.scale()
    }

    /// Target cube center in world space
    pub fn target_world(&self) -> Vec3 {
        self.body.position + self.orientation * (self.target_offset * self.scale())
    }

    /// Fuse point in world space, if a path is armed
    pub fn fuse_point_world(&self) -> Option<Vec3> {
        let local = self.fuse.position()?;
        Some(self.body.position + self.orientation * (local * self.scale()))
    }
}

/// Upward impulse with a random lateral scatter direction
fn scatter_impulse(rng: &mut Pcg32, up: f32, lateral: f32) -> Vec3 {
    let angle = rng.random::<f32>() * std::f32::consts::TAU;
    Vec3::new(angle.cos() * lateral, up, angle.sin() * lateral)
}
