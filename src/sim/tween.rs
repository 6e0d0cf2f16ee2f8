//! Shrink tween
//!
//! One-shot visual cue for a defused cube: uniform scale eases linearly
//! from 1.0 down to a target over a fixed duration. Advanced by the round's
//! simulation tick rather than a wall-clock timer of its own.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Linear scale-down tween
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShrinkTween {
    elapsed: f32,
    duration: f32,
    target: f32,
    active: bool,
}

impl ShrinkTween {
    /// Begin shrinking toward `target` uniform scale over `duration` seconds
    pub fn start(&mut self, duration: f32, target: f32) {
        debug_assert!(duration > 0.0);
        self.elapsed = 0.0;
        self.duration = duration;
        self.target = target;
        self.active = true;
    }

    /// Advance by `dt` seconds; terminal once progress reaches 1
    pub fn tick(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            self.active = false;
        }
    }

    /// Normalized progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Whether the tween still needs ticking
    pub fn active(&self) -> bool {
        self.active
    }

    /// Current scale vector
    pub fn scale(&self) -> Vec3 {
        if self.duration <= 0.0 {
            return Vec3::ONE;
        }
        Vec3::ONE.lerp(Vec3::splat(self.target), self.progress())
    }
}
