//! Data-driven game balance
//!
//! Round length, fuse timing, physics response, and manipulation rates all
//! live here instead of being baked into the simulation.

use serde::{Deserialize, Serialize};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Relaxed,
    #[default]
    Standard,
    Frantic,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Relaxed => "Relaxed",
            Difficulty::Standard => "Standard",
            Difficulty::Frantic => "Frantic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "easy" => Some(Difficulty::Relaxed),
            "standard" | "normal" => Some(Difficulty::Standard),
            "frantic" | "hard" => Some(Difficulty::Frantic),
            _ => None,
        }
    }

    /// Round length in seconds
    pub fn round_seconds(&self) -> f32 {
        match self {
            Difficulty::Relaxed => 60.0,
            Difficulty::Standard => 30.0,
            Difficulty::Frantic => 30.0,
        }
    }

    /// Uniform range the per-arm fuse duration is drawn from
    pub fn fuse_duration_range(&self) -> (f32, f32) {
        match self {
            Difficulty::Relaxed | Difficulty::Standard => (10.0, 15.0),
            Difficulty::Frantic => (5.0, 9.0),
        }
    }

    /// Cubes in play per round
    pub fn cube_count(&self) -> usize {
        match self {
            Difficulty::Relaxed | Difficulty::Standard => 3,
            Difficulty::Frantic => 6,
        }
    }
}

/// Game balance tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Difficulty preset this tuning was derived from
    pub difficulty: Difficulty,

    // === Round ===
    /// Countdown length in seconds
    pub round_seconds: f32,
    /// Cubes in play per round
    pub cube_count: usize,

    // === Fuse ===
    /// Points per generated fuse path
    pub fuse_points: usize,
    /// Shortest possible fuse burn in seconds
    pub fuse_min_seconds: f32,
    /// Longest possible fuse burn in seconds
    pub fuse_max_seconds: f32,

    // === Physics (per-tick units) ===
    /// Downward acceleration applied each tick (units/tick²)
    pub gravity: f32,
    /// Fraction of vertical speed kept after a floor bounce
    pub restitution: f32,
    /// Vertical speeds below this settle to zero (units/tick)
    pub settle_epsilon: f32,
    /// Upward speed granted by a successful defuse (units/tick)
    pub defuse_impulse_up: f32,
    /// Lateral speed scatter on a successful defuse (units/tick)
    pub defuse_impulse_lateral: f32,
    /// Upward speed granted by a detonation (units/tick)
    pub detonate_impulse_up: f32,
    /// Lateral speed scatter on a detonation (units/tick)
    pub detonate_impulse_lateral: f32,

    // === Shrink cue ===
    /// Seconds the defused-cube shrink takes
    pub shrink_seconds: f32,
    /// Uniform scale a defused cube shrinks to
    pub shrink_target: f32,

    // === Cube manipulation ===
    /// Auto-spin rate in radians/tick
    pub spin_speed: f32,
    /// Keyboard rotation rate in degrees/tick
    pub key_rotation_degrees: f32,
    /// Multiplier on normalized pointer deltas while dragging
    pub drag_sensitivity: f32,
    /// Light nudge per held key per tick
    pub light_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::from_preset(Difficulty::Standard)
    }
}

impl Tuning {
    /// Build a tuning from a difficulty preset
    pub fn from_preset(difficulty: Difficulty) -> Self {
        let (fuse_min_seconds, fuse_max_seconds) = difficulty.fuse_duration_range();
        Self {
            difficulty,
            round_seconds: difficulty.round_seconds(),
            cube_count: difficulty.cube_count(),
            fuse_points: 12,
            fuse_min_seconds,
            fuse_max_seconds,
            gravity: 0.01,
            restitution: 0.5,
            settle_epsilon: 0.01,
            defuse_impulse_up: 0.15,
            defuse_impulse_lateral: 0.05,
            detonate_impulse_up: 0.3,
            detonate_impulse_lateral: 0.15,
            shrink_seconds: 1.0,
            shrink_target: 0.5,
            spin_speed: 0.01,
            key_rotation_degrees: 2.0,
            drag_sensitivity: 1.5,
            light_step: 0.2,
        }
    }

    /// Apply a preset in place (keeps non-preset fields untouched)
    pub fn apply_preset(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.round_seconds = difficulty.round_seconds();
        self.cube_count = difficulty.cube_count();
        let (min, max) = difficulty.fuse_duration_range();
        self.fuse_min_seconds = min;
        self.fuse_max_seconds = max;
    }
}
