//! HoldFast - a defuse-the-cube arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (fuse paths, physics, round state)
//! - `input`: Held-key state owned by the session controller
//! - `scene`: Per-frame snapshot consumed by the external renderer
//! - `hud`: Countdown and banner display strings
//! - `tuning`: Data-driven game balance

pub mod hud;
pub mod input;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use tuning::{Difficulty, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Big cube edge length
    pub const CUBE_SIZE: f32 = 2.5;
    /// Half extent of the big cube (fuse paths live on this surface)
    pub const CUBE_HALF_EXTENT: f32 = CUBE_SIZE / 2.0;
    /// Clickable target cube edge length
    pub const TARGET_CUBE_SIZE: f32 = 0.5;
    /// Fuse point sphere radius
    pub const FUSE_POINT_RADIUS: f32 = 0.1;

    /// Mirror room edge length
    pub const ROOM_SIZE: f32 = 80.0;
    /// Floor plane height inside the room
    pub const FLOOR_PLANE_Y: f32 = -ROOM_SIZE / 4.0;

    /// Particles emitted per defuse/detonation burst
    pub const BURST_PARTICLES: usize = 50;
    /// Burst particle lifetime in seconds
    pub const BURST_LIFETIME: f32 = 1.0;
}

/// Format whole seconds as a zero-padded `mm:ss` clock
#[inline]
pub fn clock_string(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}
