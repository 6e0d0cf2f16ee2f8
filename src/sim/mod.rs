//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (cubes by index)
//! - No rendering or platform dependencies

pub mod cube;
pub mod fuse;
pub mod path;
pub mod physics;
pub mod state;
pub mod tick;
pub mod tween;

pub use cube::{Cube, Outcome};
pub use fuse::{Fuse, FuseError, FuseState};
pub use path::{Face, face_counts, generate, generate_for_cube, path_seed};
pub use physics::Body;
pub use state::{
    BurstKind, GameEvent, GameState, Particle, RoundPhase, RoundResult, cube_positions,
};
pub use tick::{DefuseCommand, DragCommand, TickInput, advance_frame, tick};
pub use tween::ShrinkTween;
