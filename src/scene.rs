//! Render-facing scene snapshot
//!
//! The renderer, camera controls, and mirror room are external
//! collaborators; the game hands them one `SceneFrame` of plain data per
//! frame and owns nothing about how it is drawn.

use glam::{Quat, Vec3};
use serde::Serialize;

use crate::consts::{BURST_LIFETIME, CUBE_SIZE, FUSE_POINT_RADIUS, TARGET_CUBE_SIZE};
use crate::hud;
use crate::sim::{BurstKind, GameState};

/// Straight-alpha color
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Spinning cube body
pub const HOTPINK: Rgba = Rgba::new(1.0, 0.41, 0.71, 0.7);
/// Cube under manual control
pub const BLUE: Rgba = Rgba::new(0.0, 0.0, 1.0, 0.7);
/// Target cube
pub const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
/// Fuse point and defuse sparkle
pub const YELLOW: Rgba = Rgba::new(1.0, 1.0, 0.0, 1.0);
/// Detonation blast
pub const ORANGE: Rgba = Rgba::new(1.0, 0.55, 0.0, 1.0);

/// One cube's draw data
#[derive(Debug, Clone, Serialize)]
pub struct CubeInstance {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub size: f32,
    pub color: Rgba,
    /// Target cube center, world space
    pub target_position: Vec3,
    pub target_size: f32,
    pub target_color: Rgba,
    /// Fuse point, world space, while a path is armed or frozen
    pub fuse_point: Option<Vec3>,
    pub fuse_point_radius: f32,
    /// Fuse path polyline, world space
    pub path: Vec<Vec3>,
}

/// One particle's draw data
#[derive(Debug, Clone, Serialize)]
pub struct ParticleInstance {
    pub position: Vec3,
    pub size: f32,
    pub color: Rgba,
    pub opacity: f32,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct SceneFrame {
    pub cubes: Vec<CubeInstance>,
    pub particles: Vec<ParticleInstance>,
    /// Movable light position
    pub light: Vec3,
    pub clock: String,
    pub play_label: String,
    pub banner: Option<String>,
}

/// Build the frame snapshot for the current state
pub fn snapshot(state: &GameState) -> SceneFrame {
    let cubes = state
        .cubes
        .iter()
        .map(|cube| {
            let scale = cube.scale();
            let to_world = |p: Vec3| cube.body.position + cube.orientation * (p * scale);
            CubeInstance {
                position: cube.body.position,
                rotation: cube.orientation,
                scale,
                size: CUBE_SIZE,
                color: if cube.spinning { HOTPINK } else { BLUE },
                target_position: cube.target_world(),
                target_size: TARGET_CUBE_SIZE,
                target_color: RED,
                fuse_point: cube.fuse_point_world(),
                fuse_point_radius: FUSE_POINT_RADIUS,
                path: cube.fuse.path().iter().copied().map(to_world).collect(),
            }
        })
        .collect();

    let particles = state
        .particles
        .iter()
        .map(|p| ParticleInstance {
            position: p.pos,
            size: p.size,
            color: match p.kind {
                BurstKind::Defuse => YELLOW,
                BurstKind::Detonate => ORANGE,
            },
            opacity: (p.life / BURST_LIFETIME).clamp(0.0, 1.0),
        })
        .collect();

    SceneFrame {
        cubes,
        particles,
        light: state.light,
        clock: hud::clock(state),
        play_label: hud::play_button_label(state).to_string(),
        banner: hud::banner(state),
    }
}
