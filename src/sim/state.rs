//! Session state and round bookkeeping
//!
//! All state that drives a round lives here: the countdown, the defused-cube
//! tally, the cube collection, decorative particles, and the round
//! generation counter that stale commands are checked against.

use std::collections::BTreeSet;

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cube::{Cube, Outcome};
use super::fuse::FuseError;
use super::path;
use crate::consts::{BURST_LIFETIME, BURST_PARTICLES, CUBE_HALF_EXTENT, ROOM_SIZE};
use crate::tuning::Tuning;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoundPhase {
    /// No round in progress; cubes idle and spin
    #[default]
    Stopped,
    /// Countdown running, fuses burning
    Running,
}

/// How a finished round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundResult {
    /// Every cube defused; score is the remaining whole seconds
    Won { score: u32 },
    /// Time ran out (or every fuse detonated) first
    Lost { defused: usize, total: usize },
}

/// Events emitted by the simulation for the host (HUD, audio, effects)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RoundStarted { generation: u64 },
    CubeDefused { index: usize },
    CubeDetonated { index: usize },
    RoundWon { score: u32 },
    RoundLost { defused: usize, total: usize },
}

/// Particle burst flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstKind {
    /// Yellow sparkle at the target cube on a defuse
    Defuse,
    /// Orange blast at the cube center on a detonation
    Detonate,
}

/// A visual particle (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Seconds of life remaining; opacity fades with it
    pub life: f32,
    pub size: f32,
    pub kind: BurstKind,
}

/// Complete session state (deterministic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed all randomness derives from
    pub seed: u64,
    pub tuning: Tuning,
    /// Round generation counter; bumped by every `start_round`
    pub generation: u64,
    pub phase: RoundPhase,
    /// Seconds left in the running round
    pub timer: f32,
    /// Indices defused this round
    pub defused: BTreeSet<usize>,
    pub cubes: Vec<Cube>,
    /// Movable scene light
    pub light: Vec3,
    /// Result of the last finished round
    pub result: Option<RoundResult>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Visual particles
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Pending events for the host, drained with `take_events`
    #[serde(skip)]
    events: Vec<GameEvent>,
}

/// Resting positions for `count` cubes inside the room
///
/// A fixed trio keeps the cubes well separated; further cubes flip across
/// the room center and sit a little higher.
pub fn cube_positions(count: usize) -> Vec<Vec3> {
    let spacing = 25.0;
    let half_room = ROOM_SIZE / 2.0;
    let trio = [
        Vec3::new(-half_room + spacing, 0.0, -spacing),
        Vec3::new(half_room - spacing, 0.0, spacing),
        Vec3::new(0.0, 15.0, 0.0),
    ];
    (0..count)
        .map(|i| {
            let p = trio[i % 3];
            if i < 3 {
                p
            } else {
                Vec3::new(-p.x, p.y + 7.5, -p.z)
            }
        })
        .collect()
}

impl GameState {
    /// Create a new session with the given seed and tuning
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let cubes = cube_positions(tuning.cube_count)
            .into_iter()
            .enumerate()
            .map(|(i, home)| Cube::new(i, home, CUBE_HALF_EXTENT))
            .collect();

        Self {
            seed,
            tuning,
            generation: 0,
            phase: RoundPhase::Stopped,
            timer: 0.0,
            defused: BTreeSet::new(),
            cubes,
            light: Vec3::new(5.0, 5.0, 5.0),
            result: None,
            time_ticks: 0,
            particles: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    /// Whole seconds left on the countdown
    pub fn remaining_whole_seconds(&self) -> u32 {
        self.timer.max(0.0) as u32
    }

    /// RNG for per-round draws (path base, fuse durations)
    fn round_rng(&self) -> Pcg32 {
        let h = self
            .seed
            .wrapping_add(self.generation.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Pcg32::seed_from_u64(h)
    }

    /// RNG for a single in-round event (impulse scatter)
    pub(super) fn event_rng(&self, index: usize) -> Pcg32 {
        let h = self
            .seed
            .wrapping_add(self.generation.wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .wrapping_add(index as u64 * 7919)
            .wrapping_add(self.time_ticks.wrapping_mul(2_654_435_761));
        Pcg32::seed_from_u64(h)
    }

    /// Start a fresh round
    ///
    /// Bumps the generation (invalidating commands queued against the old
    /// round), resets the countdown and tally, and re-arms every cube with
    /// a new path and a fuse duration drawn from the tuned range.
    pub fn start_round(&mut self) -> Result<(), FuseError> {
        self.generation += 1;
        self.timer = self.tuning.round_seconds;
        self.defused.clear();
        self.result = None;
        self.particles.clear();

        let mut rng = self.round_rng();
        // Path seeds: a random base in [0, 1000), plus index * 1000 per
        // cube (inside `path::path_seed`)
        let round_base = (rng.random::<f64>() * 1000.0) as u64;

        for cube in &mut self.cubes {
            cube.reset_for_round();
            let points = path::generate_for_cube(
                round_base,
                cube.index,
                self.tuning.fuse_points,
                CUBE_HALF_EXTENT,
            );
            let duration =
                rng.random_range(self.tuning.fuse_min_seconds..=self.tuning.fuse_max_seconds);
            cube.fuse.arm(points, duration)?;
        }

        self.phase = RoundPhase::Running;
        self.events.push(GameEvent::RoundStarted {
            generation: self.generation,
        });
        log::info!(
            "round {} started: {} cubes, {:.0}s",
            self.generation,
            self.cubes.len(),
            self.timer
        );
        Ok(())
    }

    /// Manual stop (PLAY/PAUSE toggle); no win/lose evaluation
    pub fn stop_round(&mut self) {
        if self.phase == RoundPhase::Running {
            self.phase = RoundPhase::Stopped;
            log::info!("round {} stopped manually", self.generation);
        }
    }

    /// Record a defused cube and stop early once all are defused
    pub(super) fn on_cube_defused(&mut self, index: usize) {
        self.defused.insert(index);
        self.events.push(GameEvent::CubeDefused { index });
        log::info!(
            "cube {} defused ({}/{})",
            index,
            self.defused.len(),
            self.cubes.len()
        );

        if self.defused.len() == self.cubes.len() {
            let score = self.remaining_whole_seconds();
            self.phase = RoundPhase::Stopped;
            self.result = Some(RoundResult::Won { score });
            self.events.push(GameEvent::RoundWon { score });
            log::info!("round {} won, score {}", self.generation, score);
        }
    }

    /// Countdown hit zero: evaluate win/lose
    pub(super) fn on_time_expired(&mut self) {
        self.timer = 0.0;
        self.phase = RoundPhase::Stopped;
        let defused = self.defused.len();
        let total = self.cubes.len();
        if defused == total {
            self.result = Some(RoundResult::Won { score: 0 });
            self.events.push(GameEvent::RoundWon { score: 0 });
        } else {
            self.result = Some(RoundResult::Lost { defused, total });
            self.events.push(GameEvent::RoundLost { defused, total });
            log::info!(
                "round {} lost: {}/{} defused",
                self.generation,
                defused,
                total
            );
        }
    }

    /// Spawn a particle burst on a small sphere around `origin`
    pub(super) fn spawn_burst(&mut self, origin: Vec3, kind: BurstKind, rng: &mut Pcg32) {
        for _ in 0..BURST_PARTICLES {
            // Uniform direction via spherical coordinates
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let phi = (2.0 * rng.random::<f32>() - 1.0).acos();
            let radius = 0.1;
            let offset = Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            );
            let vel = Vec3::new(
                (rng.random::<f32>() - 0.5) * 20.0,
                (rng.random::<f32>() - 0.5) * 20.0,
                (rng.random::<f32>() - 0.5) * 20.0,
            );
            self.particles.push(Particle {
                pos: origin + offset,
                vel,
                life: BURST_LIFETIME,
                size: 0.15,
                kind,
            });
        }
    }

    /// Nudge the scene light along x/z, clamped to the room
    pub fn nudge_light(&mut self, dx: f32, dz: f32) {
        let half = ROOM_SIZE / 2.0;
        self.light.x = (self.light.x + dx).clamp(-half, half);
        self.light.z = (self.light.z + dz).clamp(-half, half);
    }

    /// Cubes whose fuse detonated this round
    pub fn detonated_count(&self) -> usize {
        self.cubes
            .iter()
            .filter(|c| c.outcome == Outcome::Detonated)
            .count()
    }

    pub(super) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain pending events for the host
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
