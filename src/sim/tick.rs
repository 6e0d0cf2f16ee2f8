//! Fixed timestep simulation tick
//!
//! One tick applies, in order: session toggles, cube manipulation input,
//! player defuse commands, fuse burn/completion, then physics, shrink
//! tweens, particles, and the countdown. Physics always runs after the
//! fuse/defuse transitions of the same tick so a resolution and its
//! physical response land on the same frame.

use crate::consts::{CUBE_HALF_EXTENT, FLOOR_PLANE_Y, MAX_SUBSTEPS, SIM_DT};

use super::state::{BurstKind, GameEvent, GameState};

/// A click on a cube's target, stamped with the round it was aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefuseCommand {
    pub cube: usize,
    /// Round generation observed when the click was dispatched
    pub generation: u64,
}

/// A drag-rotation delta for one grabbed cube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragCommand {
    pub cube: usize,
    /// Pointer movement normalized by viewport width/height
    pub dx: f32,
    pub dy: f32,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// PLAY/PAUSE toggle
    pub toggle_round: bool,
    /// Target-cube clicks since the last tick
    pub defuse: Vec<DefuseCommand>,
    /// Keyboard rotation deltas in degrees (already per-tick)
    pub rotate_x: f32,
    pub rotate_y: f32,
    /// Any rotate key held this tick (kills auto-spin even if deltas cancel)
    pub rotating: bool,
    /// Drag-rotation on a grabbed cube
    pub drag: Option<DragCommand>,
    /// `r` - toggle auto-spin on all cubes
    pub toggle_spin: bool,
    /// `1` / `2` - halve / double the auto-spin rate
    pub speed_down: bool,
    pub speed_up: bool,
    /// Light nudge axes in [-1, 1] (from i/j/k/l)
    pub light_x: f32,
    pub light_z: f32,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    if input.toggle_round {
        if state.is_running() {
            state.stop_round();
        } else if let Err(e) = state.start_round() {
            log::error!("failed to start round: {e}");
        }
    }

    apply_manipulation(state, input);

    if state.is_running() {
        apply_defuse_commands(state, input);
    }
    if state.is_running() {
        burn_fuses(state, dt);
    }

    // Physics strictly after this tick's fuse/defuse resolution
    let floor_y = FLOOR_PLANE_Y + CUBE_HALF_EXTENT;
    let tuning = state.tuning.clone();
    for cube in &mut state.cubes {
        cube.body.integrate(
            tuning.gravity,
            floor_y,
            tuning.restitution,
            tuning.settle_epsilon,
        );
        cube.shrink.tick(dt);
    }

    for particle in &mut state.particles {
        particle.pos += particle.vel * dt;
        particle.life -= dt;
    }
    state.particles.retain(|p| p.life > 0.0);

    if state.is_running() {
        state.timer -= dt;
        if state.timer <= 0.0 {
            state.on_time_expired();
        }
    }
}

/// Advance by a variable frame delta using fixed-timestep substeps
///
/// `accumulator` carries fractional-tick time between frames. Runaway
/// deltas are clamped and substeps capped so a hitching host cannot
/// spiral. One-shot commands apply to the first substep only; held-state
/// fields repeat. Returns the number of ticks run.
pub fn advance_frame(
    state: &mut GameState,
    input: &TickInput,
    frame_dt: f32,
    accumulator: &mut f32,
) -> u32 {
    *accumulator += frame_dt.min(0.1);

    let mut step_input = input.clone();
    let mut substeps = 0;
    while *accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
        tick(state, &step_input, SIM_DT);
        *accumulator -= SIM_DT;
        substeps += 1;

        // Clear one-shot inputs after processing
        step_input.toggle_round = false;
        step_input.toggle_spin = false;
        step_input.speed_down = false;
        step_input.speed_up = false;
        step_input.defuse.clear();
        step_input.drag = None;
    }
    substeps
}

/// Spin, keyboard/drag rotation, spin-rate keys, and light movement
///
/// These run in any phase: idle cubes keep spinning while the scoreboard
/// shows the last result.
fn apply_manipulation(state: &mut GameState, input: &TickInput) {
    if input.toggle_spin {
        let enable = !state.cubes.iter().any(|c| c.spinning);
        for cube in &mut state.cubes {
            cube.spinning = enable;
        }
    }
    if input.speed_down {
        state.tuning.spin_speed = (state.tuning.spin_speed * 0.5).max(0.0025);
    }
    if input.speed_up {
        state.tuning.spin_speed = (state.tuning.spin_speed * 2.0).min(0.04);
    }

    if input.rotating {
        // Manual rotation takes over from auto-spin until `r` restores it
        for cube in &mut state.cubes {
            cube.spinning = false;
        }
        if input.rotate_x != 0.0 || input.rotate_y != 0.0 {
            let dx = input.rotate_x.to_radians();
            let dy = input.rotate_y.to_radians();
            for cube in &mut state.cubes {
                cube.rotate_world(dx, dy);
            }
        }
    }

    if let Some(drag) = input.drag {
        let sensitivity = state.tuning.drag_sensitivity;
        if let Some(cube) = state.cubes.get_mut(drag.cube) {
            cube.spinning = false;
            cube.drag(drag.dx, drag.dy, sensitivity);
        }
    }

    let spin_speed = state.tuning.spin_speed;
    for cube in &mut state.cubes {
        cube.spin(spin_speed);
    }

    if input.light_x != 0.0 || input.light_z != 0.0 {
        let step = state.tuning.light_step;
        state.nudge_light(input.light_x * step, input.light_z * step);
    }
}

/// Resolve player clicks, dropping anything aimed at a previous round
fn apply_defuse_commands(state: &mut GameState, input: &TickInput) {
    let tuning = state.tuning.clone();
    for cmd in &input.defuse {
        if cmd.generation != state.generation {
            log::debug!(
                "dropping stale defuse for cube {} (round {} != {})",
                cmd.cube,
                cmd.generation,
                state.generation
            );
            continue;
        }
        if !state.is_running() {
            break;
        }
        let mut rng = state.event_rng(cmd.cube);
        let Some(cube) = state.cubes.get_mut(cmd.cube) else {
            log::warn!("defuse for unknown cube {}", cmd.cube);
            continue;
        };
        let applied = cube.defuse(&mut rng, &tuning);
        let burst_at = cube.target_world();
        if applied {
            state.spawn_burst(burst_at, BurstKind::Defuse, &mut rng);
            state.on_cube_defused(cmd.cube);
        }
    }
}

/// Advance every armed fuse; completions detonate their cube
fn burn_fuses(state: &mut GameState, dt: f32) {
    let tuning = state.tuning.clone();
    for i in 0..state.cubes.len() {
        if !state.cubes[i].fuse.tick(dt) {
            continue;
        }
        let mut rng = state.event_rng(i);
        let cube = &mut state.cubes[i];
        let applied = cube.detonate(&mut rng, &tuning);
        let burst_at = cube.body.position;
        if applied {
            state.push_event(GameEvent::CubeDetonated { index: i });
            state.spawn_burst(burst_at, BurstKind::Detonate, &mut rng);
            log::info!("cube {i} detonated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::cube::Outcome;
    use crate::sim::state::{RoundPhase, RoundResult};
    use crate::tuning::Tuning;

    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        state.start_round().unwrap();
        state
    }

    fn run_ticks(state: &mut GameState, n: usize) {
        let input = TickInput::default();
        for _ in 0..n {
            tick(state, &input, SIM_DT);
        }
    }

    #[test]
    fn test_toggle_starts_and_stops() {
        let mut state = GameState::new(1, Tuning::default());
        let toggle = TickInput {
            toggle_round: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, SIM_DT);
        assert_eq!(state.phase, RoundPhase::Running);
        assert_eq!(state.generation, 1);

        tick(&mut state, &toggle, SIM_DT);
        assert_eq!(state.phase, RoundPhase::Stopped);
        assert_eq!(state.result, None);
    }

    #[test]
    fn test_timeout_loses_with_tally() {
        let mut state = started(42);
        // 30 s round at 60 Hz, plus slack
        run_ticks(&mut state, 31 * 60);
        assert_eq!(state.phase, RoundPhase::Stopped);
        assert_eq!(
            state.result,
            Some(RoundResult::Lost {
                defused: 0,
                total: 3
            })
        );
        // Every fuse resolved as a detonation by then or froze at timeout
        assert!(state.timer <= 0.0);
    }

    #[test]
    fn test_defusing_all_cubes_wins_with_remaining_seconds() {
        let mut state = started(42);
        // 5 s in - safely before the shortest possible fuse (10 s)
        run_ticks(&mut state, 300);
        assert!(state.is_running());

        let expected = state.remaining_whole_seconds();
        let input = TickInput {
            defuse: (0..3)
                .map(|cube| DefuseCommand {
                    cube,
                    generation: state.generation,
                })
                .collect(),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        assert_eq!(state.phase, RoundPhase::Stopped);
        assert_eq!(state.result, Some(RoundResult::Won { score: expected }));
        for cube in &state.cubes {
            assert_eq!(cube.outcome, Outcome::Defused);
            assert!(cube.body.has_gravity);
        }
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn test_stale_defuse_is_dropped() {
        let mut state = started(42);
        let stale_generation = state.generation;
        state.stop_round();
        state.start_round().unwrap();

        let input = TickInput {
            defuse: vec![DefuseCommand {
                cube: 0,
                generation: stale_generation,
            }],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        assert!(state.defused.is_empty());
        assert!(state.cubes[0].fuse.is_armed());
        assert_eq!(state.cubes[0].outcome, Outcome::Pending);
    }

    #[test]
    fn test_fuse_completion_detonates_once() {
        let mut state = started(42);
        // Longest possible fuse is 15 s
        run_ticks(&mut state, 16 * 60);
        for cube in &state.cubes {
            assert_eq!(cube.outcome, Outcome::Detonated);
            assert!(cube.body.has_gravity);
        }
        let detonations = state
            .take_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::CubeDetonated { .. }))
            .count();
        assert_eq!(detonations, 3);
    }

    #[test]
    fn test_detonated_cube_falls_to_floor() {
        let mut state = started(42);
        run_ticks(&mut state, 16 * 60);
        // Let the physics play out well past the round
        run_ticks(&mut state, 60 * 60);
        let floor_y = FLOOR_PLANE_Y + CUBE_HALF_EXTENT;
        for cube in &state.cubes {
            assert_eq!(cube.body.position.y, floor_y);
            assert_eq!(cube.body.velocity.y, 0.0);
        }
    }

    #[test]
    fn test_rotation_input_kills_spin_and_r_restores() {
        let mut state = started(7);
        let rotate = TickInput {
            rotating: true,
            rotate_x: 2.0,
            ..Default::default()
        };
        tick(&mut state, &rotate, SIM_DT);
        assert!(state.cubes.iter().all(|c| !c.spinning));

        let restore = TickInput {
            toggle_spin: true,
            ..Default::default()
        };
        tick(&mut state, &restore, SIM_DT);
        assert!(state.cubes.iter().all(|c| c.spinning));
    }

    #[test]
    fn test_advance_frame_substeps_and_one_shots() {
        let mut state = GameState::new(5, Tuning::default());
        let mut accumulator = 0.0;

        // A long frame runs multiple substeps but toggles only once
        let input = TickInput {
            toggle_round: true,
            ..Default::default()
        };
        let steps = advance_frame(&mut state, &input, 3.5 * SIM_DT, &mut accumulator);
        assert_eq!(steps, 3);
        assert!(state.is_running());
        assert!(accumulator < SIM_DT);

        // A backlogged accumulator is capped at MAX_SUBSTEPS ticks
        let ticks_before = state.time_ticks;
        let mut backlog = 1.0;
        advance_frame(&mut state, &TickInput::default(), 0.0, &mut backlog);
        assert_eq!(state.time_ticks - ticks_before, MAX_SUBSTEPS as u64);
        assert!(backlog > 0.0);
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed and input sequence stay identical
        let mut a = started(99_999);
        let mut b = started(99_999);

        let inputs = [
            TickInput::default(),
            TickInput {
                rotating: true,
                rotate_y: 2.0,
                ..Default::default()
            },
            TickInput {
                defuse: vec![DefuseCommand {
                    cube: 1,
                    generation: 1,
                }],
                ..Default::default()
            },
            TickInput::default(),
        ];

        for input in &inputs {
            for _ in 0..120 {
                tick(&mut a, input, SIM_DT);
                tick(&mut b, input, SIM_DT);
            }
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.defused, b.defused);
        assert!((a.timer - b.timer).abs() < 1e-6);
        for (ca, cb) in a.cubes.iter().zip(b.cubes.iter()) {
            assert_eq!(ca.body.position, cb.body.position);
            assert_eq!(ca.orientation, cb.orientation);
            assert_eq!(ca.fuse.progress(), cb.fuse.progress());
        }
    }
}
