//! HoldFast entry point
//!
//! The browser front end drives the library from its own render loop; this
//! native binary runs a headless autopilot round for quick inspection of
//! the simulation.

use std::time::{SystemTime, UNIX_EPOCH};

use holdfast::consts::SIM_DT;
use holdfast::hud;
use holdfast::input::InputState;
use holdfast::sim::{GameState, advance_frame};
use holdfast::{Difficulty, Tuning};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let difficulty = args
        .next()
        .and_then(|s| Difficulty::from_str(&s))
        .unwrap_or_default();
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    let tuning = Tuning::from_preset(difficulty);
    log::info!(
        "HoldFast (native) starting: seed {seed}, {} preset",
        difficulty.as_str()
    );
    if let Ok(json) = serde_json::to_string(&tuning) {
        log::debug!("tuning: {json}");
    }

    let mut state = GameState::new(seed, tuning);
    let mut input = InputState::default();
    input.toggle_round();

    // Autopilot: defuse cubes one by one, quickly enough to beat even the
    // shortest tuned fuse
    let cube_count = state.cubes.len();
    let mut next_defuse = 1.0_f32;
    let mut clicked = 0usize;

    let mut elapsed = 0.0_f32;
    let mut last_clock = String::new();
    let mut accumulator = 0.0_f32;

    loop {
        let frame = input.frame_input(state.tuning.key_rotation_degrees);
        advance_frame(&mut state, &frame, SIM_DT, &mut accumulator);
        elapsed += SIM_DT;

        if state.is_running() && clicked < cube_count && elapsed >= next_defuse {
            input.click_target(clicked, state.generation);
            clicked += 1;
            next_defuse += 0.75;
        }

        for event in state.take_events() {
            log::debug!("{event:?}");
        }

        let clock = hud::clock(&state);
        if clock != last_clock {
            println!(
                "{clock}  [{}]  defused {}",
                hud::play_button_label(&state),
                hud::tally(&state)
            );
            last_clock = clock;
        }

        if state.result.is_some() && !state.is_running() {
            break;
        }
        // Safety stop in case a tuning change makes the round unwinnable
        if elapsed > 180.0 {
            log::warn!("demo round never resolved, stopping");
            break;
        }
    }

    if let Some(banner) = hud::banner(&state) {
        println!("{banner}");
    }
    log::info!(
        "round over: {} defused, {} detonated",
        state.defused.len(),
        state.detonated_count()
    );
}
