//! HUD display strings
//!
//! The page layout is an external collaborator; this module only produces
//! the text it shows.

use crate::clock_string;
use crate::sim::{GameState, RoundResult};

/// Countdown as `mm:ss`
pub fn clock(state: &GameState) -> String {
    clock_string(state.remaining_whole_seconds())
}

/// Label for the PLAY/PAUSE toggle button
pub fn play_button_label(state: &GameState) -> &'static str {
    if state.is_running() { "PAUSE" } else { "PLAY" }
}

/// Defused-so-far tally, e.g. `2/3`
pub fn tally(state: &GameState) -> String {
    format!("{}/{}", state.defused.len(), state.cubes.len())
}

/// Win/lose banner for a finished round
pub fn banner(state: &GameState) -> Option<String> {
    match state.result? {
        RoundResult::Won { score } => Some(format!("DEFUSED! Score: {score}")),
        RoundResult::Lost { defused, total } => {
            Some(format!("BOOM! {defused}/{total} defused"))
        }
    }
}
