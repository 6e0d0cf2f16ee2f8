//! Session input state
//!
//! One `InputState` is owned by the session controller. Raw platform
//! listeners (an external collaborator) feed it key and pointer
//! transitions; once per frame it is drained into a `sim::TickInput`.
//! Cubes never install listeners of their own.

use std::collections::HashSet;

use crate::sim::tick::{DefuseCommand, DragCommand, TickInput};

/// Logical keys the game reacts to while held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    RotateUp,
    RotateDown,
    RotateLeft,
    RotateRight,
    LightForward,
    LightLeft,
    LightBack,
    LightRight,
}

impl Key {
    /// Map a platform key name (lowercased) to a logical key
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "w" | "arrowup" => Some(Key::RotateUp),
            "s" | "arrowdown" => Some(Key::RotateDown),
            "a" | "arrowleft" => Some(Key::RotateLeft),
            "d" | "arrowright" => Some(Key::RotateRight),
            "i" => Some(Key::LightForward),
            "j" => Some(Key::LightLeft),
            "k" => Some(Key::LightBack),
            "l" => Some(Key::LightRight),
            _ => None,
        }
    }

    fn is_rotate(&self) -> bool {
        matches!(
            self,
            Key::RotateUp | Key::RotateDown | Key::RotateLeft | Key::RotateRight
        )
    }
}

/// Held keys plus edge-triggered commands gathered between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    toggle_round: bool,
    toggle_spin: bool,
    speed_down: bool,
    speed_up: bool,
    defuse: Vec<DefuseCommand>,
    /// Cube being dragged plus accumulated normalized movement
    drag: Option<(usize, f32, f32)>,
}

impl InputState {
    /// Key pressed; one-shot keys fire on the down edge
    pub fn key_down(&mut self, name: &str) {
        match name {
            "r" => self.toggle_spin = true,
            "1" => self.speed_down = true,
            "2" => self.speed_up = true,
            _ => {
                if let Some(key) = Key::from_name(name) {
                    self.held.insert(key);
                }
            }
        }
    }

    pub fn key_up(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.held.remove(&key);
        }
    }

    /// PLAY/PAUSE button
    pub fn toggle_round(&mut self) {
        self.toggle_round = true;
    }

    /// Click on cube `cube`'s target, against the current round generation
    pub fn click_target(&mut self, cube: usize, generation: u64) {
        self.defuse.push(DefuseCommand { cube, generation });
    }

    pub fn begin_drag(&mut self, cube: usize) {
        self.drag = Some((cube, 0.0, 0.0));
    }

    /// Pointer moved while dragging; deltas in pixels over viewport size
    pub fn drag_move(&mut self, dx_px: f32, dy_px: f32, viewport_w: f32, viewport_h: f32) {
        if let Some((_, dx, dy)) = &mut self.drag {
            *dx += dx_px / viewport_w.max(1.0);
            *dy += dy_px / viewport_h.max(1.0);
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    fn held_axis(&self, neg: Key, pos: Key) -> f32 {
        let mut v = 0.0;
        if self.held.contains(&neg) {
            v -= 1.0;
        }
        if self.held.contains(&pos) {
            v += 1.0;
        }
        v
    }

    /// Drain into the commands for one simulation tick
    ///
    /// Held keys translate to per-tick rotation/light deltas; edge
    /// commands fire once and clear. Drag movement is consumed but the
    /// grab itself persists until `end_drag`.
    pub fn frame_input(&mut self, key_rotation_degrees: f32) -> TickInput {
        let rotate_x = self.held_axis(Key::RotateUp, Key::RotateDown) * key_rotation_degrees;
        let rotate_y = self.held_axis(Key::RotateLeft, Key::RotateRight) * key_rotation_degrees;
        let rotating = self.held.iter().any(Key::is_rotate);

        let drag = match &mut self.drag {
            Some((cube, dx, dy)) if *dx != 0.0 || *dy != 0.0 => {
                let cmd = DragCommand {
                    cube: *cube,
                    dx: *dx,
                    dy: *dy,
                };
                *dx = 0.0;
                *dy = 0.0;
                Some(cmd)
            }
            _ => None,
        };

        TickInput {
            toggle_round: std::mem::take(&mut self.toggle_round),
            defuse: std::mem::take(&mut self.defuse),
            rotate_x,
            rotate_y,
            rotating,
            drag,
            toggle_spin: std::mem::take(&mut self.toggle_spin),
            speed_down: std::mem::take(&mut self.speed_down),
            speed_up: std::mem::take(&mut self.speed_up),
            light_x: self.held_axis(Key::LightLeft, Key::LightRight),
            light_z: self.held_axis(Key::LightForward, Key::LightBack),
        }
    }
}
