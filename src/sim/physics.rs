//! Gravity and floor-bounce integration
//!
//! Semi-implicit Euler on a single rigid point per cube. Constants are in
//! per-tick units (the simulation runs at a fixed rate), so no dt scaling
//! happens here. Bodies stay inert until a resolved fuse activates them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A cube's rigid body
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Integration only runs once this is set (by a defuse or detonation)
    pub has_gravity: bool,
}

impl Body {
    /// A resting body at the given position
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            has_gravity: false,
        }
    }

    /// Kick the body and enable gravity
    pub fn activate(&mut self, impulse: Vec3) {
        self.velocity += impulse;
        self.has_gravity = true;
    }

    /// Advance one tick: gravity, move, floor clamp with damped bounce
    ///
    /// Vertical speeds below `settle_epsilon` zero out on contact so the
    /// body comes to rest instead of micro-bouncing forever. Inactive
    /// bodies are a pass-through.
    pub fn integrate(&mut self, gravity: f32, floor_y: f32, restitution: f32, settle_epsilon: f32) {
        if !self.has_gravity {
            return;
        }

        self.velocity.y -= gravity;
        self.position += self.velocity;

        if self.position.y <= floor_y {
            self.position.y = floor_y;
            self.velocity.y = -self.velocity.y * restitution;
            if self.velocity.y.abs() < settle_epsilon {
                self.velocity.y = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAVITY: f32 = 0.01;
    const RESTITUTION: f32 = 0.5;
    const EPSILON: f32 = 0.01;
    const FLOOR: f32 = 0.0;

    #[test]
    fn test_inactive_body_is_pass_through() {
        let mut body = Body::at(Vec3::new(1.0, 10.0, -2.0));
        for _ in 0..100 {
            body.integrate(GRAVITY, FLOOR, RESTITUTION, EPSILON);
        }
        assert_eq!(body.position, Vec3::new(1.0, 10.0, -2.0));
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_bounce_flips_and_halves_vertical_speed() {
        let mut body = Body::at(Vec3::new(0.0, 10.0, 0.0));
        body.activate(Vec3::ZERO);

        loop {
            let falling_speed = body.velocity.y - GRAVITY;
            body.integrate(GRAVITY, FLOOR, RESTITUTION, EPSILON);
            if body.position.y == FLOOR {
                // First contact: reflected and damped
                assert!(body.velocity.y > 0.0);
                assert!((body.velocity.y - (-falling_speed * RESTITUTION)).abs() < 1e-6);
                break;
            }
        }
    }

    #[test]
    fn test_body_settles_to_exact_zero() {
        let mut body = Body::at(Vec3::new(0.0, 10.0, 0.0));
        body.activate(Vec3::ZERO);

        for _ in 0..20_000 {
            body.integrate(GRAVITY, FLOOR, RESTITUTION, EPSILON);
        }
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.position.y, FLOOR);
    }

    #[test]
    fn test_horizontal_velocity_unchanged() {
        let mut body = Body::at(Vec3::new(0.0, 5.0, 0.0));
        body.activate(Vec3::new(0.03, 0.2, -0.02));

        for _ in 0..1000 {
            body.integrate(GRAVITY, FLOOR, RESTITUTION, EPSILON);
        }
        // No friction or damping modeled on x/z
        assert_eq!(body.velocity.x, 0.03);
        assert_eq!(body.velocity.z, -0.02);
    }
}
