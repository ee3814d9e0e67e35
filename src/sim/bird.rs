//! The player-controlled body

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Vertical physics state of the player. The x position never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    pub x: f32,
    /// Top edge, screen coordinates (y grows downward)
    pub y: f32,
    pub velocity: f32,
    /// Tilt derived from velocity, radians
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    /// Selected cosmetic id
    pub cosmetic: String,
}

impl Bird {
    pub fn new(tuning: &Tuning, cosmetic: impl Into<String>) -> Self {
        Self {
            x: tuning.bird_x,
            y: tuning.bird_start_y(),
            velocity: 0.0,
            rotation: 0.0,
            width: tuning.bird_width,
            height: tuning.bird_height,
            cosmetic: cosmetic.into(),
        }
    }

    /// Apply one tick of gravity and update the derived tilt
    pub fn integrate(&mut self, tuning: &Tuning) {
        self.velocity += tuning.gravity;
        self.y += self.velocity;
        self.rotation = (self.velocity * tuning.rotation_scale)
            .clamp(-tuning.max_rotation, tuning.max_rotation);
    }

    /// Jump: overwrite velocity with the jump force, whatever it was
    pub fn flap(&mut self, tuning: &Tuning) {
        self.velocity = tuning.jump_force;
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_accumulates() {
        let tuning = Tuning::default();
        let mut bird = Bird::new(&tuning, "classic");
        assert_eq!(bird.y, 300.0);

        for _ in 0..10 {
            bird.integrate(&tuning);
        }
        assert!((bird.velocity - 2.5).abs() < 1e-6);
        // 0.25 * (1 + 2 + ... + 10)
        assert!((bird.y - (300.0 + 13.75)).abs() < 1e-4);
    }

    #[test]
    fn test_flap_overwrites_velocity() {
        let tuning = Tuning::default();
        let mut bird = Bird::new(&tuning, "classic");

        bird.velocity = 9.75;
        bird.flap(&tuning);
        assert_eq!(bird.velocity, -6.0);

        // Repeated flaps do not stack
        bird.flap(&tuning);
        bird.flap(&tuning);
        assert_eq!(bird.velocity, -6.0);
    }

    #[test]
    fn test_rotation_is_clamped() {
        let tuning = Tuning::default();
        let mut bird = Bird::new(&tuning, "classic");

        bird.velocity = 20.0;
        bird.integrate(&tuning);
        assert!((bird.rotation - tuning.max_rotation).abs() < 1e-6);

        bird.velocity = -30.0;
        bird.integrate(&tuning);
        assert!((bird.rotation + tuning.max_rotation).abs() < 1e-6);

        bird.velocity = 0.75;
        bird.integrate(&tuning);
        assert!((bird.rotation - 0.1).abs() < 1e-6);
    }
}
