//! The player-controlled pig
//!
//! Holding the control accelerates upward, releasing it accelerates downward.
//! Acceleration and the velocity cap both scale with game speed so the pig
//! handles the same relative to the balloons as the game speeds up.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::RoundConfig;
use crate::Rect;
use crate::consts::*;

/// Control signal sampled once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlSignal {
    /// Control held
    Up,
    /// Control released
    #[default]
    Down,
}

/// Result of a physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PigStep {
    Moved,
    /// Game speed has dropped to zero; the round must end
    Stalled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pig {
    /// Bottom-left corner
    pub pos: Vec2,
    /// Vertical velocity (pixels per tick, positive is up)
    pub velocity: f32,
    pub size: Vec2,
}

impl Pig {
    /// Place a pig at its round start position
    pub fn spawn(config: &RoundConfig) -> Self {
        Self {
            pos: Vec2::new(config.pig_size.x / 2.0, config.viewport.height / 2.0),
            velocity: 0.0,
            size: config.pig_size,
        }
    }

    /// Integrate one tick of vertical motion
    pub fn apply_control(&mut self, signal: ControlSignal, speed: f32) -> PigStep {
        if speed.floor() <= 0.0 {
            return PigStep::Stalled;
        }

        let scale = speed / SPEED_CONTROL_DIVISOR;
        let accel = scale * PIG_ACCEL;
        let max_velocity = scale * PIG_MAX_VELOCITY;

        self.velocity = match signal {
            ControlSignal::Up => (self.velocity + accel).min(max_velocity),
            ControlSignal::Down => (self.velocity - accel).max(-max_velocity),
        };
        self.pos.y += self.velocity;
        PigStep::Moved
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Left the playfield by more than a full body height
    pub fn is_out_of_bounds(&self, viewport_height: f32) -> bool {
        self.pos.y < -self.size.y || self.pos.y > viewport_height + self.size.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;

    fn pig() -> Pig {
        Pig::spawn(&RoundConfig::from_viewport(Viewport::new(800.0, 600.0)))
    }

    #[test]
    fn test_spawn_position() {
        let pig = pig();
        assert!((pig.size.y - 600.0 * PIG_HEIGHT_RATIO).abs() < 1e-3);
        assert!((pig.size.x - pig.size.y * PIG_ASPECT).abs() < 1e-3);
        assert_eq!(pig.pos.x, pig.size.x / 2.0);
        assert_eq!(pig.pos.y, 300.0);
        assert_eq!(pig.velocity, 0.0);
    }

    #[test]
    fn test_up_accelerates() {
        let mut pig = pig();
        // speed 5 makes the scale exactly 1
        assert_eq!(pig.apply_control(ControlSignal::Up, 5.0), PigStep::Moved);
        assert!((pig.velocity - 0.262).abs() < 1e-6);
        assert!((pig.pos.y - 300.262).abs() < 1e-3);

        pig.apply_control(ControlSignal::Up, 5.0);
        assert!((pig.velocity - 0.524).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_capped_both_ways() {
        let mut pig = pig();
        for _ in 0..200 {
            pig.apply_control(ControlSignal::Up, 10.0);
        }
        assert!((pig.velocity - 20.0).abs() < 1e-4);

        for _ in 0..400 {
            pig.apply_control(ControlSignal::Down, 10.0);
        }
        assert!((pig.velocity + 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_control_scales_with_speed() {
        let mut slow = pig();
        let mut fast = pig();
        slow.apply_control(ControlSignal::Down, 5.0);
        fast.apply_control(ControlSignal::Down, 10.0);
        assert!((fast.velocity - 2.0 * slow.velocity).abs() < 1e-6);
    }

    #[test]
    fn test_stalls_below_one_pixel_per_tick() {
        let mut pig = pig();
        let before = pig.clone();
        assert_eq!(pig.apply_control(ControlSignal::Up, 0.0), PigStep::Stalled);
        assert_eq!(pig.apply_control(ControlSignal::Up, 0.99), PigStep::Stalled);
        assert_eq!(pig, before);
        assert_eq!(pig.apply_control(ControlSignal::Up, 1.0), PigStep::Moved);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut pig = pig();
        let h = pig.size.y;
        pig.pos.y = -h;
        assert!(!pig.is_out_of_bounds(600.0));
        pig.pos.y = -h - 0.1;
        assert!(pig.is_out_of_bounds(600.0));
        pig.pos.y = 600.0 + h;
        assert!(!pig.is_out_of_bounds(600.0));
        pig.pos.y = 600.0 + h + 1.0;
        assert!(pig.is_out_of_bounds(600.0));
    }
}
