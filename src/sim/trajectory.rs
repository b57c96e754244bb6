//! Vertical waypoints for the balloon stream
//!
//! Balloons do not wander independently. The stream as a whole travels up or
//! down toward a random target in steps of `incline`, one step per spawned
//! balloon, producing a smooth wave across many successive balloons. Only the
//! most recently emitted position drives the next one.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::roll_int;

/// Direction the spawn envelope is travelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Heading {
    /// No target rolled yet this round
    #[default]
    Uninitialized,
    Up,
    Down,
}

/// Shared state of the balloon stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryState {
    /// Last emitted vertical position
    pub spawn_y: f32,
    /// Current destination
    pub target_y: f32,
    pub heading: Heading,
    /// Step per balloon, re-rolled with each new target
    pub incline: f32,
}

impl TrajectoryState {
    /// Fresh stream starting at mid-height with no target
    pub fn new(viewport_height: f32) -> Self {
        Self {
            spawn_y: viewport_height / 2.0,
            target_y: 0.0,
            heading: Heading::Uninitialized,
            incline: 0.0,
        }
    }

    /// Whether the spawn position has reached or passed its target
    pub fn needs_new_target(&self) -> bool {
        match self.heading {
            Heading::Uninitialized => true,
            Heading::Up => self.spawn_y > self.target_y,
            Heading::Down => self.spawn_y < self.target_y,
        }
    }

    /// Emit the vertical position of the next balloon.
    ///
    /// Either rolls a new target/incline/heading (leaving `spawn_y` where it
    /// is) or steps `spawn_y` one incline toward the current target.
    pub fn next_spawn_y<R: Rng + ?Sized>(
        &mut self,
        balloon_height: f32,
        viewport_height: f32,
        rng: &mut R,
    ) -> f32 {
        if self.needs_new_target() {
            self.roll_target(balloon_height, viewport_height, rng);
        } else {
            match self.heading {
                Heading::Up => self.spawn_y += self.incline,
                Heading::Down => self.spawn_y -= self.incline,
                Heading::Uninitialized => {}
            }
        }
        self.spawn_y
    }

    fn roll_target<R: Rng + ?Sized>(
        &mut self,
        balloon_height: f32,
        viewport_height: f32,
        rng: &mut R,
    ) {
        self.incline = roll_int(
            rng,
            (balloon_height / INCLINE_MIN_DIVISOR) as i64,
            (balloon_height * INCLINE_MAX_RATIO) as i64,
        );
        self.target_y = roll_int(
            rng,
            (viewport_height * TARGET_MIN_RATIO).floor() as i64,
            (viewport_height * TARGET_MAX_RATIO).floor() as i64,
        );
        self.heading = if self.spawn_y > self.target_y {
            Heading::Down
        } else {
            Heading::Up
        };
        log::debug!(
            "Balloon stream heading {:?} toward y={} (incline {})",
            self.heading,
            self.target_y,
            self.incline
        );
    }
}
