//! Distance-based balloon spawning

use serde::{Deserialize, Serialize};

/// Tracks scrolled distance since the last spawn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnScheduler {
    pub distance_since_last_spawn: f32,
}

impl SpawnScheduler {
    pub fn reset(&mut self) {
        self.distance_since_last_spawn = 0.0;
    }

    /// Advance one tick. Returns true when a balloon should spawn.
    ///
    /// A spawning tick resets the distance instead of accumulating.
    pub fn advance(&mut self, speed: f32, spacing: f32) -> bool {
        if self.distance_since_last_spawn >= spacing {
            self.distance_since_last_spawn = 0.0;
            true
        } else {
            self.distance_since_last_spawn += speed;
            false
        }
    }
}
