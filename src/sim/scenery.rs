//! Cosmetic entities: pop bursts and background clouds
//!
//! Nothing here affects gameplay. Cloud rolls come from the scenery RNG so the
//! balloon stream is identical with or without them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::RoundConfig;
use crate::consts::*;
use crate::{Rect, roll_int};

/// Short-lived burst left where something popped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopEffect {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
}

impl PopEffect {
    /// Burst sized from the balloon it replaces
    pub fn for_balloon(id: u32, balloon: Rect) -> Self {
        Self {
            id,
            pos: balloon.pos,
            size: Vec2::new(
                balloon.size.x * POP_WIDTH_SCALE,
                balloon.size.y * POP_HEIGHT_SCALE,
            ),
        }
    }

    /// Burst left behind by the pig at game over
    pub fn for_pig(id: u32, pig: Rect) -> Self {
        Self {
            id,
            pos: Vec2::new(pig.pos.x * PIG_BURST_X_SCALE, pig.pos.y),
            size: Vec2::new(pig.size.y * PIG_BURST_ASPECT, pig.size.y),
        }
    }

    /// Scrolls with the balloons
    pub fn advance(&mut self, speed: f32) {
        self.pos.x -= speed;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Decorative cloud drifting a little faster than the game speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Extra pixels per tick on top of the game speed
    pub drift: f32,
    pub opacity: f32,
    pub variant: u8,
}

impl Cloud {
    /// Roll a new cloud just past the right edge
    pub fn roll<R: Rng + ?Sized>(id: u32, config: &RoundConfig, rng: &mut R) -> Self {
        let view = config.viewport;
        let height = view.height * roll_int(rng, 10, 50) / 100.0;
        let y = roll_int(rng, -(height as i64), view.height as i64);
        let unit = config.balloon_size.x / REFERENCE_BALLOON_WIDTH;
        // At least 1 px per tick so clouds still leave while the game is stopped
        let drift = roll_int(rng, (unit as i64).max(1), (unit * 7.5) as i64);
        let variant = rng.random_range(0..CLOUD_VARIANTS);
        let opacity = roll_int(rng, 1, 50) / 100.0;
        Self {
            id,
            pos: Vec2::new(view.width, y),
            size: Vec2::new(height * CLOUD_ASPECT, height),
            drift,
            opacity,
            variant,
        }
    }

    pub fn advance(&mut self, speed: f32) {
        self.pos.x -= speed + self.drift;
    }

    pub fn is_gone(&self) -> bool {
        self.pos.x <= -self.size.x
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}
