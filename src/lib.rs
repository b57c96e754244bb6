//! Popper Pig - a balloon-popping arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pig physics, balloon stream, collisions, session rules)
//! - `platform`: Render surface the simulation is drawn through
//! - `audio`: Sound effects and playback sinks
//! - `persistence`: Best score storage
//! - `settings`: Player preferences
//! - `game`: Fixed timestep driver wiring the simulation to its collaborators

pub mod audio;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::Settings;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
///
/// Sizes are ratios of the viewport so gameplay is resolution independent.
/// Speeds are in pixels per tick.
pub mod consts {
    /// Simulation rate
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Balloon height as a share of viewport height
    pub const BALLOON_HEIGHT_RATIO: f32 = 0.0693;
    /// Balloon sprite width / height
    pub const BALLOON_ASPECT: f32 = 87.0 / 103.0;
    /// Number of balloon sprites
    pub const BALLOON_VARIANTS: u8 = 4;

    /// Pig height as a share of viewport height
    pub const PIG_HEIGHT_RATIO: f32 = 0.1038;
    /// Pig sprite width / height
    pub const PIG_ASPECT: f32 = 234.0 / 171.0;

    /// Reference balloon width the speed constants were tuned against
    pub const REFERENCE_BALLOON_WIDTH: f32 = 48.467;
    /// Round start speed at the reference balloon width
    pub const BASE_SPEED: f32 = 5.0;
    /// Speed gained per pop, per pixel of balloon width
    pub const SPEED_GAIN_PER_WIDTH: f32 = 0.00025;
    /// Horizontal gap between spawns, in balloon widths
    pub const SPAWN_SPACING_WIDTHS: f32 = 1.2;

    /// Pig control scales with `speed / SPEED_CONTROL_DIVISOR`
    pub const SPEED_CONTROL_DIVISOR: f32 = 5.0;
    pub const PIG_ACCEL: f32 = 0.262;
    pub const PIG_MAX_VELOCITY: f32 = 10.0;

    /// Multiplicative tolerance of the vertical hit band
    pub const HIT_BAND_TOLERANCE: f32 = 1.1;

    /// Balloon stream targets stay within this band of the viewport height
    pub const TARGET_MIN_RATIO: f32 = 0.2;
    pub const TARGET_MAX_RATIO: f32 = 0.7;
    /// Incline bounds as divisors/multipliers of balloon height
    pub const INCLINE_MIN_DIVISOR: f32 = 5.0;
    pub const INCLINE_MAX_RATIO: f32 = 0.8;

    /// Misses allowed at round start
    pub const BASE_MISS_ALLOWANCE: u32 = 10;
    /// Every this many points grants extra misses
    pub const BONUS_SCORE_INTERVAL: u32 = 50;
    pub const BONUS_MISS_ALLOWANCE: u32 = 10;

    /// EndGame lasts this long before the next round can start (0.5 s)
    pub const END_GAME_DELAY_TICKS: u64 = 30;
    /// Balloons left at game over vanish after this long (0.5 s)
    pub const BALLOON_CLEANUP_DELAY_TICKS: u64 = 30;
    /// Pop burst lifetime (0.1 s)
    pub const POP_EFFECT_TICKS: u64 = 6;
    /// Allowance HUD flash (0.1 s)
    pub const ALLOWANCE_FLASH_TICKS: u64 = 6;

    /// Pop burst size relative to the popped balloon
    pub const POP_WIDTH_SCALE: f32 = 92.0 / 87.0;
    pub const POP_HEIGHT_SCALE: f32 = 84.0 / 103.0;
    /// Pig burst at game over
    pub const PIG_BURST_X_SCALE: f32 = 1.2;
    pub const PIG_BURST_ASPECT: f32 = 84.0 / 92.0;
    /// Game over sound volume
    pub const GAME_OVER_VOLUME: f32 = 0.1;

    /// Clouds (2 s apart)
    pub const CLOUD_SPAWN_INTERVAL_TICKS: u64 = 120;
    pub const CLOUD_VARIANTS: u8 = 4;
    pub const CLOUD_ASPECT: f32 = 690.0 / 343.0;
}

/// Axis-aligned rectangle anchored at its bottom-left corner (y grows upward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Center point of the rectangle
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Inclusive integer roll between truncated float bounds, returned as a float.
///
/// Collapses to `lo` when the bounds cross.
pub fn roll_int<R: rand::Rng + ?Sized>(rng: &mut R, lo: i64, hi: i64) -> f32 {
    if hi <= lo {
        return lo as f32;
    }
    rng.random_range(lo..=hi) as f32
}
