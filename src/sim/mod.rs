//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (speeds are pixels per tick)
//! - Seeded RNG only
//! - Stable iteration order (arena slot order)
//! - No rendering, audio or storage calls; collaborators consume `GameEvent`s

pub mod balloon;
pub mod collision;
pub mod pig;
pub mod scenery;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;
pub mod trajectory;

pub use balloon::{Balloon, BalloonArena, BalloonId};
pub use collision::{CollisionOutcome, is_hit, is_miss, resolve};
pub use pig::{ControlSignal, Pig, PigStep};
pub use scenery::{Cloud, PopEffect};
pub use spawn::SpawnScheduler;
pub use state::{GameEvent, GameStage, GameState, HudState, RoundConfig, Viewport};
pub use tick::{TickInput, tick};
pub use timers::{DeferredAction, TimerOwner, TimerQueue};
pub use trajectory::{Heading, TrajectoryState};
