//! Platform abstraction layer
//!
//! The simulation is drawn through a [`RenderSurface`]: the driver places a
//! sprite for every live entity each frame and removes sprites for entities
//! that have gone. Backends decide how sprites map to pixels.

use std::collections::HashMap;

use crate::Rect;
use crate::sim::BalloonId;

/// Stable identity of something drawn on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    Pig,
    Balloon(BalloonId),
    Pop(u32),
    Cloud(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Pig,
    Balloon,
    Pop,
    Cloud,
}

/// What to draw and where
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    /// Bounding box, origin at the bottom-left
    pub rect: Rect,
    /// Artwork variant
    pub variant: u8,
    pub opacity: f32,
}

impl Sprite {
    pub fn new(kind: SpriteKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            variant: 0,
            opacity: 1.0,
        }
    }

    pub fn with_variant(mut self, variant: u8) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Drawing backend
pub trait RenderSurface {
    /// Create or move the sprite for `id`
    fn place(&mut self, id: EntityId, sprite: Sprite);

    /// Drop the sprite for `id`; unknown ids are ignored
    fn remove(&mut self, id: EntityId);
}

/// Surface that just remembers what is on it
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    sprites: HashMap<EntityId, Sprite>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: EntityId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Number of sprites of one kind
    pub fn count(&self, kind: SpriteKind) -> usize {
        self.sprites.values().filter(|s| s.kind == kind).count()
    }
}

impl RenderSurface for HeadlessSurface {
    fn place(&mut self, id: EntityId, sprite: Sprite) {
        self.sprites.insert(id, sprite);
    }

    fn remove(&mut self, id: EntityId) {
        self.sprites.remove(&id);
    }
}
