//! Balloons and the arena that owns them
//!
//! A balloon only knows its position and size. Whether it is live is decided
//! by membership in the [`BalloonArena`]; removal frees the slot and bumps its
//! generation so stale ids can never touch a newer balloon.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;

/// Generational handle to a balloon slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BalloonId {
    pub index: u32,
    pub generation: u32,
}

/// A scrolling balloon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balloon {
    pub id: BalloonId,
    /// Bottom-left corner
    pub pos: Vec2,
    /// Shared by every balloon in a round
    pub size: Vec2,
    /// Sprite index (cosmetic only)
    pub variant: u8,
}

impl Balloon {
    /// Move left by `speed` pixels per tick
    pub fn advance(&mut self, ticks: u32, speed: f32) {
        self.pos.x -= speed * ticks as f32;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Fully past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.x < -self.size.x
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot {
    generation: u32,
    balloon: Option<Balloon>,
}

/// Indexed collection of live balloons
///
/// Iteration follows slot order, which keeps the simulation deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalloonArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl BalloonArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a balloon and return its id
    pub fn insert(&mut self, pos: Vec2, size: Vec2, variant: u8) -> BalloonId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    balloon: None,
                });
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = BalloonId {
            index,
            generation: slot.generation,
        };
        slot.balloon = Some(Balloon {
            id,
            pos,
            size,
            variant,
        });
        self.live += 1;
        id
    }

    /// Remove a live balloon. Stale or unknown ids return `None`.
    pub fn remove(&mut self, id: BalloonId) -> Option<Balloon> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let balloon = slot.balloon.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(balloon)
    }

    pub fn get(&self, id: BalloonId) -> Option<&Balloon> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.balloon.as_ref())
    }

    pub fn get_mut(&mut self, id: BalloonId) -> Option<&mut Balloon> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.balloon.as_mut())
    }

    pub fn contains(&self, id: BalloonId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Balloon> {
        self.slots.iter().filter_map(|slot| slot.balloon.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Balloon> {
        self.slots.iter_mut().filter_map(|slot| slot.balloon.as_mut())
    }

    /// Ids of every live balloon, in slot order
    pub fn ids(&self) -> Vec<BalloonId> {
        self.iter().map(|b| b.id).collect()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Remove everything, invalidating all outstanding ids
    pub fn clear(&mut self) {
        for id in self.ids() {
            self.remove(id);
        }
    }
}
