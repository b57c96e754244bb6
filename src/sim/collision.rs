//! Pig/balloon collision tests
//!
//! Resolution is pure: it reports which balloons were popped and which were
//! missed, and the session applies the consequences.

use super::balloon::{Balloon, BalloonArena, BalloonId};
use super::pig::Pig;
use crate::consts::HIT_BAND_TOLERANCE;

/// Outcomes of one tick's collision pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    /// Balloons the pig popped
    pub hits: Vec<BalloonId>,
    /// Balloons that left the playfield unresolved
    pub misses: Vec<BalloonId>,
}

impl CollisionOutcome {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty() && self.misses.is_empty()
    }
}

/// Whether the pig pops this balloon.
///
/// Horizontally the balloon's left edge must lie in `[0, pig right edge]`.
/// Vertically its bottom edge must lie in the band
/// `[pig.y / 1.1, (pig.y + pig.height) * 1.1]`. The band is multiplicative
/// and therefore grows with altitude; it is kept as-is for behavioural parity.
pub fn is_hit(pig: &Pig, balloon: &Balloon) -> bool {
    let x = balloon.pos.x;
    let y = balloon.pos.y;
    let pig_box = pig.bounds();

    let in_reach = x >= 0.0 && x <= pig_box.right();
    let in_band =
        y >= pig_box.pos.y / HIT_BAND_TOLERANCE && y <= pig_box.top() * HIT_BAND_TOLERANCE;
    in_reach && in_band
}

/// Whether the balloon got past the pig
pub fn is_miss(balloon: &Balloon) -> bool {
    balloon.is_off_screen()
}

/// Test every live balloon against the pig.
///
/// Each balloon yields at most one outcome; a hit needs `x >= 0` and a miss
/// needs `x < -width`, so the two never coincide.
pub fn resolve(pig: &Pig, balloons: &BalloonArena) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    for balloon in balloons.iter() {
        if is_hit(pig, balloon) {
            outcome.hits.push(balloon.id);
        } else if is_miss(balloon) {
            outcome.misses.push(balloon.id);
        }
    }
    outcome
}
