//! Deferred one-shot actions
//!
//! Delayed effects are queued against the tick they fire on and drained by the
//! tick loop. Each timer has an owner; removing the owner cancels its timers,
//! so nothing fires for an entity that is already gone.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use super::balloon::BalloonId;

/// Entity a timer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerOwner {
    Balloon(BalloonId),
    /// Cosmetic effect (pop burst) by entity id
    Effect(u32),
    Session,
}

/// What happens when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Remove a balloon without popping it
    DespawnBalloon(BalloonId),
    /// Remove a pop burst
    ExpireEffect(u32),
    /// Restore the allowance HUD indicator
    EndAllowanceFlash,
    /// Tear down the finished round and await the next start
    ReturnToReady,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    fire_tick: u64,
    seq: u64,
    owner: TimerOwner,
    action: DeferredAction,
}

// Reversed so the max-heap pops the earliest (fire_tick, seq) first
impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.fire_tick, other.seq).cmp(&(self.fire_tick, self.seq))
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timer {}

/// Priority queue of pending actions keyed by fire tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    heap: BinaryHeap<Timer>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire `delay_ticks` after `now`
    pub fn schedule(
        &mut self,
        now: u64,
        delay_ticks: u64,
        owner: TimerOwner,
        action: DeferredAction,
    ) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Timer {
            fire_tick: now + delay_ticks,
            seq,
            owner,
            action,
        });
    }

    /// Drop every timer belonging to `owner`. Returns how many were removed.
    pub fn cancel_owner(&mut self, owner: TimerOwner) -> usize {
        let before = self.heap.len();
        self.heap.retain(|t| t.owner != owner);
        before - self.heap.len()
    }

    /// Pop every action due at or before `now`, in firing order
    pub fn drain_due(&mut self, now: u64) -> Vec<DeferredAction> {
        let mut due = Vec::new();
        while self.heap.peek().is_some_and(|t| t.fire_tick <= now) {
            if let Some(timer) = self.heap.pop() {
                due.push(timer.action);
            }
        }
        due
    }

    pub fn is_pending(&self, owner: TimerOwner) -> bool {
        self.heap.iter().any(|t| t.owner == owner)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balloon(index: u32) -> BalloonId {
        BalloonId {
            index,
            generation: 0,
        }
    }

    #[test]
    fn test_fires_in_tick_then_insertion_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(10, 5, TimerOwner::Session, DeferredAction::ReturnToReady);
        timers.schedule(10, 2, TimerOwner::Effect(1), DeferredAction::ExpireEffect(1));
        timers.schedule(11, 1, TimerOwner::Effect(2), DeferredAction::ExpireEffect(2));

        assert!(timers.drain_due(11).is_empty());
        assert_eq!(
            timers.drain_due(12),
            vec![DeferredAction::ExpireEffect(1), DeferredAction::ExpireEffect(2)]
        );
        assert!(timers.drain_due(14).is_empty());
        assert_eq!(timers.drain_due(20), vec![DeferredAction::ReturnToReady]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancel_owner() {
        let mut timers = TimerQueue::new();
        let a = balloon(0);
        let b = balloon(1);
        timers.schedule(0, 30, TimerOwner::Balloon(a), DeferredAction::DespawnBalloon(a));
        timers.schedule(0, 30, TimerOwner::Balloon(b), DeferredAction::DespawnBalloon(b));
        timers.schedule(0, 30, TimerOwner::Session, DeferredAction::ReturnToReady);

        assert_eq!(timers.cancel_owner(TimerOwner::Balloon(a)), 1);
        assert!(!timers.is_pending(TimerOwner::Balloon(a)));
        assert_eq!(timers.cancel_owner(TimerOwner::Balloon(a)), 0);
        assert_eq!(
            timers.drain_due(30),
            vec![DeferredAction::DespawnBalloon(b), DeferredAction::ReturnToReady]
        );
    }

    #[test]
    fn test_zero_delay_fires_on_same_tick() {
        let mut timers = TimerQueue::new();
        timers.schedule(7, 0, TimerOwner::Session, DeferredAction::EndAllowanceFlash);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.drain_due(7), vec![DeferredAction::EndAllowanceFlash]);
    }
}
