//! Scheduled-event queue keyed by virtual time.
//!
//! Every timed wait in the match (breaks, stoppages, the momentum lock, event
//! reverts) is an entry here. Entries due at the same millisecond fire in the
//! order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::random_events::{EffectRevert, RandomEventKind};

#[derive(Debug, Clone, PartialEq)]
pub enum TimerAction {
    /// Leave the current phase (end of a break or the post-siren pause).
    AdvancePhase,
    EndStoppage,
    MomentumUnlock,
    RevertEffect { event: RandomEventKind, revert: EffectRevert },
}

#[derive(Debug, Clone)]
struct Scheduled {
    due_ms: u64,
    seq: u64,
    action: TimerAction,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    // Reversed: BinaryHeap is a max-heap and the earliest entry must pop first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due_ms, other.seq).cmp(&(self.due_ms, self.seq))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, action: TimerAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { due_ms, seq, action });
    }

    /// Pop the earliest entry due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<TimerAction> {
        if self.heap.peek()?.due_ms > now_ms {
            return None;
        }
        self.heap.pop().map(|entry| entry.action)
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.heap.peek().map(|entry| entry.due_ms)
    }

    /// Empty the queue, returning every pending action in firing order.
    pub fn drain(&mut self) -> Vec<TimerAction> {
        let mut entries = std::mem::take(&mut self.heap).into_sorted_vec();
        // Sorted ascending by `Ord`, which is reversed, so the latest comes first.
        entries.reverse();
        entries.into_iter().map(|entry| entry.action).collect()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
