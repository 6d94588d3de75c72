use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    time::Duration,
};

use theme_match_system_spawning::Placement;

/// Pipeline step that resumes once its delay has elapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Continuation {
    /// A swap finished moving; run a match check.
    SwapSettled,
    /// A spawned piece finished bouncing in; run a match check.
    SpawnSettled,
    /// A drop batch finished falling; run the next match check.
    DropSettled,
    /// A planned spawn is due.
    Spawn(Placement),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Scheduled {
    at: Duration,
    sequence: u64,
    continuation: Continuation,
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at
            .cmp(&other.at)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of continuations keyed by fire time; ties fire in scheduling order.
#[derive(Debug, Default)]
pub(crate) struct Timeline {
    queue: BinaryHeap<Reverse<Scheduled>>,
    next_sequence: u64,
}

impl Timeline {
    pub(crate) fn schedule(&mut self, at: Duration, continuation: Continuation) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(Reverse(Scheduled {
            at,
            sequence,
            continuation,
        }));
    }

    /// Removes the earliest continuation whose fire time is not after `now`.
    pub(crate) fn pop_due(&mut self, now: Duration) -> Option<(Duration, Continuation)> {
        let Reverse(next) = self.queue.peek()?;
        if next.at > now {
            return None;
        }
        self.queue
            .pop()
            .map(|Reverse(entry)| (entry.at, entry.continuation))
    }

    pub(crate) fn clear(&mut self) {
        self.queue.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}
