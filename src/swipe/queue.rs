//! The candidate queue.

use std::collections::VecDeque;

use crate::api::Dev;

/// Ordered candidates awaiting a decision.
///
/// Insertion order is the backend's ranking order. The front element is the
/// card on top of the stack; the queue is only ever consumed from the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateQueue {
    devs: VecDeque<Dev>,
}

impl CandidateQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole queue with a freshly loaded sequence.
    pub fn replace(&mut self, devs: Vec<Dev>) {
        self.devs = devs.into();
    }

    /// Remove and return the front candidate, leaving the remainder in order.
    pub fn pop_front(&mut self) -> Option<Dev> {
        self.devs.pop_front()
    }

    /// The candidate currently on top.
    pub fn front(&self) -> Option<&Dev> {
        self.devs.front()
    }

    /// Number of candidates left.
    pub fn len(&self) -> usize {
        self.devs.len()
    }

    /// Check whether the queue is exhausted.
    pub fn is_empty(&self) -> bool {
        self.devs.is_empty()
    }

    /// Iterate in queue order.
    pub fn iter(&self) -> impl Iterator<Item = &Dev> {
        self.devs.iter()
    }

    /// Iterate with stacking priority; the front has the highest (`len - index`).
    pub fn stacked(&self) -> impl Iterator<Item = (usize, &Dev)> {
        let len = self.devs.len();
        self.devs
            .iter()
            .enumerate()
            .map(move |(index, dev)| (len - index, dev))
    }
}

impl From<Vec<Dev>> for CandidateQueue {
    fn from(devs: Vec<Dev>) -> Self {
        Self { devs: devs.into() }
    }
}
