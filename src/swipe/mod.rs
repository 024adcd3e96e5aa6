//! State of the swipe screen.
//!
//! `SwipeSession` is owned by a single screen instance and holds the identity,
//! the candidate queue and the last match. It performs no I/O: callers issue
//! the matching network requests for the values it returns.

mod queue;

pub use queue::CandidateQueue;

use tracing::debug;

use crate::api::{Decision, Dev};

/// Local state for one signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwipeSession {
    /// The signed-in user's id. Fixed for the life of the session.
    identity: String,
    /// Candidates awaiting a decision.
    queue: CandidateQueue,
    /// The most recent match, if any.
    current_match: Option<Dev>,
    /// Whether a load response has been applied.
    loaded: bool,
}

impl SwipeSession {
    /// Create an empty session for an identity.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            queue: CandidateQueue::new(),
            current_match: None,
            loaded: false,
        }
    }

    /// The session identity.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The candidate queue.
    pub fn queue(&self) -> &CandidateQueue {
        &self.queue
    }

    /// The last match received.
    pub fn current_match(&self) -> Option<&Dev> {
        self.current_match.as_ref()
    }

    /// Whether the first load has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether like/dislike can be invoked.
    pub fn can_decide(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Replace the queue with a load response.
    pub fn apply_loaded(&mut self, devs: Vec<Dev>) {
        debug!(count = devs.len(), "Replacing candidate queue");
        self.queue.replace(devs);
        self.loaded = true;
    }

    /// Pop the front candidate for a decision.
    ///
    /// Returns the removed candidate, or `None` if the queue is empty. The
    /// removal does not depend on the outcome of the request the caller sends.
    pub fn decide(&mut self, decision: Decision) -> Option<Dev> {
        let dev = self.queue.pop_front()?;
        debug!(dev_id = %dev.id, %decision, remaining = self.queue.len(), "Candidate decided");
        Some(dev)
    }

    /// Record a match event, replacing any earlier one.
    pub fn apply_match(&mut self, dev: Dev) {
        debug!(dev_id = %dev.id, "Match received");
        self.current_match = Some(dev);
    }
}
