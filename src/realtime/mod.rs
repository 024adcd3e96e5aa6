//! Real-time match notifications over Socket.IO.
//!
//! The protocol, heartbeat and reconnection of dropped sessions belong to the
//! `rust_socketio` async client. This module keys one client per identity and
//! turns its callbacks into `RealtimeEvent`s.

mod error;
mod subscription;

pub use error::RealtimeError;
pub use subscription::{
    socket_url, MatchSubscription, RealtimeEvent, SubscriptionOptions, MATCH_EVENT,
};
