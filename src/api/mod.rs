//! Matching service client and types.
//!
//! This module provides the interface for the `/devs` REST endpoints.

mod client;
pub mod error;
pub mod types;

pub use client::{DevsClient, USER_HEADER};
pub use error::ApiError;
pub use types::{Decision, Dev};
