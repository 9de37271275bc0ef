//! Shared helpers for unit tests.

pub mod recording;
pub mod socket_guard;
