//! Shared helpers for the integration tests.

#![allow(dead_code)]

pub mod fixtures;

// Same guard the unit tests use; one copy lives under src/.
#[path = "../../src/test_support/socket_guard.rs"]
pub mod socket_guard;
