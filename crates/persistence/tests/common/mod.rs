//! Test infrastructure for the persistence layer.
//!
//! Provides catalog fixtures and a seeded in-memory backend.

pub mod fixtures;

pub use fixtures::*;
