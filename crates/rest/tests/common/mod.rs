//! Common test utilities for REST API testing.
//!
//! This module provides test infrastructure including:
//!
//! - [`harness`] - Test server over the seeded catalog
//! - [`fixtures`] - Seed documents

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
