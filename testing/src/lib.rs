//! Shared test fixtures for the Neonomaly workspace.
//!
//! Seeds an in-memory store with a service, a metric and a reading series,
//! and carries the reference reading series used across crates.

mod fixtures;

pub use fixtures::*;
