//! Testing infrastructure for caseorg tests.
//!
//! - `FakeBackend`: in-memory backend that records every request
//! - `fixtures`: sample records, listings and a seeded case tree
//! - `TestWorld`: isolated data directory for CLI tests

pub mod backend;
pub mod fixtures;
pub mod world;

pub use backend::FakeBackend;
pub use world::TestWorld;
