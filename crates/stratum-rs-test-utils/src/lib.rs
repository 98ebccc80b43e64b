//! Test helpers shared across Stratum crates.

pub mod fixtures;
pub mod sources;

pub use fixtures::FixtureDir;
pub use sources::{FailingSource, StubSource};
