//! The dataset that ships with the program.
//!
//! Note: this is compiled into the production binary, not only into tests. It is the offline
//! alternative to the remote endpoint and also what `spend serve` hands out.

use crate::model::Snapshot;
use crate::source::Source;
use crate::Result;
use anyhow::Context;

/// The raw fixture document.
pub const FIXTURE_JSON: &str = include_str!("fixture.json");

/// A `Source` that parses the bundled fixture.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSource;

#[async_trait::async_trait]
impl Source for FixtureSource {
    async fn fetch(&self) -> Result<Snapshot> {
        serde_json::from_str(FIXTURE_JSON).context("The bundled fixture is not a valid dataset")
    }
}
