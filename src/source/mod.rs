//! Where snapshots come from.
//!
//! There are two interchangeable sources that deliver the same JSON document: a remote endpoint
//! fetched with HTTP GET, and a fixture compiled into the binary. `SourceKind` picks one, and
//! toggling it is followed by a full reload.

mod fixture;
mod remote;

use crate::model::Snapshot;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

pub use fixture::{FixtureSource, FIXTURE_JSON};
pub use remote::RemoteSource;

/// The default remote endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5500/api/data";

/// Anything that can deliver a complete snapshot.
#[async_trait::async_trait]
pub trait Source: Send + Sync {
    /// Fetches and parses a whole snapshot. A partial snapshot is never returned: either the full
    /// document parses or this is an error.
    async fn fetch(&self) -> Result<Snapshot>;
}

/// Selects which `Source` to load from.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// HTTP GET against the configured endpoint.
    #[default]
    Remote,
    /// The dataset bundled with this program.
    Fixture,
}

serde_plain::derive_display_from_serialize!(SourceKind);
serde_plain::derive_fromstr_from_deserialize!(SourceKind);

impl SourceKind {
    /// The other source.
    pub fn toggle(self) -> Self {
        match self {
            SourceKind::Remote => SourceKind::Fixture,
            SourceKind::Fixture => SourceKind::Remote,
        }
    }
}

/// Creates the `Source` for `kind`. `endpoint` is only used by `SourceKind::Remote`.
pub fn source(kind: SourceKind, endpoint: &Url) -> Result<Box<dyn Source>> {
    Ok(match kind {
        SourceKind::Remote => Box::new(RemoteSource::new(endpoint.clone())?),
        SourceKind::Fixture => Box::new(FixtureSource),
    })
}

/// Loads a snapshot from the source selected by `kind`.
pub async fn load(kind: SourceKind, endpoint: &Url) -> Result<Snapshot> {
    let snapshot = source(kind, endpoint)?
        .fetch()
        .await
        .with_context(|| format!("Unable to load data from the {kind} source"))?;
    info!(
        "Loaded {} customers and {} transactions from the {kind} source",
        snapshot.customers().len(),
        snapshot.transactions().len()
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_toggle() {
        assert_eq!(SourceKind::Remote.toggle(), SourceKind::Fixture);
        assert_eq!(SourceKind::Fixture.toggle(), SourceKind::Remote);
        assert_eq!(SourceKind::Remote.toggle().toggle(), SourceKind::Remote);
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(SourceKind::Fixture.to_string(), "fixture");
        assert_eq!(SourceKind::from_str("remote").unwrap(), SourceKind::Remote);
        assert!(SourceKind::from_str("carrier-pigeon").is_err());
    }

    #[tokio::test]
    async fn test_load_fixture() {
        let endpoint = Url::parse(DEFAULT_ENDPOINT).unwrap();
        let snapshot = load(SourceKind::Fixture, &endpoint).await.unwrap();
        assert!(!snapshot.customers().is_empty());
    }

    #[tokio::test]
    async fn test_load_unreachable_remote_is_an_error() {
        // Port 9 (discard) on loopback is expected to refuse connections.
        let endpoint = Url::parse("http://127.0.0.1:9/api/data").unwrap();
        let result = load(SourceKind::Remote, &endpoint).await;
        assert!(result.is_err());
    }
}
