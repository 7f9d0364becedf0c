use crate::model::Snapshot;
use std::sync::Arc;
use tracing::debug;

/// Holds the current snapshot. The snapshot is swapped as a whole on every load and never edited in
/// place, so anything holding the previous `Arc` keeps reading a consistent dataset.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    snapshot: Arc<Snapshot>,
}

impl DataStore {
    /// An empty store, as it exists before the first load completes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    /// Replaces the snapshot and returns the new one.
    pub fn replace(&mut self, snapshot: Snapshot) -> Arc<Snapshot> {
        debug!(
            "Replacing snapshot: {} customers, {} transactions",
            snapshot.customers().len(),
            snapshot.transactions().len()
        );
        self.snapshot = Arc::new(snapshot);
        self.snapshot.clone()
    }
}
