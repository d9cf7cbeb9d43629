//! Store configuration.

use crate::error::StorageResult;
use geostore_index::IndexConfig;

/// Configuration for a [`SpatialStore`](crate::SpatialStore).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Fanout of the spatial index.
    pub index: IndexConfig,
}

impl StoreConfig {
    pub fn new(index: IndexConfig) -> Self {
        Self { index }
    }

    pub fn validate(&self) -> StorageResult<()> {
        self.index.validate()?;
        Ok(())
    }
}
