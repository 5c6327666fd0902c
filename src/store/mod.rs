//! Spatial store abstraction.
//!
//! The resolver only needs nearest-neighbor queries over one feature-class
//! partition at a time. Adapters live in `memory` (R-tree per class) and in
//! `crate::elasticsearch` (index per class).

pub mod geonames;
mod memory;
mod query;
#[cfg(test)]
pub(crate) mod scripted;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{FeatureClass, PlaceRecord};

pub use geonames::load_geonames;
pub use memory::MemoryStore;
pub use query::NearestQuery;

/// Store handle shared by the resolver components
pub type SharedStore = std::sync::Arc<dyn SpatialStore>;

/// Concurrent queries a store serves unless it says otherwise
pub const DEFAULT_CAPACITY: usize = 4;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("malformed class {class} row: {reason}")]
    MalformedRow { class: FeatureClass, reason: String },

    #[error("spatial store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Elasticsearch(#[from] elasticsearch::Error),
}

/// Nearest-neighbor queries per feature-class partition.
///
/// Results are ordered by ascending planar distance in degree space and each
/// carries `distance`. Implementations do not retry.
#[async_trait]
pub trait SpatialStore: Send + Sync {
    async fn find_nearest(&self, query: &NearestQuery) -> Result<Vec<PlaceRecord>, StoreError>;

    /// Number of queries this store can serve concurrently
    fn capacity(&self) -> usize {
        DEFAULT_CAPACITY
    }
}
