//! Elasticsearch client and spatial store adapter.

mod client;
mod indices;
mod store;

pub use client::EsClient;
pub use indices::missing_indices;
pub use store::ElasticStore;
