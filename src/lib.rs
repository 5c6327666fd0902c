//! Larch - reverse place resolution over partitioned GeoNames data
//!
//! This library resolves a coordinate into its populated place, district,
//! city, state and country, and attaches nearby parks, forests, mountains
//! and spots. Spatial queries go through the `SpatialStore` trait, backed by
//! Elasticsearch or an in-memory R-tree.

pub mod config;
pub mod elasticsearch;
pub mod error;
pub mod i18n;
pub mod models;
pub mod resolver;
pub mod store;

pub use error::ResolutionError;
pub use models::{FeatureClass, GeoPoint, PlaceRecord, Resolution, ResolvedPlace};
pub use resolver::{PlaceResolver, ResolveOptions};
pub use store::{SpatialStore, StoreError};
