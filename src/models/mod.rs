//! Core data models for place resolution.

pub mod admin;
pub mod place;
pub mod resolved;

pub use admin::AdminLevel;
pub use place::{FeatureClass, GeoPoint, PlaceRecord, ADMIN_SEAT_CODES, DISTRICT_CODES};
pub use resolved::{Branch, CitySource, NearbyFeatures, Resolution, ResolveTrace, ResolvedPlace};
