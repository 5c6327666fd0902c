//! Reverse place resolution.
//!
//! `PlaceResolver` finds the nearest populated place for a coordinate and
//! derives its district, city, state, country and nearby points of interest
//! from nearest-neighbor queries over the feature-class partitions.

mod admin;
mod options;
mod place;
mod poi;

pub use admin::{AdminHierarchyResolver, CountryRule, CountryRules};
pub use options::{ResolveOptions, DEFAULT_TIMEOUT};
pub use place::{PlaceResolver, ResolverConfig, DEFAULT_CANDIDATE_LIMIT};
pub use poi::{PoiAttacher, PoiKind, AREA_THRESHOLD, SPOT_THRESHOLD};

use crate::error::ResolutionError;
use crate::models::{FeatureClass, PlaceRecord};

/// Reject rows a store should never return for a query on `class`
pub(crate) fn check_rows(class: FeatureClass, rows: &[PlaceRecord]) -> Result<(), ResolutionError> {
    for row in rows {
        if row.feature_class != class {
            return Err(ResolutionError::MalformedRow {
                class,
                reason: format!(
                    "record {} has feature class {}",
                    row.external_id, row.feature_class
                ),
            });
        }
        match row.distance {
            Some(distance) if distance.is_finite() && distance >= 0.0 => {}
            other => {
                return Err(ResolutionError::MalformedRow {
                    class,
                    reason: format!("record {} has distance {:?}", row.external_id, other),
                })
            }
        }
    }
    Ok(())
}
