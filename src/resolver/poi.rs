//! Nearby points of interest.

use tracing::debug;

use super::check_rows;
use crate::error::ResolutionError;
use crate::models::{FeatureClass, GeoPoint, NearbyFeatures, PlaceRecord};
use crate::store::{NearestQuery, SharedStore};

/// Attach radius for parks, forests and mountains, in degrees
pub const AREA_THRESHOLD: f64 = 0.01;

/// Attach radius for spots, in degrees
pub const SPOT_THRESHOLD: f64 = 0.001;

/// Kind of point of interest and the partition it comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoiKind {
    Park,
    Forest,
    Mountain,
    Spot,
}

impl PoiKind {
    pub fn all() -> &'static [PoiKind] {
        &[PoiKind::Park, PoiKind::Forest, PoiKind::Mountain, PoiKind::Spot]
    }

    pub fn feature_class(&self) -> FeatureClass {
        match self {
            PoiKind::Park => FeatureClass::L,
            PoiKind::Forest => FeatureClass::V,
            PoiKind::Mountain => FeatureClass::T,
            PoiKind::Spot => FeatureClass::S,
        }
    }

    /// Largest planar distance (inclusive) at which a record is attached.
    /// Empirically calibrated in degree units; not a meter conversion.
    pub fn threshold(&self) -> f64 {
        match self {
            PoiKind::Spot => SPOT_THRESHOLD,
            _ => AREA_THRESHOLD,
        }
    }

    /// List of `nearby` holding this kind
    pub fn slot<'a>(&self, nearby: &'a mut NearbyFeatures) -> &'a mut Vec<PlaceRecord> {
        match self {
            PoiKind::Park => &mut nearby.parks,
            PoiKind::Forest => &mut nearby.forests,
            PoiKind::Mountain => &mut nearby.mountains,
            PoiKind::Spot => &mut nearby.spots,
        }
    }
}

/// Finds the nearest in-range park, forest, mountain and spot
pub struct PoiAttacher {
    store: SharedStore,
}

impl PoiAttacher {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Nearest record of `kind` if it lies within the kind's threshold
    pub async fn nearest_within(
        &self,
        kind: PoiKind,
        point: GeoPoint,
    ) -> Result<Option<PlaceRecord>, ResolutionError> {
        let class = kind.feature_class();
        let query = NearestQuery::new(class, point, 1);

        let found = self.store.find_nearest(&query).await?;
        check_rows(class, &found)?;

        let Some(nearest) = found.into_iter().next() else {
            return Ok(None);
        };

        let distance = nearest.distance.unwrap_or(f64::INFINITY);
        if distance <= kind.threshold() {
            Ok(Some(nearest))
        } else {
            debug!(
                "Nearest {:?} {} at {} is beyond {}",
                kind,
                nearest.external_id,
                distance,
                kind.threshold()
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::scripted::ScriptedStore;
    use std::sync::Arc;

    fn poi(id: i64, class: FeatureClass, code: &str) -> PlaceRecord {
        PlaceRecord::new(id, "Feature", class, code, "DE", GeoPoint::new(48.0, 11.0))
    }

    fn origin() -> GeoPoint {
        GeoPoint::new(48.0, 11.0)
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(PoiKind::Park.threshold(), 0.01);
        assert_eq!(PoiKind::Forest.threshold(), 0.01);
        assert_eq!(PoiKind::Mountain.threshold(), 0.01);
        assert_eq!(PoiKind::Spot.threshold(), 0.001);
    }

    #[tokio::test]
    async fn test_park_threshold_is_inclusive() {
        let store = Arc::new(ScriptedStore::new().row(poi(1, FeatureClass::L, "PRK"), 0.01));
        let attacher = PoiAttacher::new(store);
        let park = attacher.nearest_within(PoiKind::Park, origin()).await.unwrap();
        assert!(park.is_some());

        let store = Arc::new(ScriptedStore::new().row(poi(1, FeatureClass::L, "PRK"), 0.0100001));
        let attacher = PoiAttacher::new(store);
        let park = attacher.nearest_within(PoiKind::Park, origin()).await.unwrap();
        assert!(park.is_none());
    }

    #[tokio::test]
    async fn test_spots_are_ten_times_stricter() {
        let store = Arc::new(
            ScriptedStore::new()
                .row(poi(1, FeatureClass::L, "PRK"), 0.005)
                .row(poi(2, FeatureClass::V, "FRST"), 0.005)
                .row(poi(3, FeatureClass::T, "MT"), 0.005)
                .row(poi(4, FeatureClass::S, "CH"), 0.005),
        );
        let attacher = PoiAttacher::new(store);

        for kind in [PoiKind::Park, PoiKind::Forest, PoiKind::Mountain] {
            let found = attacher.nearest_within(kind, origin()).await.unwrap();
            assert!(found.is_some(), "{:?}", kind);
        }
        let spot = attacher.nearest_within(PoiKind::Spot, origin()).await.unwrap();
        assert!(spot.is_none());
    }

    #[tokio::test]
    async fn test_spot_within_threshold_is_attached() {
        let store = Arc::new(ScriptedStore::new().row(poi(4, FeatureClass::S, "CH"), 0.001));
        let spot = PoiAttacher::new(store)
            .nearest_within(PoiKind::Spot, origin())
            .await
            .unwrap();
        assert_eq!(spot.and_then(|s| s.distance), Some(0.001));
    }

    #[tokio::test]
    async fn test_single_unfiltered_query_per_kind() {
        let store = Arc::new(ScriptedStore::new());
        let attacher = PoiAttacher::new(store.clone());

        for kind in PoiKind::all() {
            assert!(attacher.nearest_within(*kind, origin()).await.unwrap().is_none());

            let queries = store.queries_for(kind.feature_class());
            assert_eq!(queries.len(), 1);
            assert_eq!(queries[0].limit, 1);
            assert!(queries[0].feature_codes.is_empty());
            assert!(queries[0].country_code.is_none());
        }
        assert_eq!(store.queries().len(), 4);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = Arc::new(ScriptedStore::new().failing(FeatureClass::T));
        let err = PoiAttacher::new(store)
            .nearest_within(PoiKind::Mountain, origin())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::Store(_)));
    }

    #[tokio::test]
    async fn test_missing_distance_is_malformed() {
        let store = Arc::new(
            ScriptedStore::new().raw(FeatureClass::V, vec![poi(2, FeatureClass::V, "FRST")]),
        );
        let err = PoiAttacher::new(store)
            .nearest_within(PoiKind::Forest, origin())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::MalformedRow { class: FeatureClass::V, .. }));
    }
}
