//! Scripted store for tests: canned rows with fixed distances, every query
//! recorded.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{NearestQuery, SpatialStore, StoreError};
use crate::models::{FeatureClass, PlaceRecord};

#[derive(Default)]
pub(crate) struct ScriptedStore {
    rows: HashMap<FeatureClass, Vec<PlaceRecord>>,
    raw: HashMap<FeatureClass, Vec<PlaceRecord>>,
    failing: Vec<FeatureClass>,
    delay: Option<Duration>,
    queries: Mutex<Vec<NearestQuery>>,
}

impl ScriptedStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Row returned when it passes the query filters; `distance` is kept as given
    pub(crate) fn row(mut self, record: PlaceRecord, distance: f64) -> Self {
        self.rows
            .entry(record.feature_class)
            .or_default()
            .push(record.with_distance(distance));
        self
    }

    /// Rows returned verbatim for every query of `class`
    pub(crate) fn raw(mut self, class: FeatureClass, records: Vec<PlaceRecord>) -> Self {
        self.raw.insert(class, records);
        self
    }

    /// Queries of `class` fail as if the store were unreachable
    pub(crate) fn failing(mut self, class: FeatureClass) -> Self {
        self.failing.push(class);
        self
    }

    /// Every query sleeps this long before answering
    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn queries(&self) -> Vec<NearestQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub(crate) fn queries_for(&self, class: FeatureClass) -> Vec<NearestQuery> {
        self.queries()
            .into_iter()
            .filter(|q| q.feature_class == class)
            .collect()
    }
}

#[async_trait]
impl SpatialStore for ScriptedStore {
    async fn find_nearest(&self, query: &NearestQuery) -> Result<Vec<PlaceRecord>, StoreError> {
        self.queries.lock().unwrap().push(query.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(&query.feature_class) {
            return Err(StoreError::Unavailable(format!(
                "partition {} offline",
                query.feature_class
            )));
        }

        if let Some(raw) = self.raw.get(&query.feature_class) {
            return Ok(raw.clone());
        }

        let mut results: Vec<PlaceRecord> = self
            .rows
            .get(&query.feature_class)
            .map(|rows| rows.iter().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default();
        results.sort_by(|a, b| a.distance.unwrap_or(0.0).total_cmp(&b.distance.unwrap_or(0.0)));
        results.truncate(query.limit);
        Ok(results)
    }
}
