//! In-memory store with one R-tree per feature class.

use async_trait::async_trait;
use rayon::prelude::*;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use tracing::{debug, info};

use super::{NearestQuery, SpatialStore, StoreError, DEFAULT_CAPACITY};
use crate::models::{FeatureClass, PlaceRecord};

/// R-tree entry: [lon, lat] pointing at a record of the partition
type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Records of one feature class and their index
struct Partition {
    records: Vec<PlaceRecord>,
    tree: RTree<IndexedPoint>,
}

impl Partition {
    fn build(records: Vec<PlaceRecord>) -> Self {
        let points: Vec<IndexedPoint> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                GeomWithData::new([record.coordinate.lon, record.coordinate.lat], idx)
            })
            .collect();

        Self {
            tree: RTree::bulk_load(points),
            records,
        }
    }
}

/// Partitioned in-memory spatial store
pub struct MemoryStore {
    partitions: Vec<Partition>,
    capacity: usize,
}

impl MemoryStore {
    /// Build one partition per feature class from a flat list of records
    pub fn build(records: Vec<PlaceRecord>) -> Self {
        info!("Building in-memory store for {} records...", records.len());

        let mut by_class: Vec<Vec<PlaceRecord>> = vec![Vec::new(); FeatureClass::all().len()];
        for record in records {
            by_class[record.feature_class.index()].push(record);
        }

        let partitions: Vec<Partition> = by_class.into_par_iter().map(Partition::build).collect();

        for class in FeatureClass::all() {
            info!(
                "  {}: {} records",
                class,
                partitions[class.index()].records.len()
            );
        }

        Self {
            partitions,
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Override the reported concurrent query capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Number of records in one partition
    pub fn partition_len(&self, class: FeatureClass) -> usize {
        self.partitions[class.index()].records.len()
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        self.partitions.iter().map(|p| p.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nearest records matching the query, ascending by planar distance
    pub fn nearest(&self, query: &NearestQuery) -> Vec<PlaceRecord> {
        let partition = &self.partitions[query.feature_class.index()];
        let origin = [query.point.lon, query.point.lat];

        partition
            .tree
            .nearest_neighbor_iter(&origin)
            .map(|point| &partition.records[point.data])
            .filter(|record| query.matches(record))
            .take(query.limit)
            .map(|record| {
                let distance = query.point.planar_distance(&record.coordinate);
                record.clone().with_distance(distance)
            })
            .collect()
    }
}

#[async_trait]
impl SpatialStore for MemoryStore {
    async fn find_nearest(&self, query: &NearestQuery) -> Result<Vec<PlaceRecord>, StoreError> {
        let results = self.nearest(query);
        debug!(
            "Memory query class {} at ({}, {}): {} of limit {}",
            query.feature_class,
            query.point.lat,
            query.point.lon,
            results.len(),
            query.limit
        );
        Ok(results)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
