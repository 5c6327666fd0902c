//! Elasticsearch-backed spatial store.
//!
//! Every feature class lives in its own index. Candidates are ordered by a
//! painless script computing planar distance in degree space, so ordering
//! and thresholds match the in-memory store exactly.

use anyhow::{Context, Result};
use async_trait::async_trait;
use elasticsearch::SearchParts;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::{missing_indices, EsClient};
use crate::models::{AdminLevel, FeatureClass, PlaceRecord};
use crate::store::{NearestQuery, SpatialStore, StoreError, DEFAULT_CAPACITY};

const PLANAR_DISTANCE_SCRIPT: &str = "double dlat = doc['coordinate'].lat - params.lat; \
     double dlon = doc['coordinate'].lon - params.lon; \
     return Math.sqrt(dlat * dlat + dlon * dlon);";

/// Spatial store over one Elasticsearch index per feature class
pub struct ElasticStore {
    client: EsClient,
    capacity: usize,
}

impl ElasticStore {
    pub fn new(client: EsClient) -> Self {
        Self {
            client,
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Connect, verify cluster health and require every partition index
    pub async fn connect(es_url: &str, index_prefix: &str) -> Result<Self> {
        let client = EsClient::new(es_url, index_prefix)?;

        if !client.health_check().await? {
            anyhow::bail!("Elasticsearch cluster is not healthy");
        }

        let missing = missing_indices(&client)
            .await
            .context("Failed to check partition indices")?;
        if !missing.is_empty() {
            anyhow::bail!(
                "Missing partition indices under prefix {:?}: {}",
                client.index_prefix,
                missing.join(", ")
            );
        }

        let places = client.doc_count(FeatureClass::P).await?;
        if places == 0 {
            warn!(
                "{} is empty; every resolve will return not found",
                client.index_name(FeatureClass::P)
            );
        }
        info!(
            "Connected to Elasticsearch with {} populated places in {}",
            places,
            client.index_name(FeatureClass::P)
        );

        Ok(Self::new(client))
    }

    /// Override the reported concurrent query capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }
}

#[async_trait]
impl SpatialStore for ElasticStore {
    async fn find_nearest(&self, query: &NearestQuery) -> Result<Vec<PlaceRecord>, StoreError> {
        let index = self.client.index_name(query.feature_class);
        let body = build_search_body(query);

        debug!("Nearest query on {}: {}", index, body);

        let response = self
            .client
            .client()
            .search(SearchParts::Index(&[index.as_str()]))
            .body(body)
            .send()
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await?;
            return Err(StoreError::Unavailable(format!(
                "search on {} failed with {}: {}",
                index, status, error_body
            )));
        }

        let response_body = response.json::<Value>().await?;
        parse_hits(query.feature_class, &response_body)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Build the search request for a nearest query
fn build_search_body(query: &NearestQuery) -> Value {
    let mut filters = Vec::new();

    if !query.feature_codes.is_empty() {
        filters.push(json!({
            "terms": { "feature_code": &query.feature_codes }
        }));
    }

    if let Some(ref country) = query.country_code {
        filters.push(json!({
            "term": { "country_code": country }
        }));
    }

    for level in AdminLevel::all() {
        if let Some(code) = query.admin_filter(*level) {
            let field = level.field_name();
            filters.push(json!({
                "term": { field: code }
            }));
        }
    }

    json!({
        "size": query.limit,
        "track_total_hits": false,
        "query": {
            "bool": { "filter": filters }
        },
        "sort": [
            {
                "_script": {
                    "type": "number",
                    "order": "asc",
                    "script": {
                        "lang": "painless",
                        "source": PLANAR_DISTANCE_SCRIPT,
                        "params": {
                            "lat": query.point.lat,
                            "lon": query.point.lon
                        }
                    }
                }
            }
        ]
    })
}

/// Decode search hits into records carrying their sort distance
fn parse_hits(class: FeatureClass, body: &Value) -> Result<Vec<PlaceRecord>, StoreError> {
    let hits = body["hits"]["hits"]
        .as_array()
        .ok_or_else(|| malformed(class, "response has no hits array".to_string()))?;

    hits.iter().map(|hit| parse_hit(class, hit)).collect()
}

fn parse_hit(class: FeatureClass, hit: &Value) -> Result<PlaceRecord, StoreError> {
    let source = hit
        .get("_source")
        .ok_or_else(|| malformed(class, "hit has no _source".to_string()))?;

    let mut record: PlaceRecord = serde_json::from_value(source.clone())
        .map_err(|e| malformed(class, format!("undecodable _source: {}", e)))?;

    let distance = hit["sort"]
        .as_array()
        .and_then(|sort| sort.first())
        .and_then(Value::as_f64)
        .ok_or_else(|| malformed(class, "hit has no numeric sort distance".to_string()))?;

    record.distance = Some(distance);
    Ok(record)
}

fn malformed(class: FeatureClass, reason: String) -> StoreError {
    StoreError::MalformedRow { class, reason }
}
