//! Elasticsearch client wrapper.

use anyhow::Result;
use elasticsearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    Elasticsearch,
};
use url::Url;

use crate::models::FeatureClass;

/// Elasticsearch client with one index per feature class
#[derive(Clone)]
pub struct EsClient {
    client: Elasticsearch,
    pub index_prefix: String,
}

impl EsClient {
    /// Create a new Elasticsearch client
    pub fn new(es_url: &str, index_prefix: &str) -> Result<Self> {
        let url = Url::parse(es_url)?;
        let conn_pool = SingleNodeConnectionPool::new(url);
        let transport = TransportBuilder::new(conn_pool).disable_proxy().build()?;

        let client = Elasticsearch::new(transport);

        Ok(Self {
            client,
            index_prefix: index_prefix.to_string(),
        })
    }

    /// Get the underlying Elasticsearch client
    pub fn client(&self) -> &Elasticsearch {
        &self.client
    }

    /// Index holding the partition of one feature class, e.g. "geonames_p"
    pub fn index_name(&self, class: FeatureClass) -> String {
        index_name(&self.index_prefix, class)
    }

    /// Check if cluster is healthy
    pub async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .cluster()
            .health(elasticsearch::cluster::ClusterHealthParts::None)
            .send()
            .await?;

        Ok(response.status_code().is_success())
    }

    /// Get document count of one partition
    pub async fn doc_count(&self, class: FeatureClass) -> Result<u64> {
        let index = self.index_name(class);
        let response = self
            .client
            .count(elasticsearch::CountParts::Index(&[index.as_str()]))
            .send()
            .await?;

        let body = response.json::<serde_json::Value>().await?;
        Ok(body["count"].as_u64().unwrap_or(0))
    }
}

pub(crate) fn index_name(prefix: &str, class: FeatureClass) -> String {
    format!("{}_{}", prefix, class.as_str().to_ascii_lowercase())
}
