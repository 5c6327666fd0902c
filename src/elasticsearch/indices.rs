//! Partition index checks.

use anyhow::Result;
use elasticsearch::indices::IndicesExistsParts;
use tracing::debug;

use super::EsClient;
use crate::models::FeatureClass;

/// Names of the partition indices that do not exist on the cluster
pub async fn missing_indices(client: &EsClient) -> Result<Vec<String>> {
    let es = client.client();
    let mut exists = Vec::with_capacity(FeatureClass::all().len());

    for class in FeatureClass::all() {
        let index_name = client.index_name(*class);
        let found = es
            .indices()
            .exists(IndicesExistsParts::Index(&[index_name.as_str()]))
            .send()
            .await?
            .status_code()
            .is_success();

        debug!("Index {} exists: {}", index_name, found);
        exists.push((index_name, found));
    }

    Ok(not_found(exists))
}

fn not_found(exists: Vec<(String, bool)>) -> Vec<String> {
    exists
        .into_iter()
        .filter(|(_, found)| !found)
        .map(|(name, _)| name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elasticsearch::client::index_name;

    #[test]
    fn test_all_present() {
        let exists = FeatureClass::all()
            .iter()
            .map(|class| (index_name("geonames", *class), true))
            .collect();
        assert!(not_found(exists).is_empty());
    }

    #[test]
    fn test_missing_indices_are_named() {
        let exists = FeatureClass::all()
            .iter()
            .map(|class| {
                let present = !matches!(class, FeatureClass::P | FeatureClass::S);
                (index_name("geonamez", *class), present)
            })
            .collect();
        assert_eq!(not_found(exists), vec!["geonamez_p", "geonamez_s"]);
    }
}
