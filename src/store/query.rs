//! Nearest-neighbor query parameters.

use crate::models::{AdminLevel, FeatureClass, GeoPoint, PlaceRecord};

/// A nearest-neighbor query against one feature-class partition.
///
/// Filters are exact-match; an unset filter matches everything.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestQuery {
    pub point: GeoPoint,
    pub limit: usize,
    pub feature_class: FeatureClass,
    pub feature_codes: Vec<String>,
    pub country_code: Option<String>,
    /// admin1..admin4, indexed by `AdminLevel`
    pub admin_codes: [Option<String>; 4],
}

impl NearestQuery {
    pub fn new(feature_class: FeatureClass, point: GeoPoint, limit: usize) -> Self {
        Self {
            point,
            limit,
            feature_class,
            feature_codes: Vec::new(),
            country_code: None,
            admin_codes: Default::default(),
        }
    }

    pub fn feature_code(mut self, code: &str) -> Self {
        self.feature_codes.push(code.to_string());
        self
    }

    pub fn country(mut self, country_code: &str) -> Self {
        self.country_code = Some(country_code.to_string());
        self
    }

    pub fn admin_code(mut self, level: AdminLevel, code: &str) -> Self {
        self.admin_codes[level.index()] = Some(code.to_string());
        self
    }

    /// Admin filter for a level, if set
    pub fn admin_filter(&self, level: AdminLevel) -> Option<&str> {
        self.admin_codes[level.index()].as_deref()
    }

    /// Whether a record passes every filter of this query
    pub fn matches(&self, record: &PlaceRecord) -> bool {
        if record.feature_class != self.feature_class {
            return false;
        }
        if !self.feature_codes.is_empty() && !self.feature_codes.contains(&record.feature_code) {
            return false;
        }
        if let Some(ref country) = self.country_code {
            if &record.country_code != country {
                return false;
            }
        }
        AdminLevel::all().iter().all(|level| match self.admin_filter(*level) {
            Some(code) => record.admin_code(*level) == Some(code),
            None => true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adm4(country: &str, code: &str) -> PlaceRecord {
        let mut record = PlaceRecord::new(
            7,
            "Gemeinde",
            FeatureClass::A,
            "ADM4",
            country,
            GeoPoint::new(50.0, 8.0),
        );
        record.admin4_code = Some(code.to_string());
        record
    }

    #[test]
    fn test_unfiltered_query_matches_class_only() {
        let query = NearestQuery::new(FeatureClass::A, GeoPoint::new(50.0, 8.0), 1);
        assert!(query.matches(&adm4("DE", "X")));

        let query = NearestQuery::new(FeatureClass::P, GeoPoint::new(50.0, 8.0), 1);
        assert!(!query.matches(&adm4("DE", "X")));
    }

    #[test]
    fn test_filters_are_exact() {
        let query = NearestQuery::new(FeatureClass::A, GeoPoint::new(50.0, 8.0), 1)
            .feature_code("ADM4")
            .country("DE")
            .admin_code(AdminLevel::Adm4, "X");

        assert!(query.matches(&adm4("DE", "X")));
        assert!(!query.matches(&adm4("DE", "Y")));
        assert!(!query.matches(&adm4("AT", "X")));

        let query = query.feature_code("ADM3");
        assert!(query.matches(&adm4("DE", "X")));
    }

    #[test]
    fn test_admin_filter_requires_code_present() {
        let query = NearestQuery::new(FeatureClass::A, GeoPoint::new(50.0, 8.0), 1)
            .admin_code(AdminLevel::Adm3, "001");
        assert!(!query.matches(&adm4("DE", "X")));
    }
}
