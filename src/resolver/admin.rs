//! City and state lookup by admin codes.
//!
//! Matching is exact admin-code and country equality against class-A
//! records, never geometric. Which admin level identifies a city or a state
//! depends on the country's administrative convention and is looked up in
//! `CountryRules`.

use std::collections::HashMap;
use tracing::debug;

use super::check_rows;
use crate::error::ResolutionError;
use crate::models::{AdminLevel, FeatureClass, PlaceRecord};
use crate::store::{NearestQuery, SharedStore};

/// Admin levels identifying the city and the state of a place in one country
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryRule {
    pub city_level: AdminLevel,
    pub state_level: AdminLevel,
}

impl CountryRule {
    pub const DEFAULT: CountryRule = CountryRule {
        city_level: AdminLevel::Adm4,
        state_level: AdminLevel::Adm1,
    };

    /// Municipalities are third-order divisions
    pub const MUNICIPALITY_ADM3: CountryRule = CountryRule {
        city_level: AdminLevel::Adm3,
        state_level: AdminLevel::Adm1,
    };
}

impl Default for CountryRule {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Per-country rule table with an explicit default entry
#[derive(Debug, Clone)]
pub struct CountryRules {
    default: CountryRule,
    by_country: HashMap<String, CountryRule>,
}

impl CountryRules {
    /// Empty table answering every country with `default`
    pub fn new(default: CountryRule) -> Self {
        Self {
            default,
            by_country: HashMap::new(),
        }
    }

    /// Add or replace the rule of one country
    pub fn with_rule(mut self, country_code: &str, rule: CountryRule) -> Self {
        self.by_country
            .insert(country_code.to_ascii_uppercase(), rule);
        self
    }

    pub fn rule_for(&self, country_code: &str) -> CountryRule {
        self.by_country
            .get(&country_code.to_ascii_uppercase())
            .copied()
            .unwrap_or(self.default)
    }
}

impl Default for CountryRules {
    fn default() -> Self {
        ["AT", "CH", "ES", "PL"]
            .iter()
            .fold(CountryRules::new(CountryRule::DEFAULT), |rules, country| {
                rules.with_rule(country, CountryRule::MUNICIPALITY_ADM3)
            })
    }
}

/// Resolves cities and states from admin codes
pub struct AdminHierarchyResolver {
    store: SharedStore,
    rules: CountryRules,
}

impl AdminHierarchyResolver {
    pub fn new(store: SharedStore, rules: CountryRules) -> Self {
        Self { store, rules }
    }

    /// Class-A record sharing the place's municipality code
    pub async fn city_from_admin_codes(
        &self,
        place: &PlaceRecord,
    ) -> Result<Option<PlaceRecord>, ResolutionError> {
        let rule = self.rules.rule_for(&place.country_code);
        self.find_admin_area(place, rule.city_level).await
    }

    /// Class-A record sharing the city's state code
    pub async fn state_from_city(
        &self,
        city: &PlaceRecord,
    ) -> Result<Option<PlaceRecord>, ResolutionError> {
        let rule = self.rules.rule_for(&city.country_code);
        self.find_admin_area(city, rule.state_level).await
    }

    async fn find_admin_area(
        &self,
        place: &PlaceRecord,
        level: AdminLevel,
    ) -> Result<Option<PlaceRecord>, ResolutionError> {
        let Some(code) = place.admin_code(level) else {
            debug!(
                "Place {} has no {} code, skipping {} lookup",
                place.external_id,
                level.field_name(),
                level
            );
            return Ok(None);
        };

        let query = NearestQuery::new(FeatureClass::A, place.coordinate, 1)
            .feature_code(level.feature_code())
            .country(&place.country_code)
            .admin_code(level, code);

        let found = self.store.find_nearest(&query).await?;
        check_rows(FeatureClass::A, &found)?;

        let area = found.into_iter().next();
        debug!(
            "{} lookup for {}={} in {}: {:?}",
            level,
            level.field_name(),
            code,
            place.country_code,
            area.as_ref().map(|a| a.name.as_str())
        );
        Ok(area)
    }
}
