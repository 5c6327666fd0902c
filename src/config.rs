//! TOML configuration for building a resolver.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::AdminLevel;
use crate::resolver::{
    CountryRule, CountryRules, ResolveOptions, ResolverConfig, DEFAULT_CANDIDATE_LIMIT,
    DEFAULT_TIMEOUT,
};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub resolver: ResolverSettings,
    #[serde(default)]
    pub i18n: I18nConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Elasticsearch,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub backend: Backend,
    /// GeoNames dump for the memory backend
    pub geonames_dump: Option<PathBuf>,
    #[serde(default = "default_es_url")]
    pub es_url: String,
    #[serde(default = "default_index_prefix")]
    pub index_prefix: String,
    /// Concurrent queries the store can serve
    pub capacity: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResolverSettings {
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
    pub max_concurrent_lookups: Option<usize>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Country code -> rule override
    #[serde(default)]
    pub country_rules: HashMap<String, CountryRuleConfig>,
}

/// Override of the built-in rule for one country; unset levels keep the default
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CountryRuleConfig {
    pub city_level: Option<AdminLevel>,
    pub state_level: Option<AdminLevel>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct I18nConfig {
    /// Flat TOML table of lowercase country code -> display name
    pub countries: Option<PathBuf>,
}

fn default_es_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_index_prefix() -> String {
    "geonames".to_string()
}

fn default_candidate_limit() -> usize {
    DEFAULT_CANDIDATE_LIMIT
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            candidate_limit: default_candidate_limit(),
            max_concurrent_lookups: None,
            timeout_ms: default_timeout_ms(),
            country_rules: HashMap::new(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }
}

impl ResolverSettings {
    /// Built-in rule table with configured overrides applied
    pub fn country_rules(&self) -> CountryRules {
        let mut rules = CountryRules::default();
        for (country, overrides) in &self.country_rules {
            let base = rules.rule_for(country);
            rules = rules.with_rule(
                country,
                CountryRule {
                    city_level: overrides.city_level.unwrap_or(base.city_level),
                    state_level: overrides.state_level.unwrap_or(base.state_level),
                },
            );
        }
        rules
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            candidate_limit: self.candidate_limit,
            max_concurrent_lookups: self.max_concurrent_lookups,
        }
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions::with_timeout(Duration::from_millis(self.timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[store]
backend = "elasticsearch"
es_url = "http://es:9200"
index_prefix = "places"
capacity = 8

[resolver]
candidate_limit = 25
max_concurrent_lookups = 2
timeout_ms = 500

[resolver.country_rules.IT]
city_level = "adm3"

[resolver.country_rules.AT]
state_level = "adm2"

[i18n]
countries = "countries.toml"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(FULL).unwrap();
        assert_eq!(config.store.backend, Backend::Elasticsearch);
        assert_eq!(config.store.es_url, "http://es:9200");
        assert_eq!(config.store.capacity, Some(8));
        assert_eq!(config.resolver.candidate_limit, 25);
        assert_eq!(
            config.resolver.resolve_options().timeout,
            Duration::from_millis(500)
        );
        assert_eq!(
            config.i18n.countries.as_deref(),
            Some(Path::new("countries.toml"))
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("[store]\nbackend = \"memory\"\n").unwrap();
        assert_eq!(config.store.index_prefix, "geonames");
        assert_eq!(config.resolver.resolver_config(), ResolverConfig::default());
        assert_eq!(config.resolver.resolve_options(), ResolveOptions::default());
        assert!(config.i18n.countries.is_none());
    }

    #[test]
    fn test_country_rule_overrides() {
        let config = Config::from_toml(FULL).unwrap();
        let rules = config.resolver.country_rules();

        assert_eq!(rules.rule_for("IT").city_level, AdminLevel::Adm3);
        assert_eq!(rules.rule_for("IT").state_level, AdminLevel::Adm1);
        assert_eq!(rules.rule_for("AT").city_level, AdminLevel::Adm3);
        assert_eq!(rules.rule_for("AT").state_level, AdminLevel::Adm2);
        assert_eq!(rules.rule_for("DE"), CountryRule::DEFAULT);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(Config::from_toml("[store]\nbackend = \"postgres\"\n").is_err());
    }
}
