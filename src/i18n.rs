//! Country display names.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Translates an ISO country code into a display name.
///
/// Implementations return the lowercase code itself when they have no entry.
pub trait Translator: Send + Sync {
    fn translate(&self, country_code: &str) -> String;
}

/// Translation catalog keyed by lowercase country code
#[derive(Debug, Clone, Default)]
pub struct CountryCatalog {
    names: HashMap<String, String>,
}

impl CountryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|(code, name)| (code.as_ref().to_ascii_lowercase(), name.into()))
                .collect(),
        }
    }

    /// Load a flat TOML table such as `de = "Deutschland"`
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read country catalog")?;
        let names: HashMap<String, String> =
            toml::from_str(&content).context("Failed to parse country catalog")?;

        let catalog = Self::from_entries(names);
        info!("Loaded {} country names", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Translator for CountryCatalog {
    fn translate(&self, country_code: &str) -> String {
        let key = country_code.to_ascii_lowercase();
        match self.names.get(&key) {
            Some(name) => name.clone(),
            None => key,
        }
    }
}
