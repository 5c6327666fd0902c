//! Place record as stored in each feature-class partition.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::AdminLevel;

/// Feature codes of populated places that are sub-units of a city.
pub const DISTRICT_CODES: &[&str] = &["PPL", "PPLX"];

/// Feature codes of populated places that are themselves administrative seats.
pub const ADMIN_SEAT_CODES: &[&str] = &["PPLA", "PPLA2", "PPLA3", "PPLA4", "PPLA5", "PPLC"];

/// GeoNames feature class. Each class is stored in its own partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum FeatureClass {
    /// Administrative area (country, state, region)
    A,
    /// Hydrographic feature (stream, lake)
    H,
    /// Park or area
    L,
    /// Populated place (city, village)
    P,
    /// Road or railroad
    R,
    /// Spot, building or farm
    S,
    /// Mountain, hill or rock
    T,
    /// Undersea feature
    U,
    /// Forest or heath
    V,
}

impl FeatureClass {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "A" => Some(FeatureClass::A),
            "H" => Some(FeatureClass::H),
            "L" => Some(FeatureClass::L),
            "P" => Some(FeatureClass::P),
            "R" => Some(FeatureClass::R),
            "S" => Some(FeatureClass::S),
            "T" => Some(FeatureClass::T),
            "U" => Some(FeatureClass::U),
            "V" => Some(FeatureClass::V),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureClass::A => "A",
            FeatureClass::H => "H",
            FeatureClass::L => "L",
            FeatureClass::P => "P",
            FeatureClass::R => "R",
            FeatureClass::S => "S",
            FeatureClass::T => "T",
            FeatureClass::U => "U",
            FeatureClass::V => "V",
        }
    }

    /// All classes in partition order
    pub fn all() -> &'static [FeatureClass] {
        &[
            FeatureClass::A,
            FeatureClass::H,
            FeatureClass::L,
            FeatureClass::P,
            FeatureClass::R,
            FeatureClass::S,
            FeatureClass::T,
            FeatureClass::U,
            FeatureClass::V,
        ]
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            FeatureClass::A => 0,
            FeatureClass::H => 1,
            FeatureClass::L => 2,
            FeatureClass::P => 3,
            FeatureClass::R => 4,
            FeatureClass::S => 5,
            FeatureClass::T => 6,
            FeatureClass::U => 7,
            FeatureClass::V => 8,
        }
    }
}

impl std::fmt::Display for FeatureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic point (lat/lon) in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and inside [-90, 90] x [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Planar distance in degree space. Not geodesic.
    pub fn planar_distance(&self, other: &GeoPoint) -> f64 {
        (self.lat - other.lat).hypot(self.lon - other.lon)
    }
}

/// A single record of the geographic dataset.
///
/// Records are read-only input to the resolver. The only transient field is
/// `distance`, which the store fills in on query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Source dataset identifier (GeoNames id)
    pub external_id: i64,

    pub name: String,

    #[serde(default)]
    pub ascii_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_names: Vec<String>,

    pub coordinate: GeoPoint,

    pub feature_class: FeatureClass,

    pub feature_code: String,

    /// ISO 3166-1 alpha-2, upper case
    pub country_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin1_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin2_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin3_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin4_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,

    /// Elevation in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Last modification date in the source dataset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<NaiveDate>,

    /// Planar distance to the query point, set on query results only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl PlaceRecord {
    /// Create a record with the minimal required fields
    pub fn new(
        external_id: i64,
        name: &str,
        feature_class: FeatureClass,
        feature_code: &str,
        country_code: &str,
        coordinate: GeoPoint,
    ) -> Self {
        Self {
            external_id,
            name: name.to_string(),
            ascii_name: name.to_string(),
            alternate_names: Vec::new(),
            coordinate,
            feature_class,
            feature_code: feature_code.to_string(),
            country_code: country_code.to_string(),
            admin1_code: None,
            admin2_code: None,
            admin3_code: None,
            admin4_code: None,
            population: None,
            elevation: None,
            timezone: None,
            modified: None,
            distance: None,
        }
    }

    /// Get the admin code for a given level
    pub fn admin_code(&self, level: AdminLevel) -> Option<&str> {
        match level {
            AdminLevel::Adm1 => self.admin1_code.as_deref(),
            AdminLevel::Adm2 => self.admin2_code.as_deref(),
            AdminLevel::Adm3 => self.admin3_code.as_deref(),
            AdminLevel::Adm4 => self.admin4_code.as_deref(),
        }
    }

    /// Set the admin code for a given level
    pub fn set_admin_code(&mut self, level: AdminLevel, code: Option<String>) {
        match level {
            AdminLevel::Adm1 => self.admin1_code = code,
            AdminLevel::Adm2 => self.admin2_code = code,
            AdminLevel::Adm3 => self.admin3_code = code,
            AdminLevel::Adm4 => self.admin4_code = code,
        }
    }

    /// Population, with a missing value counted as zero
    pub fn population_or_zero(&self) -> u64 {
        self.population.unwrap_or(0)
    }

    /// PPL or PPLX
    pub fn is_district_like(&self) -> bool {
        DISTRICT_CODES.contains(&self.feature_code.as_str())
    }

    /// PPLA, PPLA2..PPLA5 or PPLC
    pub fn is_admin_seat(&self) -> bool {
        ADMIN_SEAT_CODES.contains(&self.feature_code.as_str())
    }

    /// Same admin4 code, where two missing codes count as equal
    pub fn shares_admin4(&self, other: &PlaceRecord) -> bool {
        self.admin4_code == other.admin4_code
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }
}
