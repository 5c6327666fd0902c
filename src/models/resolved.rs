//! Per-call resolution output.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PlaceRecord;

/// Nearby points of interest attached to a resolved place.
///
/// Each list holds at most the single nearest in-range record of its class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearbyFeatures {
    pub parks: Vec<PlaceRecord>,
    pub forests: Vec<PlaceRecord>,
    pub mountains: Vec<PlaceRecord>,
    pub spots: Vec<PlaceRecord>,
}

/// A populated place annotated with its district, city, state, country and
/// nearby points of interest. Built fresh by every resolve call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    /// Nearest class-P candidate
    pub place: PlaceRecord,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<PlaceRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<PlaceRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<PlaceRecord>,

    /// Display name of the place's country
    pub country: String,

    #[serde(flatten)]
    pub nearby: NearbyFeatures,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<ResolveTrace>,
}

/// Outcome of a resolve call that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(Box<ResolvedPlace>),
    /// No class-P candidate near the coordinate
    NotFound,
}

impl Resolution {
    pub fn found(self) -> Option<ResolvedPlace> {
        match self {
            Resolution::Found(place) => Some(*place),
            Resolution::NotFound => None,
        }
    }
}

/// Which way the nearest candidate was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    /// Nearest candidate is PPL/PPLX and becomes the district
    District,
    /// Nearest candidate is an admin seat (or unclassified) and becomes the city
    AdminSeat,
}

/// Which rule picked the city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitySource {
    /// The nearest candidate itself
    Nearest,
    /// Class-A record matched by admin codes
    AdminCodes,
    /// Populated sibling sharing the district's admin4 code
    Population,
    /// Admin-seat sibling sharing the district's admin4 code
    AdminSeat,
}

/// Decision record attached when `ResolveOptions::trace` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveTrace {
    pub call_id: Uuid,
    pub candidates: usize,
    pub branch: Branch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_source: Option<CitySource>,
    /// Whether the population sibling search ran
    pub population_search: bool,
    /// Whether the district population was taken from a sibling
    pub population_backfilled: bool,
}
