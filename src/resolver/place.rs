//! Resolution of one coordinate into a fully annotated place.

use futures::future::BoxFuture;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use super::{
    check_rows, AdminHierarchyResolver, CountryRules, PoiAttacher, PoiKind, ResolveOptions,
};
use crate::error::ResolutionError;
use crate::i18n::Translator;
use crate::models::{
    Branch, CitySource, FeatureClass, GeoPoint, NearbyFeatures, PlaceRecord, Resolution,
    ResolveTrace, ResolvedPlace,
};
use crate::store::{NearestQuery, SharedStore};

/// Populated-place candidates fetched per call unless configured otherwise
pub const DEFAULT_CANDIDATE_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Class-P candidates considered per call
    pub candidate_limit: usize,
    /// Bound on concurrent state/POI lookups; defaults to the store capacity
    pub max_concurrent_lookups: Option<usize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            max_concurrent_lookups: None,
        }
    }
}

/// Result of one of the independent lookups run after the city is known
enum Lookup {
    State(Option<PlaceRecord>),
    Poi(PoiKind, Option<PlaceRecord>),
}

/// Reverse place resolver.
///
/// Holds no per-call state; one instance can serve concurrent calls.
pub struct PlaceResolver {
    store: SharedStore,
    admin: AdminHierarchyResolver,
    poi: PoiAttacher,
    translator: Arc<dyn Translator>,
    candidate_limit: usize,
    concurrency: usize,
}

impl PlaceResolver {
    pub fn new(store: SharedStore, translator: Arc<dyn Translator>) -> Self {
        Self::with_config(
            store,
            translator,
            CountryRules::default(),
            ResolverConfig::default(),
        )
    }

    pub fn with_config(
        store: SharedStore,
        translator: Arc<dyn Translator>,
        rules: CountryRules,
        config: ResolverConfig,
    ) -> Self {
        let concurrency = config
            .max_concurrent_lookups
            .unwrap_or_else(|| store.capacity())
            .max(1);

        Self {
            admin: AdminHierarchyResolver::new(store.clone(), rules),
            poi: PoiAttacher::new(store.clone()),
            store,
            translator,
            candidate_limit: config.candidate_limit.max(1),
            concurrency,
        }
    }

    /// Resolve a coordinate into its place, district, city, state, country
    /// and nearby points of interest.
    pub async fn resolve(
        &self,
        lat: f64,
        lon: f64,
        options: &ResolveOptions,
    ) -> Result<Resolution, ResolutionError> {
        let point = GeoPoint::new(lat, lon);
        if !point.is_valid() {
            return Err(ResolutionError::InvalidCoordinate { lat, lon });
        }

        let call_id = Uuid::new_v4();
        let span = info_span!("resolve", %call_id, lat, lon);

        let work = self.resolve_point(point, call_id, options).instrument(span);
        match tokio::time::timeout(options.timeout, work).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Resolution of ({}, {}) timed out after {:?}",
                    lat, lon, options.timeout
                );
                Err(ResolutionError::Timeout(options.timeout))
            }
        }
    }

    async fn resolve_point(
        &self,
        point: GeoPoint,
        call_id: Uuid,
        options: &ResolveOptions,
    ) -> Result<Resolution, ResolutionError> {
        let query = NearestQuery::new(FeatureClass::P, point, self.candidate_limit);
        let candidates = self.store.find_nearest(&query).await?;
        check_rows(FeatureClass::P, &candidates)?;

        let Some((nearest, rest)) = candidates.split_first() else {
            debug!("No populated place near ({}, {})", point.lat, point.lon);
            return Ok(Resolution::NotFound);
        };

        let mut place = nearest.clone();
        let mut trace = ResolveTrace {
            call_id,
            candidates: candidates.len(),
            branch: Branch::AdminSeat,
            city_source: None,
            population_search: false,
            population_backfilled: false,
        };

        let (district, city) = if place.is_district_like() {
            trace.branch = Branch::District;
            self.city_for_district(&mut place, rest, &mut trace).await?
        } else {
            trace.city_source = Some(CitySource::Nearest);
            let district = first_sibling(rest, &place, PlaceRecord::is_district_like);
            (district, Some(place.clone()))
        };

        let country = self.translator.translate(&place.country_code);
        let (state, nearby) = self.state_and_nearby(city.as_ref(), point).await?;

        debug!(
            "Resolved {} ({}) district={:?} city={:?} state={:?}",
            place.name,
            place.feature_code,
            district.as_ref().map(|d| d.external_id),
            city.as_ref().map(|c| c.external_id),
            state.as_ref().map(|s| s.external_id)
        );

        Ok(Resolution::Found(Box::new(ResolvedPlace {
            place,
            district,
            city,
            state,
            country,
            nearby,
            trace: options.trace.then_some(trace),
        })))
    }

    /// Pick the city of a district-like place.
    ///
    /// Returns (district, city). The district is the place itself, with its
    /// population taken from the first populated sibling when it has none.
    async fn city_for_district(
        &self,
        place: &mut PlaceRecord,
        rest: &[PlaceRecord],
        trace: &mut ResolveTrace,
    ) -> Result<(Option<PlaceRecord>, Option<PlaceRecord>), ResolutionError> {
        let city_from_admin = self.admin.city_from_admin_codes(place).await?;
        let city_by_admin_seat = first_sibling(rest, place, PlaceRecord::is_admin_seat);

        let city_by_population = if place.population_or_zero() > 0 {
            None
        } else {
            trace.population_search = true;
            first_sibling(rest, place, |c| c.population_or_zero() > 0)
        };

        if let Some(ref sibling) = city_by_population {
            debug!(
                "District {} takes population {} from {}",
                place.external_id,
                sibling.population_or_zero(),
                sibling.external_id
            );
            place.population = sibling.population;
            trace.population_backfilled = true;
        }

        let city = match (city_from_admin, city_by_population) {
            (Some(city), _) => {
                trace.city_source = Some(CitySource::AdminCodes);
                Some(city)
            }
            (None, Some(city)) if city.population_or_zero() > 0 => {
                trace.city_source = Some(CitySource::Population);
                Some(city)
            }
            _ => {
                if city_by_admin_seat.is_some() {
                    trace.city_source = Some(CitySource::AdminSeat);
                }
                city_by_admin_seat
            }
        };

        Ok((Some(place.clone()), city))
    }

    /// State lookup and the four POI lookups, fanned out over a bounded pool
    async fn state_and_nearby(
        &self,
        city: Option<&PlaceRecord>,
        point: GeoPoint,
    ) -> Result<(Option<PlaceRecord>, NearbyFeatures), ResolutionError> {
        let mut lookups: Vec<BoxFuture<'_, Result<Lookup, ResolutionError>>> =
            Vec::with_capacity(1 + PoiKind::all().len());

        lookups.push(Box::pin(async move {
            let state = match city {
                Some(city) => self.admin.state_from_city(city).await?,
                None => None,
            };
            Ok(Lookup::State(state))
        }));

        for kind in PoiKind::all().iter().copied() {
            lookups.push(Box::pin(async move {
                let record = self.poi.nearest_within(kind, point).await?;
                Ok(Lookup::Poi(kind, record))
            }));
        }

        let outcomes: Vec<Lookup> = stream::iter(lookups)
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        let mut state = None;
        let mut nearby = NearbyFeatures::default();
        for outcome in outcomes {
            match outcome {
                Lookup::State(found) => state = found,
                Lookup::Poi(kind, Some(record)) => kind.slot(&mut nearby).push(record),
                Lookup::Poi(_, None) => {}
            }
        }

        Ok((state, nearby))
    }
}

/// First later candidate matching `pred` that shares the anchor's admin4 code
fn first_sibling<F>(rest: &[PlaceRecord], anchor: &PlaceRecord, pred: F) -> Option<PlaceRecord>
where
    F: Fn(&PlaceRecord) -> bool,
{
    rest.iter()
        .find(|c| pred(*c) && c.shares_admin4(anchor))
        .cloned()
}
