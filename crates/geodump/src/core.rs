//! The in-memory reference store and its query API.
//!
//! A [`ReferenceStore`] holds the four GeoNames collections (countries,
//! admin1, admin2 and cities) together with code indexes built once at load.
//! Every query is a read against that immutable state, so a store can be
//! cloned cheaply and shared across threads.
//!
//! # Quick Start
//!
//! ```rust
//! use geodump::{Country, ReferenceStore};
//!
//! let store = ReferenceStore::from_entities(
//!     vec![
//!         Country::new(6252001, "US", "USA", "United States"),
//!         Country::new(2921044, "DE", "DEU", "Germany"),
//!     ],
//!     vec![],
//!     vec![],
//!     vec![],
//! )?;
//!
//! // ISO codes match case-insensitively
//! assert_eq!(store.search("usa")[0].iso, "US");
//! // Anything else falls back to a case-sensitive name prefix
//! assert_eq!(store.search("Germ")[0].iso, "DE");
//! assert!(store.search("xx").is_empty());
//! # Ok::<(), geodump::error::GeodumpError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use geodump_data_processing::{DataSource, ReferenceData};
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::{
    config::StoreConfig,
    entity::{Admin1, Admin2, Admin2Scope, City, CityScope, Country, Division, GeoFeature, Scope},
    error::Result,
    hierarchy::LocationContext,
    index::ReferenceIndex,
    search::{MatchKind, iso_positions, name_positions, search_positions},
};

#[derive(Debug)]
struct StoreInner {
    source: Option<DataSource>,
    countries: Vec<Country>,
    admin1: Vec<Admin1>,
    admin2: Vec<Admin2>,
    cities: Vec<City>,
    index: ReferenceIndex,
}

/// Read-only store of countries, administrative divisions and cities.
///
/// Lookups never fail: when nothing matches they return an empty `Vec` or
/// `None`. Results come back in the order the rows were loaded.
///
/// # Examples
///
/// Loading from the processed GeoNames cache:
/// ```rust,no_run
/// use geodump::{DataSource, ReferenceStore, StoreConfig};
///
/// let config = StoreConfig::builder()
///     .data_dir("./geodump_data")
///     .data_source(DataSource::Cities15000)
///     .build();
/// let store = ReferenceStore::initialize(&config)?;
///
/// for country in store.search("DE") {
///     println!("{} has {} cities", country.name, store.cities_of(country).len());
/// }
/// # Ok::<(), geodump::error::GeodumpError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    inner: Arc<StoreInner>,
}

impl ReferenceStore {
    /// Load the store as described by `config`.
    ///
    /// The processed parquet cache is reused when it is current, otherwise it
    /// is regenerated from the raw GeoNames files under the data directory.
    #[instrument(name = "Initialize ReferenceStore", level = "info")]
    pub fn initialize(config: &StoreConfig) -> Result<Self> {
        info!(
            "Initializing ReferenceStore with data source: {:?}",
            config.data_source
        );
        let t_init = std::time::Instant::now();

        let data = ReferenceData::load(
            &config.raw_dir(),
            &config.processed_dir(),
            config.data_source,
            config.rebuild,
        )?;
        let store = Self::from_data(&data)?;

        info!(
            elapsed_seconds = ?t_init.elapsed(),
            "ReferenceStore initialization complete"
        );
        Ok(store)
    }

    /// Load from the global data directory with default settings for `source`.
    pub fn new(source: DataSource) -> Result<Self> {
        Self::initialize(&StoreConfig {
            data_source: source,
            ..StoreConfig::default()
        })
    }

    /// Materialise the processed frames of `data` and index them.
    #[instrument(name = "Load ReferenceStore from frames", level = "info", skip_all)]
    pub fn from_data(data: &ReferenceData) -> Result<Self> {
        let countries = Country::from_df(&data.countries_df()?.clone().collect()?)?;
        let admin1 = Admin1::from_df(&data.admin1_df()?.clone().collect()?)?;
        let admin2 = Admin2::from_df(&data.admin2_df()?.clone().collect()?)?;
        let cities = City::from_df(&data.cities_df()?.clone().collect()?)?;

        Self::build(Some(data.source()), countries, admin1, admin2, cities)
    }

    /// Build a store from rows that are already in memory.
    ///
    /// Fails with [`IndexError::DuplicateKey`](crate::index::IndexError::DuplicateKey)
    /// when two countries share a `geoname_id`. An admin2 row whose admin1
    /// parent is missing is accepted.
    pub fn from_entities(
        countries: Vec<Country>,
        admin1: Vec<Admin1>,
        admin2: Vec<Admin2>,
        cities: Vec<City>,
    ) -> Result<Self> {
        Self::build(None, countries, admin1, admin2, cities)
    }

    #[instrument(name = "Build ReferenceStore", level = "info", skip_all, fields(source = ?source))]
    fn build(
        source: Option<DataSource>,
        countries: Vec<Country>,
        admin1: Vec<Admin1>,
        admin2: Vec<Admin2>,
        cities: Vec<City>,
    ) -> Result<Self> {
        let index = ReferenceIndex::build(&countries, &admin1, &admin2, &cities)?;
        info!(
            countries = countries.len(),
            admin1 = admin1.len(),
            admin2 = admin2.len(),
            cities = cities.len(),
            "Indexed reference data"
        );

        Ok(Self {
            inner: Arc::new(StoreInner {
                source,
                countries,
                admin1,
                admin2,
                cities,
                index,
            }),
        })
    }

    // === Country search ===

    /// Countries matching `query` as an ISO code, or failing that as a name prefix.
    ///
    /// The two match sets are never merged: a non-empty ISO result is returned as is.
    pub fn search(&self, query: &str) -> Vec<&Country> {
        self.search_with_kind(query).1
    }

    /// Like [`search`](Self::search), also reporting which scope matched.
    ///
    /// An empty result is reported as [`MatchKind::Name`] since that scope ran last.
    pub fn search_with_kind(&self, query: &str) -> (MatchKind, Vec<&Country>) {
        let (kind, positions) = search_positions(&self.inner.index.countries, query);
        (kind, pick(&self.inner.countries, &positions))
    }

    /// Countries whose `iso` or `iso3` equals `query` uppercased.
    pub fn search_by_iso(&self, query: &str) -> Vec<&Country> {
        pick(
            &self.inner.countries,
            &iso_positions(&self.inner.index.countries, query),
        )
    }

    /// Countries whose name starts with `query`, compared case-sensitively.
    pub fn search_by_name(&self, query: &str) -> Vec<&Country> {
        pick(
            &self.inner.countries,
            &name_positions(&self.inner.index.countries, query),
        )
    }

    /// Run [`search`](Self::search) for every query in parallel, keeping input order.
    #[instrument(name = "Bulk Search", level = "debug", skip_all, fields(queries = queries.len()))]
    pub fn search_bulk<Q>(&self, queries: &[Q]) -> Vec<Vec<&Country>>
    where
        Q: AsRef<str> + Sync,
    {
        queries
            .par_iter()
            .map(|query| self.search(query.as_ref()))
            .collect()
    }

    // === Hierarchy navigation ===

    /// Cities inside a country, an admin1 or an admin2.
    ///
    /// Cities match on every code of the scope, so an admin2 only yields
    /// cities carrying its country, admin1 and admin2 codes.
    pub fn cities_of(&self, scope: &impl CityScope) -> Vec<&City> {
        pick(
            &self.inner.cities,
            self.inner.index.cities.get(&scope.city_scope()),
        )
    }

    /// First-level divisions of `country`.
    pub fn admin1_of(&self, country: &Country) -> Vec<&Admin1> {
        pick(
            &self.inner.admin1,
            self.inner.index.admin1.get(&Scope::Country(&country.iso)),
        )
    }

    /// Second-level divisions inside a country or an admin1.
    pub fn admin2_of(&self, scope: &impl Admin2Scope) -> Vec<&Admin2> {
        pick(
            &self.inner.admin2,
            self.inner.index.admin2.get(&scope.admin2_scope()),
        )
    }

    pub fn country_by_geoname_id(&self, geoname_id: u32) -> Option<&Country> {
        self.inner
            .index
            .countries
            .by_geoname_id(geoname_id)
            .and_then(|position| self.inner.countries.get(position))
    }

    /// The country whose `iso` equals the feature's country code.
    pub fn country_of(&self, feature: &impl GeoFeature) -> Option<&Country> {
        self.inner
            .index
            .countries
            .by_iso(feature.country_code())
            .first()
            .and_then(|&position| self.inner.countries.get(position))
    }

    /// The admin1 row a division belongs to; for an [`Admin1`] that is the stored row itself.
    pub fn admin1_for<D: Division>(&self, division: &D) -> Option<&Admin1> {
        self.admin1_by_codes(division.country_code(), division.admin1_code())
    }

    /// The admin1 row an admin2 points at, `None` when that reference dangles.
    pub fn admin1_parent(&self, admin2: &Admin2) -> Option<&Admin1> {
        let parent = self.admin1_for(admin2);
        if parent.is_none() {
            warn!(admin2 = %admin2, "Admin2 references a missing admin1");
        }
        parent
    }

    /// Resolve the country, admin1 and admin2 rows a city's codes point at.
    pub fn resolve_hierarchy<'a>(&'a self, city: &'a City) -> LocationContext<'a> {
        let admin1 = city
            .admin1_code
            .as_deref()
            .and_then(|admin1_code| self.admin1_by_codes(&city.country_code, admin1_code));
        let admin2 = city
            .admin1_code
            .as_deref()
            .zip(city.admin2_code.as_deref())
            .and_then(|(admin1_code, admin2_code)| {
                self.inner
                    .index
                    .admin2
                    .get(&Scope::Admin2(&city.country_code, admin1_code, admin2_code))
                    .first()
                    .and_then(|&position| self.inner.admin2.get(position))
            });

        LocationContext {
            country: self.country_of(city),
            admin1,
            admin2,
            city,
        }
    }

    fn admin1_by_codes(&self, country_code: &str, admin1_code: &str) -> Option<&Admin1> {
        self.inner
            .index
            .admin1
            .get(&Scope::Admin1(country_code, admin1_code))
            .first()
            .and_then(|&position| self.inner.admin1.get(position))
    }

    // === Collections ===

    pub fn countries(&self) -> &[Country] {
        &self.inner.countries
    }

    pub fn admin1(&self) -> &[Admin1] {
        &self.inner.admin1
    }

    pub fn admin2(&self) -> &[Admin2] {
        &self.inner.admin2
    }

    pub fn cities(&self) -> &[City] {
        &self.inner.cities
    }

    /// The data source the store was loaded from; `None` when built from entities.
    pub fn source(&self) -> Option<DataSource> {
        self.inner.source
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            source: self.inner.source,
            countries: self.inner.countries.len(),
            admin1: self.inner.admin1.len(),
            admin2: self.inner.admin2.len(),
            cities: self.inner.cities.len(),
        }
    }
}

fn pick<'a, T>(rows: &'a [T], positions: &[usize]) -> Vec<&'a T> {
    positions
        .iter()
        .filter_map(|&position| rows.get(position))
        .collect()
}

/// Row counts of a [`ReferenceStore`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub source: Option<DataSource>,
    pub countries: usize,
    pub admin1: usize,
    pub admin2: usize,
    pub cities: usize,
}

impl StoreStats {
    #[must_use]
    pub fn total(&self) -> usize {
        self.countries + self.admin1 + self.admin2 + self.cities
    }
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self
            .source
            .map_or_else(|| "in-memory".to_string(), |source| source.to_string());
        write!(
            f,
            "ReferenceStore ({source}): {} countries, {} admin1, {} admin2, {} cities",
            self.countries, self.admin1, self.admin2, self.cities
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::GeodumpError, index::IndexError};

    fn names<T: GeoFeature>(rows: &[&T]) -> Vec<String> {
        rows.iter().map(|row| row.name().to_string()).collect()
    }

    fn store() -> ReferenceStore {
        let countries = vec![
            Country::new(6252001, "US", "USA", "United States"),
            Country::new(2921044, "DE", "DEU", "Germany"),
            Country::new(6697173, "AQ", "ATA", "Antarctica"),
        ];
        let admin1 = vec![
            Admin1::new(5332921, "US", "CA", "California"),
            Admin1::new(5128638, "US", "NY", "New York"),
            Admin1::new(2951839, "DE", "02", "Bavaria"),
        ];
        let admin2 = vec![
            Admin2::new(5391997, "US", "CA", "075", "City and County of San Francisco"),
            Admin2::new(5368381, "US", "CA", "037", "Los Angeles County"),
            Admin2::new(5128594, "US", "NY", "061", "New York County"),
            Admin2::new(2861322, "DE", "02", "091", "Upper Bavaria"),
            Admin2::new(9999001, "US", "ZZ", "001", "Orphan County"),
        ];
        let cities = vec![
            City::new(5391959, "San Francisco", "US", Some("CA"), Some("075")),
            City::new(5368361, "Los Angeles", "US", Some("CA"), Some("037")),
            City::new(5128581, "New York City", "US", Some("NY"), Some("061")),
            City::new(2867714, "Munich", "DE", Some("02"), Some("091")),
            City::new(2950159, "Berlin", "DE", Some("16"), None),
        ];
        ReferenceStore::from_entities(countries, admin1, admin2, cities).unwrap()
    }

    #[test]
    fn test_search_scenario() {
        let store = store();

        assert_eq!(names(&store.search("USA")), vec!["United States"]);
        assert!(store.search_by_iso("Germ").is_empty());
        assert_eq!(names(&store.search("Germ")), vec!["Germany"]);
        assert!(store.search("xx").is_empty());
    }

    #[test]
    fn test_search_never_unions_scopes() {
        let store = store();

        for query in ["US", "us", "DEU", "Germ", "United", "A", "", "xx", "ata"] {
            let iso = store.search_by_iso(query);
            let expected = if iso.is_empty() {
                store.search_by_name(query)
            } else {
                iso
            };
            assert_eq!(store.search(query), expected, "query {query:?}");
        }
    }

    #[test]
    fn test_search_with_kind() {
        let store = store();
        assert_eq!(store.search_with_kind("ata").0, MatchKind::Iso);
        assert_eq!(store.search_with_kind("Ant").0, MatchKind::Name);
    }

    #[test]
    fn test_search_by_iso_ignores_case() {
        let store = store();
        assert_eq!(store.search_by_iso("US"), store.search_by_iso("us"));
        assert_eq!(store.search_by_iso("deu"), store.search_by_iso("DE"));
    }

    #[test]
    fn test_search_by_name_is_case_sensitive_prefix() {
        let store = store();
        assert_eq!(names(&store.search_by_name("Ger")), vec!["Germany"]);
        assert!(store.search_by_name("ger").is_empty());
        assert!(store.search_by_name("many").is_empty());
    }

    #[test]
    fn test_search_bulk_keeps_query_order() {
        let store = store();
        let results = store.search_bulk(&["de", "Ant", "nothing", "USA"]);

        assert_eq!(results.len(), 4);
        assert_eq!(names(&results[0]), vec!["Germany"]);
        assert_eq!(names(&results[1]), vec!["Antarctica"]);
        assert!(results[2].is_empty());
        assert_eq!(names(&results[3]), vec!["United States"]);
    }

    #[test]
    fn test_cities_of_country() {
        let store = store();
        let us = store.search("US")[0];
        let antarctica = store.search("AQ")[0];

        let cities = store.cities_of(us);
        assert_eq!(cities.len(), 3);
        assert!(cities.iter().all(|city| city.country_code == us.iso));
        assert!(store.cities_of(antarctica).is_empty());
    }

    #[test]
    fn test_cities_of_divisions() {
        let store = store();
        let california = &store.admin1()[0];
        let la_county = &store.admin2()[1];

        assert_eq!(
            names(&store.cities_of(california)),
            vec!["San Francisco", "Los Angeles"]
        );
        assert_eq!(names(&store.cities_of(la_county)), vec!["Los Angeles"]);
    }

    #[test]
    fn test_admin1_of() {
        let store = store();
        let us = store.search("US")[0];
        assert_eq!(names(&store.admin1_of(us)), vec!["California", "New York"]);
    }

    #[test]
    fn test_admin2_of_admin1_is_subset_of_country() {
        let store = store();
        let us = store.search("US")[0];

        let of_country = store.admin2_of(us);
        assert_eq!(of_country.len(), 4, "Dangling admin2 still belongs to its country");

        for admin1 in store.admin1_of(us) {
            let of_admin1 = store.admin2_of(admin1);
            assert!(of_admin1.len() < of_country.len());
            assert!(of_admin1.iter().all(|row| of_country.contains(row)));
            assert!(of_admin1.iter().all(|row| row.admin1_code == admin1.admin1_code));
        }
    }

    #[test]
    fn test_country_lookups() {
        let store = store();

        assert_eq!(
            store.country_by_geoname_id(2921044).map(|c| c.iso.as_str()),
            Some("DE")
        );
        assert!(store.country_by_geoname_id(1).is_none());

        let munich = &store.cities()[3];
        assert_eq!(store.country_of(munich).map(|c| c.iso.as_str()), Some("DE"));
        assert!(store
            .country_of(&City::new(1, "Nowhere", "XX", None, None))
            .is_none());
    }

    #[test]
    fn test_admin1_parent_tolerates_dangling_reference() {
        let store = store();

        let san_francisco_county = &store.admin2()[0];
        assert_eq!(
            store.admin1_parent(san_francisco_county).map(|a| a.name.as_str()),
            Some("California")
        );

        let orphan = &store.admin2()[4];
        assert!(store.admin1_parent(orphan).is_none());

        let bavaria = &store.admin1()[2];
        assert_eq!(store.admin1_for(bavaria), Some(bavaria));
    }

    #[test]
    fn test_resolve_hierarchy() {
        let store = store();

        let san_francisco = &store.cities()[0];
        let context = store.resolve_hierarchy(san_francisco);
        assert_eq!(
            context.names(),
            vec![
                "United States",
                "California",
                "City and County of San Francisco",
                "San Francisco"
            ]
        );
        assert!(context.is_complete());

        // No admin1 row for DE.16 in this store
        let berlin = &store.cities()[4];
        let context = store.resolve_hierarchy(berlin);
        assert_eq!(context.country.map(|c| c.iso.as_str()), Some("DE"));
        assert!(context.admin1.is_none());
        assert!(context.admin2.is_none());
        assert!(!context.is_complete());
    }

    #[test]
    fn test_same_admin2_code_under_two_admin1s() {
        let store = ReferenceStore::from_entities(
            vec![Country::new(6252001, "US", "USA", "United States")],
            vec![
                Admin1::new(5332921, "US", "CA", "California"),
                Admin1::new(5128638, "US", "NY", "New York"),
            ],
            vec![
                Admin2::new(5322745, "US", "CA", "001", "Alameda County"),
                Admin2::new(5106834, "US", "NY", "001", "Albany County"),
            ],
            vec![
                City::new(5378538, "Oakland", "US", Some("CA"), Some("001")),
                City::new(5106834, "Albany", "US", Some("NY"), Some("001")),
            ],
        )
        .unwrap();
        let [alameda, albany] = [&store.admin2()[0], &store.admin2()[1]];
        let [california, new_york] = [&store.admin1()[0], &store.admin1()[1]];

        assert_eq!(names(&store.cities_of(alameda)), vec!["Oakland"]);
        assert_eq!(names(&store.cities_of(albany)), vec!["Albany"]);
        assert_eq!(names(&store.admin2_of(california)), vec!["Alameda County"]);
        assert_eq!(names(&store.admin2_of(new_york)), vec!["Albany County"]);

        let context = store.resolve_hierarchy(&store.cities()[1]);
        assert_eq!(context.admin1.map(|a| a.name.as_str()), Some("New York"));
        assert_eq!(context.admin2.map(|a| a.name.as_str()), Some("Albany County"));
    }

    #[test]
    fn test_dotted_admin1_code_does_not_capture_admin2_cities() {
        let store = ReferenceStore::from_entities(
            vec![Country::new(6252001, "US", "USA", "United States")],
            vec![
                Admin1::new(5332921, "US", "CA", "California"),
                Admin1::new(9999002, "US", "CA.075", "Dotted"),
            ],
            vec![Admin2::new(
                5391997,
                "US",
                "CA",
                "075",
                "City and County of San Francisco",
            )],
            vec![City::new(5391959, "San Francisco", "US", Some("CA"), Some("075"))],
        )
        .unwrap();
        let dotted = &store.admin1()[1];

        assert!(store.cities_of(dotted).is_empty());
        assert!(store.admin2_of(dotted).is_empty());
        assert_eq!(names(&store.cities_of(&store.admin2()[0])), vec!["San Francisco"]);
    }

    #[test]
    fn test_duplicate_country_geoname_id_fails() {
        let result = ReferenceStore::from_entities(
            vec![
                Country::new(6252001, "US", "USA", "United States"),
                Country::new(6252001, "UM", "UMI", "U.S. Minor Outlying Islands"),
            ],
            vec![],
            vec![],
            vec![],
        );

        assert!(matches!(
            result,
            Err(GeodumpError::IndexError(IndexError::DuplicateKey {
                geoname_id: 6252001,
                ..
            }))
        ));
    }

    #[test]
    fn test_stats_and_clone_share_data() {
        let store = store();
        let stats = store.stats();

        assert_eq!(stats.countries, 3);
        assert_eq!(stats.cities, 5);
        assert_eq!(stats.total(), 3 + 3 + 5 + 5);
        assert_eq!(stats.source, None);
        assert!(stats.to_string().starts_with("ReferenceStore (in-memory)"));

        let cloned = store.clone();
        assert!(std::ptr::eq(store.countries(), cloned.countries()));
    }

    #[test]
    fn test_store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReferenceStore>();
    }
}
