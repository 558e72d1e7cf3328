//! Code-keyed lookup tables built once when the store is loaded.
//!
//! GeoNames links rows by code strings rather than surrogate keys. Instead of
//! scanning a collection per query, every row position is filed under the
//! [`ScopeKey`] of each scope it belongs to (`US`, `US.CA`, `US.CA.075`).

use std::collections::BTreeMap;
use std::ops::Bound;

use ahash::{AHashMap, AHashSet};
pub use error::IndexError;
use error::Result;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::entity::{Admin1, Admin2, City, Country, Scope, ScopeKey};

/// Positions of rows filed under their scope keys.
#[derive(Debug, Clone, Default)]
pub struct ScopeIndex {
    positions: AHashMap<ScopeKey, Vec<usize>>,
}

impl ScopeIndex {
    fn build<'a, T: 'a>(
        rows: impl IntoIterator<Item = &'a T>,
        scopes: impl Fn(&'a T) -> Vec<Scope<'a>>,
    ) -> Self {
        let mut positions: AHashMap<ScopeKey, Vec<usize>> = AHashMap::new();
        for (position, row) in rows.into_iter().enumerate() {
            for scope in scopes(row) {
                positions.entry(scope.to_key()).or_default().push(position);
            }
        }
        Self { positions }
    }

    /// Row positions under `scope`, in load order. Empty when nothing is filed there.
    #[must_use]
    pub fn get(&self, scope: &Scope<'_>) -> &[usize] {
        self.positions
            .get(&scope.to_key())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Country lookups: by ISO code, by name prefix and by geoname id.
#[derive(Debug, Clone, Default)]
pub struct CountryIndex {
    /// `iso` and `iso3` values exactly as loaded
    by_code: AHashMap<String, Vec<usize>>,
    /// `iso` values only, for resolving a feature's country code
    by_iso: AHashMap<String, Vec<usize>>,
    by_name: BTreeMap<String, Vec<usize>>,
    by_geoname_id: AHashMap<u32, usize>,
}

impl CountryIndex {
    /// Index `countries`, rejecting a repeated `geoname_id`.
    pub fn build(countries: &[Country]) -> Result<Self> {
        let mut index = Self::default();
        for (position, country) in countries.iter().enumerate() {
            if index
                .by_geoname_id
                .insert(country.geoname_id, position)
                .is_some()
            {
                return Err(IndexError::DuplicateKey {
                    entity: "country",
                    geoname_id: country.geoname_id,
                });
            }

            index
                .by_code
                .entry(country.iso.clone())
                .or_default()
                .push(position);
            if country.iso3 != country.iso {
                index
                    .by_code
                    .entry(country.iso3.clone())
                    .or_default()
                    .push(position);
            }
            index
                .by_iso
                .entry(country.iso.clone())
                .or_default()
                .push(position);
            index
                .by_name
                .entry(country.name.clone())
                .or_default()
                .push(position);
        }
        Ok(index)
    }

    /// Positions whose `iso` or `iso3` equals `code` exactly.
    #[must_use]
    pub fn by_code(&self, code: &str) -> &[usize] {
        self.by_code
            .get(code)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Positions whose `iso` equals `code` exactly.
    #[must_use]
    pub fn by_iso(&self, code: &str) -> &[usize] {
        self.by_iso
            .get(code)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Positions whose name starts with `prefix` (case-sensitive), in load order.
    #[must_use]
    pub fn by_name_prefix(&self, prefix: &str) -> Vec<usize> {
        self.by_name
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(name, _)| name.starts_with(prefix))
            .flat_map(|(_, positions)| positions.iter().copied())
            .sorted_unstable()
            .collect()
    }

    #[must_use]
    pub fn by_geoname_id(&self, geoname_id: u32) -> Option<usize> {
        self.by_geoname_id.get(&geoname_id).copied()
    }
}

/// All indexes over the four collections of a store.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    pub countries: CountryIndex,
    /// Admin1 rows under their country scope and their own admin1 scope
    pub admin1: ScopeIndex,
    /// Admin2 rows under their country, admin1 and own admin2 scopes
    pub admin2: ScopeIndex,
    /// Cities under every scope returned by [`City::scopes`]
    pub cities: ScopeIndex,
}

impl ReferenceIndex {
    #[instrument(name = "Build reference index", skip_all, level = "info")]
    pub fn build(
        countries: &[Country],
        admin1: &[Admin1],
        admin2: &[Admin2],
        cities: &[City],
    ) -> Result<Self> {
        let index = Self {
            countries: CountryIndex::build(countries)?,
            admin1: ScopeIndex::build(admin1, |row| {
                vec![
                    Scope::Country(&row.country_code),
                    Scope::Admin1(&row.country_code, &row.admin1_code),
                ]
            }),
            admin2: ScopeIndex::build(admin2, |row| {
                vec![
                    Scope::Country(&row.country_code),
                    Scope::Admin1(&row.country_code, &row.admin1_code),
                    Scope::Admin2(&row.country_code, &row.admin1_code, &row.admin2_code),
                ]
            }),
            cities: ScopeIndex::build(cities, City::scopes),
        };

        debug!(
            admin1_keys = index.admin1.len(),
            admin2_keys = index.admin2.len(),
            city_keys = index.cities.len(),
            dangling_admin2 = count_dangling_admin2(admin2, &index.admin1),
            "Built reference index"
        );
        Ok(index)
    }
}

/// Distinct admin1 keys that admin2 rows point at but no admin1 row provides.
fn count_dangling_admin2(admin2: &[Admin2], admin1: &ScopeIndex) -> usize {
    admin2
        .iter()
        .map(Admin2::admin1_scope)
        .filter(|scope| admin1.get(scope).is_empty())
        .map(|scope| scope.to_key())
        .collect::<AHashSet<_>>()
        .len()
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum IndexError {
        #[error("Duplicate {entity} geoname id {geoname_id}")]
        DuplicateKey {
            entity: &'static str,
            geoname_id: u32,
        },
    }
    pub type Result<T> = std::result::Result<T, IndexError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries() -> Vec<Country> {
        vec![
            Country::new(6252001, "US", "USA", "United States"),
            Country::new(2921044, "DE", "DEU", "Germany"),
            Country::new(614540, "GE", "GEO", "Georgia"),
            Country::new(2635167, "GB", "GBR", "United Kingdom"),
        ]
    }

    #[test]
    fn test_duplicate_geoname_id_is_rejected() {
        let mut rows = countries();
        rows.push(Country::new(2921044, "DD", "DDR", "German Democratic Republic"));

        let err = CountryIndex::build(&rows).unwrap_err();
        assert!(matches!(
            err,
            IndexError::DuplicateKey {
                entity: "country",
                geoname_id: 2921044
            }
        ));
    }

    #[test]
    fn test_by_code_matches_iso_and_iso3_exactly() {
        let index = CountryIndex::build(&countries()).unwrap();
        assert_eq!(index.by_code("US"), &[0]);
        assert_eq!(index.by_code("USA"), &[0]);
        assert!(index.by_code("us").is_empty());
        assert!(index.by_code("XX").is_empty());
        assert!(index.by_iso("USA").is_empty(), "by_iso ignores iso3");
    }

    #[test]
    fn test_by_name_prefix_is_case_sensitive_range() {
        let index = CountryIndex::build(&countries()).unwrap();
        assert_eq!(index.by_name_prefix("United"), vec![0, 3]);
        assert_eq!(index.by_name_prefix("Ge"), vec![1, 2]);
        assert!(index.by_name_prefix("ge").is_empty());
        assert!(index.by_name_prefix("Zz").is_empty());
        assert_eq!(index.by_name_prefix("").len(), 4);
    }

    #[test]
    fn test_scope_index_files_every_level() {
        let admin2 = vec![
            Admin2::new(5391997, "US", "CA", "075", "City and County of San Francisco"),
            Admin2::new(5368381, "US", "CA", "037", "Los Angeles County"),
            Admin2::new(5128594, "US", "NY", "061", "New York County"),
        ];
        let index = ReferenceIndex::build(&[], &[], &admin2, &[]).unwrap();

        assert_eq!(index.admin2.get(&Scope::Country("US")), &[0, 1, 2]);
        assert_eq!(index.admin2.get(&Scope::Admin1("US", "CA")), &[0, 1]);
        assert_eq!(index.admin2.get(&Scope::Admin2("US", "NY", "061")), &[2]);
        assert!(index.admin2.get(&Scope::Country("DE")).is_empty());
    }

    #[test]
    fn test_scope_index_does_not_mix_levels_with_dotted_codes() {
        let admin1 = vec![
            Admin1::new(5332921, "US", "CA", "California"),
            Admin1::new(9999002, "US", "CA.075", "Dotted"),
        ];
        let cities = vec![City::new(
            5391959,
            "San Francisco",
            "US",
            Some("CA"),
            Some("075"),
        )];
        let index = ReferenceIndex::build(&[], &admin1, &[], &cities).unwrap();

        assert_eq!(index.cities.get(&Scope::Admin2("US", "CA", "075")), &[0]);
        assert!(index.cities.get(&Scope::Admin1("US", "CA.075")).is_empty());
        assert_eq!(index.admin1.get(&Scope::Admin1("US", "CA.075")), &[1]);
    }

    #[test]
    fn test_dangling_admin2_is_counted_not_rejected() {
        let admin1 = vec![Admin1::new(5332921, "US", "CA", "California")];
        let admin2 = vec![
            Admin2::new(5391997, "US", "CA", "075", "City and County of San Francisco"),
            Admin2::new(9999001, "US", "ZZ", "001", "Orphan County"),
        ];
        let index = ReferenceIndex::build(&[], &admin1, &admin2, &[]).unwrap();

        assert_eq!(count_dangling_admin2(&admin2, &index.admin1), 1);
    }
}
