//! Row types for the four reference tables.
//!
//! Countries, first and second level divisions and cities are distinct
//! structs. What they have in common is expressed through [`GeoFeature`];
//! the two administrative levels additionally implement [`Division`].

use std::fmt;

use polars::prelude::{DataFrame, PolarsResult};

mod city;
mod country;
mod division;

pub use city::City;
pub use country::Country;
pub use division::{Admin1, Admin2};

/// Behaviour shared by every reference row.
pub trait GeoFeature: Sized {
    /// Build rows from a processed `DataFrame`.
    ///
    /// The frame must contain the columns listed by [`GeoFeature::field_names`].
    /// Rows with a null key column are skipped.
    fn from_df(df: &DataFrame) -> PolarsResult<Vec<Self>>;

    /// Columns read by [`GeoFeature::from_df`], in order.
    fn field_names() -> Vec<&'static str>;

    fn geoname_id(&self) -> u32;

    fn name(&self) -> &str;

    /// ISO 3166 alpha-2 code of the owning country (for a country, its own code).
    fn country_code(&self) -> &str;
}

/// Administrative level of a [`Division`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AdminLevel {
    Admin1,
    Admin2,
}

impl fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin1 => f.write_str("ADM1"),
            Self::Admin2 => f.write_str("ADM2"),
        }
    }
}

/// An administrative subdivision identified by codes within its country.
pub trait Division: GeoFeature {
    const LEVEL: AdminLevel;

    /// The division's own code at its level (`CA` for California, `075` for San Francisco County).
    fn code(&self) -> &str;

    /// Code of the first-level division this row belongs to (itself for [`Admin1`]).
    fn admin1_code(&self) -> &str;
}

/// A position in the country → admin1 → admin2 hierarchy, addressed by codes.
///
/// Displays in the GeoNames dotted notation (`US`, `US.CA`, `US.CA.075`).
/// Indexes key on [`ScopeKey`] instead, since a code may itself contain a dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope<'a> {
    Country(&'a str),
    Admin1(&'a str, &'a str),
    Admin2(&'a str, &'a str, &'a str),
}

impl Scope<'_> {
    /// Owned form of this scope, for use as a map key.
    #[must_use]
    pub fn to_key(&self) -> ScopeKey {
        match *self {
            Self::Country(country_code) => ScopeKey::Country(country_code.to_owned()),
            Self::Admin1(country_code, admin1) => {
                ScopeKey::Admin1(country_code.to_owned(), admin1.to_owned())
            }
            Self::Admin2(country_code, admin1, admin2) => ScopeKey::Admin2(
                country_code.to_owned(),
                admin1.to_owned(),
                admin2.to_owned(),
            ),
        }
    }

    #[must_use]
    pub fn country_code(&self) -> &str {
        match self {
            Self::Country(country_code)
            | Self::Admin1(country_code, _)
            | Self::Admin2(country_code, _, _) => *country_code,
        }
    }
}

impl fmt::Display for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Country(country_code) => write!(f, "{country_code}"),
            Self::Admin1(country_code, admin1) => write!(f, "{country_code}.{admin1}"),
            Self::Admin2(country_code, admin1, admin2) => {
                write!(f, "{country_code}.{admin1}.{admin2}")
            }
        }
    }
}

/// Owned [`Scope`]. Each level is a separate variant, so `US` / `CA.075` and
/// `US` / `CA` / `075` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    Country(String),
    Admin1(String, String),
    Admin2(String, String, String),
}

/// Anything whose cities can be listed: a country, an admin1 or an admin2.
pub trait CityScope {
    fn city_scope(&self) -> Scope<'_>;
}

/// Anything whose second-level divisions can be listed: a country or an admin1.
pub trait Admin2Scope {
    fn admin2_scope(&self) -> Scope<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_display_uses_dotted_codes() {
        assert_eq!(Scope::Country("US").to_string(), "US");
        assert_eq!(Scope::Admin1("US", "CA").to_string(), "US.CA");
        assert_eq!(Scope::Admin2("US", "CA", "075").to_string(), "US.CA.075");
    }

    #[test]
    fn test_scope_keys_keep_levels_apart() {
        let dotted_admin1 = Scope::Admin1("US", "CA.075");
        let admin2 = Scope::Admin2("US", "CA", "075");

        assert_eq!(dotted_admin1.to_string(), admin2.to_string());
        assert_ne!(dotted_admin1.to_key(), admin2.to_key());
        assert_eq!(
            admin2.to_key(),
            ScopeKey::Admin2("US".into(), "CA".into(), "075".into())
        );
    }

    #[test]
    fn test_scope_country_code() {
        assert_eq!(Scope::Admin2("FR", "11", "75").country_code(), "FR");
        assert_eq!(Scope::Country("DE").country_code(), "DE");
    }

    #[test]
    fn test_admin_level_display() {
        assert_eq!(AdminLevel::Admin1.to_string(), "ADM1");
        assert_eq!(AdminLevel::Admin2.to_string(), "ADM2");
        assert!(AdminLevel::Admin1 < AdminLevel::Admin2);
    }
}
