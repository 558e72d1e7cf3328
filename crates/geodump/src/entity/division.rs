use std::fmt;

use itertools::izip;
use polars::prelude::*;

use super::{AdminLevel, Admin2Scope, CityScope, Division, GeoFeature, Scope};

/// First-level administrative division (state, province, region).
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Admin1 {
    pub geoname_id: u32,
    /// References [`Country::iso`](super::Country::iso)
    pub country_code: String,
    pub admin1_code: String,
    pub name: String,
    pub ascii_name: Option<String>,
}

/// Second-level administrative division (county, district, department).
///
/// Its `(country_code, admin1_code)` pair is expected, but not required, to
/// name an existing [`Admin1`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Admin2 {
    pub geoname_id: u32,
    pub country_code: String,
    pub admin1_code: String,
    pub admin2_code: String,
    pub name: String,
    pub ascii_name: Option<String>,
}

impl Admin1 {
    pub fn new(
        geoname_id: u32,
        country_code: impl Into<String>,
        admin1_code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            geoname_id,
            country_code: country_code.into(),
            admin1_code: admin1_code.into(),
            name: name.into(),
            ascii_name: None,
        }
    }
}

impl Admin2 {
    pub fn new(
        geoname_id: u32,
        country_code: impl Into<String>,
        admin1_code: impl Into<String>,
        admin2_code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            geoname_id,
            country_code: country_code.into(),
            admin1_code: admin1_code.into(),
            admin2_code: admin2_code.into(),
            name: name.into(),
            ascii_name: None,
        }
    }

    /// Scope of the first-level division this row points at.
    #[must_use]
    pub fn admin1_scope(&self) -> Scope<'_> {
        Scope::Admin1(&self.country_code, &self.admin1_code)
    }
}

impl GeoFeature for Admin1 {
    fn from_df(df: &DataFrame) -> PolarsResult<Vec<Self>> {
        let cols = df.select(Self::field_names())?.take_columns();

        Ok(izip!(
            cols[0].u32()?,
            cols[1].str()?,
            cols[2].str()?,
            cols[3].str()?,
            cols[4].str()?,
        )
        .filter_map(|(geoname_id, country_code, admin1_code, name, ascii_name)| {
            Some(Self {
                geoname_id: geoname_id?,
                country_code: country_code?.to_string(),
                admin1_code: admin1_code?.to_string(),
                name: name?.to_string(),
                ascii_name: ascii_name.map(ToString::to_string),
            })
        })
        .collect())
    }

    fn field_names() -> Vec<&'static str> {
        vec![
            "geonameId",
            "country_code",
            "admin1_code",
            "name",
            "asciiname",
        ]
    }

    fn geoname_id(&self) -> u32 {
        self.geoname_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn country_code(&self) -> &str {
        &self.country_code
    }
}

impl GeoFeature for Admin2 {
    fn from_df(df: &DataFrame) -> PolarsResult<Vec<Self>> {
        let cols = df.select(Self::field_names())?.take_columns();

        Ok(izip!(
            cols[0].u32()?,
            cols[1].str()?,
            cols[2].str()?,
            cols[3].str()?,
            cols[4].str()?,
            cols[5].str()?,
        )
        .filter_map(
            |(geoname_id, country_code, admin1_code, admin2_code, name, ascii_name)| {
                Some(Self {
                    geoname_id: geoname_id?,
                    country_code: country_code?.to_string(),
                    admin1_code: admin1_code?.to_string(),
                    admin2_code: admin2_code?.to_string(),
                    name: name?.to_string(),
                    ascii_name: ascii_name.map(ToString::to_string),
                })
            },
        )
        .collect())
    }

    fn field_names() -> Vec<&'static str> {
        vec![
            "geonameId",
            "country_code",
            "admin1_code",
            "admin2_code",
            "name",
            "asciiname",
        ]
    }

    fn geoname_id(&self) -> u32 {
        self.geoname_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn country_code(&self) -> &str {
        &self.country_code
    }
}

impl Division for Admin1 {
    const LEVEL: AdminLevel = AdminLevel::Admin1;

    fn code(&self) -> &str {
        &self.admin1_code
    }

    fn admin1_code(&self) -> &str {
        &self.admin1_code
    }
}

impl Division for Admin2 {
    const LEVEL: AdminLevel = AdminLevel::Admin2;

    fn code(&self) -> &str {
        &self.admin2_code
    }

    fn admin1_code(&self) -> &str {
        &self.admin1_code
    }
}

impl CityScope for Admin1 {
    fn city_scope(&self) -> Scope<'_> {
        Scope::Admin1(&self.country_code, &self.admin1_code)
    }
}

impl Admin2Scope for Admin1 {
    fn admin2_scope(&self) -> Scope<'_> {
        Scope::Admin1(&self.country_code, &self.admin1_code)
    }
}

impl CityScope for Admin2 {
    fn city_scope(&self) -> Scope<'_> {
        Scope::Admin2(&self.country_code, &self.admin1_code, &self.admin2_code)
    }
}

impl fmt::Display for Admin1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Admin1 {{ code: {}.{}, name: \"{}\" }}",
            self.country_code, self.admin1_code, self.name
        )
    }
}

impl fmt::Display for Admin2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Admin2 {{ code: {}.{}.{}, name: \"{}\" }}",
            self.country_code, self.admin1_code, self.admin2_code, self.name
        )
    }
}
