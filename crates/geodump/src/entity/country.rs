use std::fmt;

use itertools::izip;
use polars::prelude::*;

use super::{Admin2Scope, CityScope, GeoFeature, Scope};

/// A row of the GeoNames country table.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Country {
    /// `GeoNames` unique identifier; unique across countries
    pub geoname_id: u32,
    /// ISO 3166 alpha-2 code
    pub iso: String,
    /// ISO 3166 alpha-3 code
    pub iso3: String,
    /// Display name
    pub name: String,
    pub capital: Option<String>,
    /// Two-letter continent code (`EU`, `NA`, ...)
    pub continent: Option<String>,
    pub population: Option<i64>,
}

impl Country {
    /// Convenience constructor with only the identifying fields set.
    pub fn new(
        geoname_id: u32,
        iso: impl Into<String>,
        iso3: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            geoname_id,
            iso: iso.into(),
            iso3: iso3.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

impl GeoFeature for Country {
    fn from_df(df: &DataFrame) -> PolarsResult<Vec<Self>> {
        let cols = df.select(Self::field_names())?.take_columns();

        Ok(izip!(
            cols[0].u32()?,
            cols[1].str()?,
            cols[2].str()?,
            cols[3].str()?,
            cols[4].str()?,
            cols[5].str()?,
            cols[6].i64()?,
        )
        .filter_map(
            |(geoname_id, iso, iso3, name, capital, continent, population)| {
                Some(Self {
                    geoname_id: geoname_id?,
                    iso: iso?.to_string(),
                    iso3: iso3?.to_string(),
                    name: name?.to_string(),
                    capital: capital.map(ToString::to_string),
                    continent: continent.map(ToString::to_string),
                    population,
                })
            },
        )
        .collect())
    }

    fn field_names() -> Vec<&'static str> {
        vec![
            "geonameId",
            "iso",
            "iso3",
            "name",
            "capital",
            "continent",
            "population",
        ]
    }

    fn geoname_id(&self) -> u32 {
        self.geoname_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn country_code(&self) -> &str {
        &self.iso
    }
}

impl CityScope for Country {
    fn city_scope(&self) -> Scope<'_> {
        Scope::Country(&self.iso)
    }
}

impl Admin2Scope for Country {
    fn admin2_scope(&self) -> Scope<'_> {
        Scope::Country(&self.iso)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Country {{ geoname_id: {}, iso: {}, iso3: {}, name: \"{}\" }}",
            self.geoname_id, self.iso, self.iso3, self.name
        )
    }
}
