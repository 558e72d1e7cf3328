use std::fmt;

use itertools::izip;
use polars::prelude::*;

use super::{GeoFeature, Scope};

/// A populated place from one of the GeoNames `citiesNNN` extracts.
///
/// Every city carries a country code; the admin1 and admin2 codes are present
/// only as far down as GeoNames assigns them.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct City {
    /// `GeoNames` unique identifier
    pub geoname_id: u32,
    /// Primary name of the city
    pub name: String,
    pub ascii_name: Option<String>,
    /// ISO country code
    pub country_code: String,
    pub admin1_code: Option<String>,
    pub admin2_code: Option<String>,
    /// Latitude in decimal degrees
    pub latitude: Option<f32>,
    /// Longitude in decimal degrees
    pub longitude: Option<f32>,
    pub population: Option<i64>,
    /// IANA time zone identifier
    pub timezone: Option<String>,
    /// `GeoNames` feature code (e.g., "PPLC" for a capital)
    pub feature_code: Option<String>,
}

impl City {
    pub fn new(
        geoname_id: u32,
        name: impl Into<String>,
        country_code: impl Into<String>,
        admin1_code: Option<&str>,
        admin2_code: Option<&str>,
    ) -> Self {
        Self {
            geoname_id,
            name: name.into(),
            country_code: country_code.into(),
            admin1_code: admin1_code.map(ToString::to_string),
            admin2_code: admin2_code.map(ToString::to_string),
            ..Self::default()
        }
    }

    /// Returns coordinates as a tuple (latitude, longitude) if both are available.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f32, f32)> {
        self.latitude.zip(self.longitude)
    }

    /// Every scope this city falls under, widest first.
    ///
    /// The admin2 scope is only produced when the admin1 code is known as well.
    #[must_use]
    pub fn scopes(&self) -> Vec<Scope<'_>> {
        let mut scopes = vec![Scope::Country(&self.country_code)];
        if let Some(admin1) = self.admin1_code.as_deref() {
            scopes.push(Scope::Admin1(&self.country_code, admin1));
            if let Some(admin2) = self.admin2_code.as_deref() {
                scopes.push(Scope::Admin2(&self.country_code, admin1, admin2));
            }
        }
        scopes
    }
}

impl GeoFeature for City {
    fn from_df(df: &DataFrame) -> PolarsResult<Vec<Self>> {
        let cols = df.select(Self::field_names())?.take_columns();

        // izip! gets unwieldy past eight columns, so the tail is zipped on separately
        Ok(izip!(
            cols[0].u32()?,
            cols[1].str()?,
            cols[2].str()?,
            cols[3].str()?,
            cols[4].str()?,
            cols[5].str()?,
            cols[6].f32()?,
            cols[7].f32()?,
        )
        .zip(izip!(cols[8].i64()?, cols[9].str()?, cols[10].str()?))
        .filter_map(
            |(
                (
                    geoname_id,
                    name,
                    ascii_name,
                    country_code,
                    admin1_code,
                    admin2_code,
                    latitude,
                    longitude,
                ),
                (population, timezone, feature_code),
            )| {
                Some(Self {
                    geoname_id: geoname_id?,
                    name: name?.to_string(),
                    ascii_name: ascii_name.map(ToString::to_string),
                    country_code: country_code?.to_string(),
                    admin1_code: admin1_code.map(ToString::to_string),
                    admin2_code: admin2_code.map(ToString::to_string),
                    latitude,
                    longitude,
                    population,
                    timezone: timezone.map(ToString::to_string),
                    feature_code: feature_code.map(ToString::to_string),
                })
            },
        )
        .collect())
    }

    fn field_names() -> Vec<&'static str> {
        vec![
            "geonameId",
            "name",
            "asciiname",
            "country_code",
            "admin1_code",
            "admin2_code",
            "latitude",
            "longitude",
            "population",
            "timezone",
            "feature_code",
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

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "City {{ geoname_id: {}, name: \"{}\", country: {} }}",
            self.geoname_id, self.name, self.country_code
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes_stop_at_most_specific_code() {
        let full = City::new(5391959, "San Francisco", "US", Some("CA"), Some("075"));
        assert_eq!(
            full.scopes(),
            vec![
                Scope::Country("US"),
                Scope::Admin1("US", "CA"),
                Scope::Admin2("US", "CA", "075"),
            ]
        );

        let no_admin2 = City::new(2950159, "Berlin", "DE", Some("16"), None);
        assert_eq!(
            no_admin2.scopes(),
            vec![Scope::Country("DE"), Scope::Admin1("DE", "16")]
        );

        // An admin2 code without an admin1 code cannot be placed in the hierarchy
        let orphan = City::new(1, "Somewhere", "XX", None, Some("001"));
        assert_eq!(orphan.scopes(), vec![Scope::Country("XX")]);
    }

    #[test]
    fn test_coordinates() {
        let mut city = City::new(2988507, "Paris", "FR", Some("11"), Some("75"));
        assert_eq!(city.coordinates(), None);

        city.latitude = Some(48.85341);
        city.longitude = Some(2.3488);
        assert_eq!(city.coordinates(), Some((48.85341, 2.3488)));
    }

    #[test]
    fn test_from_df() {
        let df = df![
            "geonameId" => [2950159u32],
            "name" => ["Berlin"],
            "asciiname" => ["Berlin"],
            "country_code" => ["DE"],
            "admin1_code" => [Some("16")],
            "admin2_code" => [None::<&str>],
            "latitude" => [52.52437f32],
            "longitude" => [13.41053f32],
            "population" => [3426354i64],
            "timezone" => ["Europe/Berlin"],
            "feature_code" => ["PPLC"],
        ]
        .unwrap();

        let cities = City::from_df(&df).unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].admin1_code.as_deref(), Some("16"));
        assert_eq!(cities[0].admin2_code, None);
        assert_eq!(cities[0].population, Some(3426354));
    }
}
