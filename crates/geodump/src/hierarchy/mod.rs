use std::fmt;

use crate::entity::{Admin1, Admin2, City, Country, GeoFeature};

/// The administrative chain above a city, resolved through its codes.
///
/// Levels that the city's codes do not reach, or that the loaded data does
/// not contain, are `None`. A city always carries a country code, so
/// `country` is only empty when that country is missing from the store.
///
/// # Examples
///
/// ```rust
/// use geodump::{City, Country, ReferenceStore};
///
/// let store = ReferenceStore::from_entities(
///     vec![Country::new(2921044, "DE", "DEU", "Germany")],
///     vec![],
///     vec![],
///     vec![City::new(2950159, "Berlin", "DE", Some("16"), None)],
/// )?;
///
/// let berlin = &store.cities()[0];
/// let context = store.resolve_hierarchy(berlin);
/// assert_eq!(context.country.map(|c| c.name.as_str()), Some("Germany"));
/// assert!(context.admin1.is_none());
/// # Ok::<(), geodump::error::GeodumpError>(())
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationContext<'a> {
    pub country: Option<&'a Country>,
    pub admin1: Option<&'a Admin1>,
    pub admin2: Option<&'a Admin2>,
    pub city: &'a City,
}

impl<'a> LocationContext<'a> {
    /// Names from the widest resolved level down to the city.
    #[must_use]
    pub fn names(&self) -> Vec<&'a str> {
        let mut names = Vec::with_capacity(4);
        if let Some(country) = self.country {
            names.push(country.name());
        }
        if let Some(admin1) = self.admin1 {
            names.push(admin1.name());
        }
        if let Some(admin2) = self.admin2 {
            names.push(admin2.name());
        }
        names.push(self.city.name());
        names
    }

    /// True when every level the city's codes point at was found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.country.is_some()
            && (self.city.admin1_code.is_none() || self.admin1.is_some())
            && (self.city.admin1_code.is_none()
                || self.city.admin2_code.is_none()
                || self.admin2.is_some())
    }
}

impl fmt::Display for LocationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(country) = self.country {
            parts.push(format!("Country: {country}"));
        }
        if let Some(admin1) = self.admin1 {
            parts.push(format!("Admin1: {admin1}"));
        }
        if let Some(admin2) = self.admin2 {
            parts.push(format!("Admin2: {admin2}"));
        }
        parts.push(format!("City: {}", self.city));

        write!(f, "LocationContext {{\n  {}\n}}", parts.join(",\n  "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_skip_missing_levels() {
        let germany = Country::new(2921044, "DE", "DEU", "Germany");
        let berlin_state = Admin1::new(2950157, "DE", "16", "Berlin");
        let berlin = City::new(2950159, "Berlin", "DE", Some("16"), None);

        let context = LocationContext {
            country: Some(&germany),
            admin1: Some(&berlin_state),
            admin2: None,
            city: &berlin,
        };

        assert_eq!(context.names(), vec!["Germany", "Berlin", "Berlin"]);
        assert!(context.is_complete(), "Berlin has no admin2 code to resolve");
    }

    #[test]
    fn test_incomplete_when_code_does_not_resolve() {
        let san_francisco = City::new(5391959, "San Francisco", "US", Some("CA"), Some("075"));
        let context = LocationContext {
            country: None,
            admin1: None,
            admin2: None,
            city: &san_francisco,
        };

        assert!(!context.is_complete());
        assert_eq!(context.names(), vec!["San Francisco"]);
        assert!(context.to_string().contains("City: City { geoname_id: 5391959"));
    }
}
