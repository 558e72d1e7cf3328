use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::TempDir;
use tracing::info;

use super::error::Result;
use super::raw::{ADMIN1_CODES_FILE, ADMIN2_CODES_FILE, COUNTRY_INFO_FILE, DataSource};

// (iso, iso3, iso_numeric, fips, name, capital, area, population, continent, geonameid)
const COUNTRIES: [(&str, &str, u16, &str, &str, &str, f64, i64, &str, u32); 5] = [
    ("US", "USA", 840, "US", "United States", "Washington", 9629091.0, 327167434, "NA", 6252001),
    ("DE", "DEU", 276, "GM", "Germany", "Berlin", 357021.0, 82927922, "EU", 2921044),
    ("FR", "FRA", 250, "FR", "France", "Paris", 547030.0, 66987244, "EU", 3017382),
    ("GE", "GEO", 268, "GG", "Georgia", "Tbilisi", 69700.0, 3731000, "AS", 614540),
    ("AQ", "ATA", 10, "AY", "Antarctica", "", 14000000.0, 0, "AN", 6697173),
];

// (dotted code, name, asciiname, geonameid)
const ADMIN1: [(&str, &str, &str, u32); 6] = [
    ("US.CA", "California", "California", 5332921),
    ("US.NY", "New York", "New York", 5128638),
    ("DE.02", "Bavaria", "Bavaria", 2951839),
    ("DE.16", "Berlin", "Berlin", 2950157),
    ("FR.11", "Île-de-France", "Ile-de-France", 3012874),
    ("GE.TB", "Tbilisi", "Tbilisi", 611716),
];

const ADMIN2: [(&str, &str, &str, u32); 6] = [
    ("US.CA.075", "City and County of San Francisco", "City and County of San Francisco", 5391997),
    ("US.CA.037", "Los Angeles County", "Los Angeles County", 5368381),
    ("US.NY.061", "New York County", "New York County", 5128594),
    ("DE.02.091", "Upper Bavaria", "Upper Bavaria", 2861322),
    ("FR.11.75", "Paris", "Paris", 2968815),
    // Dangling: no admin1 row exists for US.ZZ
    ("US.ZZ.001", "Orphan County", "Orphan County", 9999001),
];

// (geonameid, name, asciiname, lat, lon, feature_code, cc, admin1, admin2, population, timezone)
const CITIES: [(u32, &str, &str, f32, f32, &str, &str, &str, &str, i64, &str); 7] = [
    (5391959, "San Francisco", "San Francisco", 37.77493, -122.41942, "PPLA2", "US", "CA", "075", 864816, "America/Los_Angeles"),
    (5368361, "Los Angeles", "Los Angeles", 34.05223, -118.24368, "PPLA2", "US", "CA", "037", 3971883, "America/Los_Angeles"),
    (5128581, "New York City", "New York City", 40.71427, -74.00597, "PPL", "US", "NY", "061", 8804190, "America/New_York"),
    (2867714, "Munich", "Munich", 48.13743, 11.57549, "PPLA", "DE", "02", "091", 1260391, "Europe/Berlin"),
    (2950159, "Berlin", "Berlin", 52.52437, 13.41053, "PPLC", "DE", "16", "", 3426354, "Europe/Berlin"),
    (2988507, "Paris", "Paris", 48.85341, 2.3488, "PPLC", "FR", "11", "75", 2138551, "Europe/Paris"),
    (611717, "Tbilisi", "Tbilisi", 41.69411, 44.83368, "PPLC", "GE", "TB", "", 1049498, "Asia/Tbilisi"),
];

/// Write a small but realistic GeoNames fixture set into a fresh temporary directory.
///
/// The directory holds `countryInfo.txt`, `admin1CodesASCII.txt`,
/// `admin2Codes.txt` and the cities file named by `source`, laid out exactly
/// like the GeoNames dump. It covers five countries (one of them with no
/// cities), a city without an admin2 code and an admin2 row whose admin1
/// parent is missing.
pub fn create_test_data(source: DataSource) -> Result<TempDir> {
    let dir = tempfile::tempdir()?;
    write_test_data(dir.path(), source)?;
    Ok(dir)
}

/// Like [`create_test_data`], but shaped as a data directory: the fixtures
/// land in `raw/` and `processed/` is left for the cache.
pub fn create_test_data_dir(source: DataSource) -> Result<TempDir> {
    let dir = tempfile::tempdir()?;
    write_test_data(&dir.path().join("raw"), source)?;
    Ok(dir)
}

/// Write the fixture files into `dir`, creating it if needed.
pub fn write_test_data(dir: &Path, source: DataSource) -> Result<()> {
    info!(?dir, %source, "Creating test data");
    std::fs::create_dir_all(dir)?;

    write_country_info(&dir.join(COUNTRY_INFO_FILE))?;
    write_admin_codes(&dir.join(ADMIN1_CODES_FILE), &ADMIN1)?;
    write_admin_codes(&dir.join(ADMIN2_CODES_FILE), &ADMIN2)?;
    write_cities(&dir.join(source.cities_file_name()))?;
    Ok(())
}

fn write_country_info(path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    for i in 1..=50 {
        writeln!(file, "# GeoNames country info, comment line {i}")?;
    }
    writeln!(
        file,
        "#ISO\tISO3\tISO-Numeric\tfips\tCountry\tCapital\tArea(in sq km)\tPopulation\tContinent\ttld\tCurrencyCode\tCurrencyName\tPhone\tPostal Code Format\tPostal Code Regex\tLanguages\tgeonameid\tneighbours\tEquivalentFipsCode"
    )?;

    for (iso, iso3, numeric, fips, name, capital, area, population, continent, geoname_id) in
        COUNTRIES
    {
        writeln!(
            file,
            "{iso}\t{iso3}\t{numeric}\t{fips}\t{name}\t{capital}\t{area:.1}\t{population}\t{continent}\t.{tld}\t\t\t\t\t\t\t{geoname_id}\t\t",
            tld = iso.to_ascii_lowercase(),
        )?;
    }

    file.flush()?;
    Ok(())
}

fn write_admin_codes(path: &Path, rows: &[(&str, &str, &str, u32)]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for (code, name, asciiname, geoname_id) in rows {
        writeln!(file, "{code}\t{name}\t{asciiname}\t{geoname_id}")?;
    }
    file.flush()?;
    Ok(())
}

fn write_cities(path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for (
        geoname_id,
        name,
        asciiname,
        latitude,
        longitude,
        feature_code,
        country_code,
        admin1,
        admin2,
        population,
        timezone,
    ) in CITIES
    {
        writeln!(
            file,
            "{geoname_id}\t{name}\t{asciiname}\t\t{latitude}\t{longitude}\tP\t{feature_code}\t{country_code}\t\t{admin1}\t{admin2}\t\t\t{population}\t\t0\t{timezone}\t2024-01-01"
        )?;
    }
    file.flush()?;
    Ok(())
}
