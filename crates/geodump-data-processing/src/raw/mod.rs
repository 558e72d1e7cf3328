use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

pub(crate) mod admin_codes;
pub(crate) mod cities;
pub(crate) mod country_info;

use super::error::{DataError, Result};

pub const COUNTRY_INFO_FILE: &str = "countryInfo.txt";
pub const ADMIN1_CODES_FILE: &str = "admin1CodesASCII.txt";
pub const ADMIN2_CODES_FILE: &str = "admin2Codes.txt";

/// Which GeoNames cities extract feeds the city table.
///
/// The number is the population threshold GeoNames used to cut the extract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSource {
    Cities500,
    Cities1000,
    Cities5000,
    #[default]
    Cities15000,
}

impl DataSource {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cities500 => "cities500",
            Self::Cities1000 => "cities1000",
            Self::Cities5000 => "cities5000",
            Self::Cities15000 => "cities15000",
        }
    }

    #[must_use]
    pub const fn cities_file_name(self) -> &'static str {
        match self {
            Self::Cities500 => "cities500.txt",
            Self::Cities1000 => "cities1000.txt",
            Self::Cities5000 => "cities5000.txt",
            Self::Cities15000 => "cities15000.txt",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataSource {
    type Err = DataError;

    /// Accepts `cities15000`, `cities15000.txt` or `cities15000.zip`, any case.
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let stem = lowered
            .strip_suffix(".txt")
            .or_else(|| lowered.strip_suffix(".zip"))
            .unwrap_or(&lowered);
        match stem {
            "cities500" => Ok(Self::Cities500),
            "cities1000" => Ok(Self::Cities1000),
            "cities5000" => Ok(Self::Cities5000),
            "cities15000" => Ok(Self::Cities15000),
            _ => Err(DataError::UnknownDataSource(s.to_string())),
        }
    }
}

/// Locations of the four raw GeoNames files for one data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDataPaths {
    pub country_info: PathBuf,
    pub admin1_codes: PathBuf,
    pub admin2_codes: PathBuf,
    pub cities: PathBuf,
}

impl RawDataPaths {
    #[must_use]
    pub fn in_dir(dir: &Path, source: DataSource) -> Self {
        Self {
            country_info: dir.join(COUNTRY_INFO_FILE),
            admin1_codes: dir.join(ADMIN1_CODES_FILE),
            admin2_codes: dir.join(ADMIN2_CODES_FILE),
            cities: dir.join(source.cities_file_name()),
        }
    }

    /// Resolve the raw files in `dir`, failing with the names of any that are missing.
    #[instrument(name = "Locate GeoNames raw data", level = "info")]
    pub fn locate(dir: &Path, source: DataSource) -> Result<Self> {
        let paths = Self::in_dir(dir, source);
        let missing: Vec<String> = paths
            .iter()
            .filter(|p| !p.exists())
            .filter_map(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();

        if missing.is_empty() {
            info!(dir = %dir.display(), "Found raw data files");
            Ok(paths)
        } else {
            warn!(dir = %dir.display(), ?missing, "Raw data files not found");
            Err(DataError::RequiredFilesNotFound {
                dir: dir.to_path_buf(),
                missing,
            })
        }
    }

    fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        [
            &self.country_info,
            &self.admin1_codes,
            &self.admin2_codes,
            &self.cities,
        ]
        .into_iter()
    }
}

/// Raw tables as lazy frames, one per GeoNames file.
#[derive(Clone)]
pub struct RawFrames {
    pub countries: LazyFrame,
    pub admin1: LazyFrame,
    pub admin2: LazyFrame,
    pub cities: LazyFrame,
}

#[instrument(name = "Transform GeoNames data", skip_all, level = "info")]
pub fn get_raw_data_as_lazy_frames(paths: &RawDataPaths) -> Result<RawFrames> {
    Ok(RawFrames {
        countries: country_info::get_country_info_df(&paths.country_info)?,
        admin1: admin_codes::get_admin1_codes_df(&paths.admin1_codes)?,
        admin2: admin_codes::get_admin2_codes_df(&paths.admin2_codes)?,
        cities: cities::get_cities_df(&paths.cities)?,
    })
}

/// Tab separated, headerless, unquoted: the layout of every GeoNames dump file.
pub(crate) fn scan_tsv(path: &Path, schema: Schema) -> LazyCsvReader {
    LazyCsvReader::new(path)
        .with_separator(b'\t')
        .with_has_header(false)
        .with_quote_char(None)
        .with_schema(Some(schema.into()))
}
