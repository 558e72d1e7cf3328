//! Processing pipeline for the GeoNames reference tables used by `geodump`.
//!
//! Raw dump files (`countryInfo.txt`, `admin1CodesASCII.txt`, `admin2Codes.txt`
//! and one of the `citiesNNN.txt` extracts) are read with polars, reshaped into
//! four processed frames and cached as parquet next to a small metadata file.
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use tracing::debug;

mod error;
pub mod processed;
pub mod raw;
pub mod test_data;

pub use error::{DataError, Result};
pub use processed::{DatasetMetadata, ReferenceData};
pub use raw::{DataSource, RawDataPaths};
pub use test_data::{create_test_data, create_test_data_dir};

pub const DATA_DIR_DEFAULT: &str = "./geodump_data";

/// Global data directory.
///
/// Resolution order: the `DATA_DIR` environment variable, the platform data
/// directory (with the `system-dirs` feature), then [`DATA_DIR_DEFAULT`].
pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    let dir = std::env::var("DATA_DIR")
        .map(PathBuf::from)
        .ok()
        .or_else(platform_data_dir)
        .unwrap_or_else(|| PathBuf::from(DATA_DIR_DEFAULT));
    debug!(data_dir = ?dir, "Resolved data directory");
    dir
});

pub fn get_data_dir() -> &'static Path {
    DATA_DIR.as_path()
}

#[cfg(feature = "system-dirs")]
fn platform_data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "geodump").map(|dirs| dirs.data_dir().to_path_buf())
}

#[cfg(not(feature = "system-dirs"))]
fn platform_data_dir() -> Option<PathBuf> {
    None
}

#[cfg(test)]
pub(crate) mod tests_utils {
    use polars::prelude::*;

    /// Every `(column, dtype)` pair must be in the frame with exactly that type.
    pub fn assert_schema(df: &DataFrame, expected: &[(&str, DataType)]) {
        let schema = df.schema();
        for (column, dtype) in expected {
            assert_eq!(
                schema.get(column),
                Some(dtype),
                "Column {column} in {:?}",
                schema.iter_names().collect::<Vec<_>>()
            );
        }
    }

    pub fn null_count(df: &DataFrame, column: &str) -> usize {
        df.column(column).unwrap().null_count()
    }

    pub fn str_values(df: &DataFrame, column: &str) -> Vec<Option<String>> {
        df.column(column)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(ToString::to_string))
            .collect()
    }
}
