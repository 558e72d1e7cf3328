use super::error::{DataError, Result};
use super::raw::{self, DataSource, RawDataPaths};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, info_span, instrument};

pub mod create_reference_tables;

const COUNTRIES_PARQUET: &str = "countries.parquet";
const ADMIN1_PARQUET: &str = "admin1.parquet";
const ADMIN2_PARQUET: &str = "admin2.parquet";
const CITIES_PARQUET: &str = "cities.parquet";
const METADATA_JSON: &str = "metadata.json";

const TABLE_FILES: [&str; 4] = [
    COUNTRIES_PARQUET,
    ADMIN1_PARQUET,
    ADMIN2_PARQUET,
    CITIES_PARQUET,
];

/// Describes a processed cache: where it came from and how many rows each table holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub source: DataSource,
    pub generated_at: DateTime<Utc>,
    pub countries: usize,
    pub admin1: usize,
    pub admin2: usize,
    pub cities: usize,
}

/// The four processed reference tables, backed by a parquet cache.
///
/// Each table is read from disk and collected into memory the first time it
/// is requested.
#[derive(Clone)]
pub struct ReferenceData {
    source: DataSource,
    processed_dir: PathBuf,
    countries_df: OnceCell<LazyFrame>,
    admin1_df: OnceCell<LazyFrame>,
    admin2_df: OnceCell<LazyFrame>,
    cities_df: OnceCell<LazyFrame>,
}

impl ReferenceData {
    /// Load from `<DATA_DIR>/raw` into `<DATA_DIR>/processed`, reusing a current cache.
    pub fn new(source: DataSource) -> Result<Self> {
        let data_dir = crate::get_data_dir();
        Self::load(
            &data_dir.join("raw"),
            &data_dir.join("processed"),
            source,
            false,
        )
    }

    /// Build (or reuse) the processed cache in `processed_dir` from the raw files in `raw_dir`.
    ///
    /// The cache is reused when every table and the metadata file exist and the
    /// metadata names the same `source`, unless `rebuild` is set.
    #[instrument(name = "Load reference data", level = "info")]
    pub fn load(
        raw_dir: &Path,
        processed_dir: &Path,
        source: DataSource,
        rebuild: bool,
    ) -> Result<Self> {
        std::fs::create_dir_all(processed_dir)?;

        if !rebuild && Self::cache_is_current(processed_dir, source) {
            info!("ReferenceData: Loading existing Parquet files");
            return Ok(Self::from_processed_dir(processed_dir, source));
        }

        info!("ReferenceData: Generating processed data from raw sources");
        let raw_paths = RawDataPaths::locate(raw_dir, source)?;
        Self::write_processed(&raw_paths, processed_dir, source)?;

        Ok(Self::from_processed_dir(processed_dir, source))
    }

    fn from_processed_dir(processed_dir: &Path, source: DataSource) -> Self {
        Self {
            source,
            processed_dir: processed_dir.to_path_buf(),
            countries_df: OnceCell::new(),
            admin1_df: OnceCell::new(),
            admin2_df: OnceCell::new(),
            cities_df: OnceCell::new(),
        }
    }

    fn cache_is_current(processed_dir: &Path, source: DataSource) -> bool {
        let tables_exist = TABLE_FILES
            .iter()
            .all(|file| processed_dir.join(file).exists());
        tables_exist
            && read_metadata(processed_dir).is_ok_and(|metadata| metadata.source == source)
    }

    fn write_processed(
        raw_paths: &RawDataPaths,
        processed_dir: &Path,
        source: DataSource,
    ) -> Result<DatasetMetadata> {
        let dfs = {
            let _span = info_span!("Transform Raw Data").entered();
            let raw_frames = raw::get_raw_data_as_lazy_frames(raw_paths)?;

            info!("Collecting transformed data");
            let transform_time = std::time::Instant::now();
            // One at a time: collect_all over the four scans stalls on pools of four threads or fewer
            let dfs = [
                create_reference_tables::get_countries_lf(raw_frames.countries),
                create_reference_tables::get_admin1_lf(raw_frames.admin1),
                create_reference_tables::get_admin2_lf(raw_frames.admin2),
                create_reference_tables::get_cities_lf(raw_frames.cities),
            ]
            .into_iter()
            .map(LazyFrame::collect)
            .collect::<PolarsResult<Vec<_>>>()?;
            info!(
                transform_time = ?transform_time.elapsed(),
                "Transforming data took"
            );
            dfs
        };

        let mut heights = Vec::with_capacity(TABLE_FILES.len());
        for (mut df, file) in dfs.into_iter().zip(TABLE_FILES) {
            heights.push(df.height());
            save_df_to_parquet(&mut df, &processed_dir.join(file))?;
        }

        let metadata = DatasetMetadata {
            source,
            generated_at: Utc::now(),
            countries: heights.first().copied().unwrap_or_default(),
            admin1: heights.get(1).copied().unwrap_or_default(),
            admin2: heights.get(2).copied().unwrap_or_default(),
            cities: heights.get(3).copied().unwrap_or_default(),
        };
        let file = std::fs::File::create(processed_dir.join(METADATA_JSON))?;
        serde_json::to_writer_pretty(file, &metadata)?;
        info!(?metadata, "Saved processed reference data");

        Ok(metadata)
    }

    fn get_data(path: &Path) -> Result<LazyFrame> {
        info!(
            path = ?path.file_stem(),
            "Loading and collecting into memory for the first time..."
        );
        let t_load = std::time::Instant::now();
        let df = LazyFrame::scan_parquet(path, Default::default())?
            .collect()
            .map(|df| df.lazy())
            .map_err(From::from);
        info!(
            time_collected = ?t_load.elapsed(),
            "Collected into memory"
        );
        df
    }

    #[must_use]
    pub const fn source(&self) -> DataSource {
        self.source
    }

    pub fn metadata(&self) -> Result<DatasetMetadata> {
        read_metadata(&self.processed_dir)
    }

    pub fn countries_df(&self) -> Result<&LazyFrame> {
        self.countries_df
            .get_or_try_init(|| Self::get_data(&self.processed_dir.join(COUNTRIES_PARQUET)))
    }

    pub fn admin1_df(&self) -> Result<&LazyFrame> {
        self.admin1_df
            .get_or_try_init(|| Self::get_data(&self.processed_dir.join(ADMIN1_PARQUET)))
    }

    pub fn admin2_df(&self) -> Result<&LazyFrame> {
        self.admin2_df
            .get_or_try_init(|| Self::get_data(&self.processed_dir.join(ADMIN2_PARQUET)))
    }

    pub fn cities_df(&self) -> Result<&LazyFrame> {
        self.cities_df
            .get_or_try_init(|| Self::get_data(&self.processed_dir.join(CITIES_PARQUET)))
    }
}

fn save_df_to_parquet(df: &mut DataFrame, path: &Path) -> Result<()> {
    let sink_time = std::time::Instant::now();
    let mut file = std::fs::File::create(path)?;
    ParquetWriter::new(&mut file).finish(df)?;
    info!(
        path = ?path.file_stem(),
        sink_time = ?sink_time.elapsed(),
        "Saved to parquet file"
    );
    Ok(())
}

fn read_metadata(processed_dir: &Path) -> Result<DatasetMetadata> {
    let path = processed_dir.join(METADATA_JSON);
    if !path.exists() {
        return Err(DataError::MetadataFileNotFound);
    }
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}
