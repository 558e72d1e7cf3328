use std::path::{Path, PathBuf};

use geodump_data_processing::{DataSource, get_data_dir};

use crate::error::{GeodumpError, Result};

/// Where and how a [`ReferenceStore`](crate::ReferenceStore) loads its data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Root holding `raw/` and `processed/`. Falls back to the global data directory.
    pub data_dir: Option<PathBuf>,
    /// Which GeoNames cities extract to load
    pub data_source: DataSource,
    /// Regenerate the processed cache even when it is current
    pub rebuild: bool,
}

impl StoreConfig {
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::new()
    }

    /// The data root in effect for this configuration.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.as_deref().unwrap_or_else(|| get_data_dir())
    }

    /// Directory the raw GeoNames dump files are read from.
    #[must_use]
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir().join("raw")
    }

    /// Directory the parquet cache and `metadata.json` are written to.
    #[must_use]
    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir().join("processed")
    }
}

/// Builder for [`StoreConfig`]
#[derive(Debug, Clone, Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Default data directory, the `cities15000` extract and no forced rebuild
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
        }
    }

    /// Read from and write to `dir` instead of the global data directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = Some(dir.into());
        self
    }

    pub fn data_source(mut self, source: DataSource) -> Self {
        self.config.data_source = source;
        self
    }

    /// Select the data source by name, e.g. `"cities5000"`
    pub fn data_source_name(self, name: &str) -> Result<Self> {
        let source = name
            .parse::<DataSource>()
            .map_err(|e| GeodumpError::ConfigError(e.to_string()))?;
        Ok(self.data_source(source))
    }

    /// Ignore any existing processed cache
    pub fn rebuild(mut self, rebuild: bool) -> Self {
        self.config.rebuild = rebuild;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> StoreConfig {
        self.config
    }
}
