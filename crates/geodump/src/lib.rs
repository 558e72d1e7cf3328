//! geodump - GeoNames Reference Data Store
//!
//! geodump loads the GeoNames reference tables (countries, first and second
//! level administrative divisions, cities) into memory and answers lookups
//! between them. Links between tables are GeoNames codes (`US`, `US.CA`,
//! `US.CA.075`), indexed once at load so no query scans a collection.
//!
//! # Quick Start
//!
//! ```rust
//! use geodump::data_processing::create_test_data_dir;
//! use geodump::{DataSource, ReferenceStore, StoreConfig};
//!
//! // A tiny GeoNames-shaped dataset; point `data_dir` at real dumps instead
//! let fixtures = create_test_data_dir(DataSource::Cities15000)?;
//! let config = StoreConfig::builder().data_dir(fixtures.path()).build();
//! let store = ReferenceStore::initialize(&config)?;
//!
//! // ISO code first, name prefix otherwise
//! let us = store.search("usa")[0];
//! for state in store.admin1_of(us) {
//!     println!("{}: {} counties", state.name, store.admin2_of(state).len());
//! }
//!
//! // Walk back up from a city
//! let city = store.cities_of(us)[0];
//! println!("{}", store.resolve_hierarchy(city));
//! # Ok::<(), geodump::error::GeodumpError>(())
//! ```
//!
//! # Data
//!
//! The raw files are expected under `<data_dir>/raw/` exactly as GeoNames
//! publishes them: `countryInfo.txt`, `admin1CodesASCII.txt`,
//! `admin2Codes.txt` and one `citiesNNN.txt` extract selected by
//! [`DataSource`]. geodump never downloads them. The first load writes a
//! parquet cache to `<data_dir>/processed/` which later loads reuse.
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod config;
mod core;
mod entity;
pub mod error;
mod hierarchy;
pub mod index;
mod search;

pub use self::core::{ReferenceStore, StoreStats};

pub use config::{StoreConfig, StoreConfigBuilder};
pub use entity::{
    Admin1, Admin2, Admin2Scope, AdminLevel, City, CityScope, Country, Division, GeoFeature, Scope,
    ScopeKey,
};
pub use geodump_data_processing as data_processing;
pub use geodump_data_processing::DataSource;
pub use hierarchy::LocationContext;
pub use polars;
pub use search::MatchKind;

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the geodump library.
///
/// Installs a `tracing` fmt subscriber filtered at `level`, unless
/// `RUST_LOG` is set. Span close events carry load timings. Calling it
/// again is a no-op.
///
/// # Examples
///
/// ```rust
/// use geodump::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), geodump::error::GeodumpError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::GeodumpError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("polars=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        Ok(())
    })
}
