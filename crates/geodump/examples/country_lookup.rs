//! Country lookup and hierarchy navigation
//!
//! Loads a store and walks it top to bottom for each query given on the
//! command line (default: `US Germ xx`). Set `DATA_DIR` to a directory whose
//! `raw/` folder holds the GeoNames dumps; without it the bundled fixture set
//! is used.

use geodump::data_processing::create_test_data_dir;
use geodump::{DataSource, ReferenceStore, StoreConfig};

fn main() -> anyhow::Result<()> {
    geodump::init_logging(tracing::Level::INFO)?;

    // Keep the fixture directory alive for as long as the store loads from it
    let fixtures;
    let config = match std::env::var("DATA_DIR") {
        Ok(dir) => StoreConfig::builder().data_dir(dir).build(),
        Err(_) => {
            fixtures = create_test_data_dir(DataSource::Cities15000)?;
            StoreConfig::builder().data_dir(fixtures.path()).build()
        }
    };
    let store = ReferenceStore::initialize(&config)?;
    println!("{}", store.stats());

    let mut queries: Vec<String> = std::env::args().skip(1).collect();
    if queries.is_empty() {
        queries = vec!["US".into(), "Germ".into(), "xx".into()];
    }

    for (query, countries) in queries.iter().zip(store.search_bulk(&queries)) {
        println!("\n{query:?}: {} match(es)", countries.len());

        for country in countries {
            println!("  {country}");
            for admin1 in store.admin1_of(country).into_iter().take(5) {
                println!(
                    "    {} ({} admin2, {} cities)",
                    admin1.name,
                    store.admin2_of(admin1).len(),
                    store.cities_of(admin1).len()
                );
            }

            if let Some(city) = store.cities_of(country).first() {
                println!("  {}", store.resolve_hierarchy(city));
            }
        }
    }

    Ok(())
}
