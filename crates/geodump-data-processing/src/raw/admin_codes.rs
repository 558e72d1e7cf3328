use std::path::Path;

use polars::prelude::*;

use super::{Result, scan_tsv};

// admin1CodesASCII.txt and admin2Codes.txt share a layout; only the dotted code differs.
const ADMIN_CODES_SCHEMA: [(PlSmallStr, DataType); 4] = [
    (PlSmallStr::from_static("code"), DataType::String),
    (PlSmallStr::from_static("name"), DataType::String),
    (PlSmallStr::from_static("asciiname"), DataType::String),
    (PlSmallStr::from_static("geonameId"), DataType::UInt32),
];

fn read_admin_codes(path: &Path) -> Result<LazyFrame> {
    Ok(scan_tsv(path, Schema::from_iter(ADMIN_CODES_SCHEMA))
        .finish()?
        .with_column(col("code").str().split(lit(".")).alias("_tmp")))
}

/// `US.CA` -> `country_code = US`, `admin1_code = CA`
pub fn get_admin1_codes_df(path: &Path) -> Result<LazyFrame> {
    Ok(read_admin_codes(path)?
        .with_columns(vec![
            col("_tmp").list().first().alias("country_code"),
            col("_tmp").list().last().alias("admin1_code"),
        ])
        .drop(["_tmp", "code"]))
}

/// `US.CA.075` -> `country_code = US`, `admin1_code = CA`, `admin2_code = 075`
pub fn get_admin2_codes_df(path: &Path) -> Result<LazyFrame> {
    Ok(read_admin_codes(path)?
        .with_columns(vec![
            col("_tmp").list().first().alias("country_code"),
            col("_tmp").list().get(lit(1), true).alias("admin1_code"),
            col("_tmp").list().last().alias("admin2_code"),
        ])
        .drop(["_tmp", "code"]))
}
