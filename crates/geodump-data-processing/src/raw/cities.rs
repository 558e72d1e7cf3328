use std::path::Path;

use polars::prelude::*;

use super::{Result, scan_tsv};

const CITIES_SCHEMA: [(PlSmallStr, DataType); 19] = [
    (PlSmallStr::from_static("geonameId"), DataType::UInt32),
    (PlSmallStr::from_static("name"), DataType::String),
    (PlSmallStr::from_static("asciiname"), DataType::String),
    (PlSmallStr::from_static("alternatenames"), DataType::String),
    (PlSmallStr::from_static("latitude"), DataType::Float32),
    (PlSmallStr::from_static("longitude"), DataType::Float32),
    (PlSmallStr::from_static("feature_class"), DataType::String),
    (PlSmallStr::from_static("feature_code"), DataType::String),
    (PlSmallStr::from_static("country_code"), DataType::String),
    (PlSmallStr::from_static("cc2"), DataType::String),
    (PlSmallStr::from_static("admin1_code"), DataType::String),
    (PlSmallStr::from_static("admin2_code"), DataType::String),
    (PlSmallStr::from_static("admin3_code"), DataType::String),
    (PlSmallStr::from_static("admin4_code"), DataType::String),
    (PlSmallStr::from_static("population"), DataType::Int64),
    (PlSmallStr::from_static("elevation"), DataType::Int32),
    (PlSmallStr::from_static("dem"), DataType::Int32),
    (PlSmallStr::from_static("timezone"), DataType::String),
    (
        PlSmallStr::from_static("modification_date"),
        DataType::String,
    ),
];

pub fn get_cities_df(path: &Path) -> Result<LazyFrame> {
    Ok(scan_tsv(path, Schema::from_iter(CITIES_SCHEMA)).finish()?)
}
