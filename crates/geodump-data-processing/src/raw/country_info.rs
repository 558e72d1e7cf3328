use std::path::Path;

use polars::prelude::*;

use super::{Result, scan_tsv};

/// `countryInfo.txt` opens with a block of `#` comment lines, the last of which is the header.
const COUNTRY_INFO_HEADER_LINES: usize = 51;

const COUNTRY_INFO_SCHEMA: [(PlSmallStr, DataType); 19] = [
    (PlSmallStr::from_static("ISO"), DataType::String),
    (PlSmallStr::from_static("ISO3"), DataType::String),
    (PlSmallStr::from_static("ISO_Numeric"), DataType::Int32),
    (PlSmallStr::from_static("fips"), DataType::String),
    (PlSmallStr::from_static("Country"), DataType::String),
    (PlSmallStr::from_static("Capital"), DataType::String),
    (PlSmallStr::from_static("Area"), DataType::Float64),
    (PlSmallStr::from_static("Population"), DataType::Int64),
    (PlSmallStr::from_static("Continent"), DataType::String),
    (PlSmallStr::from_static("tld"), DataType::String),
    (PlSmallStr::from_static("CurrencyCode"), DataType::String),
    (PlSmallStr::from_static("CurrencyName"), DataType::String),
    (PlSmallStr::from_static("Phone"), DataType::String),
    (
        PlSmallStr::from_static("Postal_Code_Format"),
        DataType::String,
    ),
    (
        PlSmallStr::from_static("Postal_Code_Regex"),
        DataType::String,
    ),
    (PlSmallStr::from_static("Languages"), DataType::String),
    (PlSmallStr::from_static("geonameId"), DataType::UInt32),
    (PlSmallStr::from_static("neighbours"), DataType::String),
    (
        PlSmallStr::from_static("EquivalentFipsCode"),
        DataType::String,
    ),
];

pub fn get_country_info_df(path: &Path) -> Result<LazyFrame> {
    Ok(scan_tsv(path, Schema::from_iter(COUNTRY_INFO_SCHEMA))
        .with_skip_lines(COUNTRY_INFO_HEADER_LINES)
        .finish()?)
}
