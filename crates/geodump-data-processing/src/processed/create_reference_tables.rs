use polars::prelude::*;

/// Rows missing any of these columns cannot be keyed and are dropped.
fn required(columns: &[&str]) -> Expr {
    columns
        .iter()
        .map(|c| col(*c).is_not_null())
        .reduce(|acc, expr| acc.and(expr))
        .unwrap_or_else(|| lit(true))
}

pub fn get_countries_lf(country_info: LazyFrame) -> LazyFrame {
    country_info
        .filter(required(&["geonameId", "ISO", "ISO3", "Country"]))
        .select([
            col("geonameId"),
            col("ISO").alias("iso"),
            col("ISO3").alias("iso3"),
            col("Country").alias("name"),
            col("Capital").alias("capital"),
            col("Continent").alias("continent"),
            col("Population").alias("population"),
        ])
}

pub fn get_admin1_lf(admin1_codes: LazyFrame) -> LazyFrame {
    admin1_codes
        .filter(required(&["geonameId", "country_code", "admin1_code", "name"]))
        .select([
            col("geonameId"),
            col("country_code"),
            col("admin1_code"),
            col("name"),
            col("asciiname"),
        ])
}

pub fn get_admin2_lf(admin2_codes: LazyFrame) -> LazyFrame {
    admin2_codes
        .filter(required(&[
            "geonameId",
            "country_code",
            "admin1_code",
            "admin2_code",
            "name",
        ]))
        .select([
            col("geonameId"),
            col("country_code"),
            col("admin1_code"),
            col("admin2_code"),
            col("name"),
            col("asciiname"),
        ])
}

pub fn get_cities_lf(cities: LazyFrame) -> LazyFrame {
    cities
        .filter(required(&["geonameId", "name", "country_code"]))
        .select([
            col("geonameId"),
            col("name"),
            col("asciiname"),
            col("country_code"),
            col("admin1_code"),
            col("admin2_code"),
            col("latitude"),
            col("longitude"),
            col("population"),
            col("timezone"),
            col("feature_code"),
        ])
}
