//! Stored record shapes for the three cache tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A requested name and its running request counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct NameRecord {
    pub id: i64,
    pub name: String,
    pub request_count: i64,
    /// Sole cache-freshness signal; refreshed on every request.
    pub last_accessed_at: DateTime<Utc>,
    /// Instant of the last classifier refresh; origin rows written by that
    /// refresh carry the same `observed_at`.
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// Country metadata as persisted from the country-reference service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CountryRecord {
    pub id: i64,
    pub country_code: String,
    pub country_code3: Option<String>,
    pub country_name: String,
    pub official_name: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub independent: Option<bool>,
    pub google_maps_link: Option<String>,
    pub openstreetmap_link: Option<String>,
    pub capital_name: Option<String>,
    pub capital_latitude: Option<f64>,
    pub capital_longitude: Option<f64>,
    pub flag_png: Option<String>,
    pub flag_svg: Option<String>,
    pub flag_alt: Option<String>,
    pub coat_of_arms_png: Option<String>,
    pub coat_of_arms_svg: Option<String>,
    /// Comma-separated bordering-country codes.
    pub borders: String,
}

impl CountryRecord {
    pub fn border_codes(&self) -> Vec<String> {
        split_codes(&self.borders)
    }
}

/// Insert shape for a country; everything but the generated id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCountry {
    pub country_code: String,
    pub country_code3: Option<String>,
    pub country_name: String,
    pub official_name: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub independent: Option<bool>,
    pub google_maps_link: Option<String>,
    pub openstreetmap_link: Option<String>,
    pub capital_name: Option<String>,
    pub capital_latitude: Option<f64>,
    pub capital_longitude: Option<f64>,
    pub flag_png: Option<String>,
    pub flag_svg: Option<String>,
    pub flag_alt: Option<String>,
    pub coat_of_arms_png: Option<String>,
    pub coat_of_arms_svg: Option<String>,
    pub borders: Vec<String>,
}

/// One observed (name, country, probability) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct NameOriginRecord {
    pub id: i64,
    pub name_id: i64,
    pub country_id: i64,
    pub probability: f64,
    pub observed_at: DateTime<Utc>,
}

/// A stored country joined with the probability of one name origin row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredOrigin {
    pub country: CountryRecord,
    pub probability: f64,
}

/// Aggregation row for the popular-names query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PopularName {
    pub name: String,
    pub count: i64,
}

pub(crate) fn join_codes(codes: &[String]) -> String {
    codes.join(",")
}

pub(crate) fn split_codes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
