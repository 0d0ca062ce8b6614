//! Upstream API response types
//!
//! References:
//! - https://api.nationalize.io/?name=michael
//! - https://restcountries.com/v3.1/alpha/de

use serde::Deserialize;

/// Classifier response body
#[derive(Debug, Clone, Deserialize)]
pub struct NationalizeResponse {
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Vec<CountryPrediction>,
}

/// One (country code, probability) pair from the classifier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountryPrediction {
    #[serde(rename = "country_id")]
    pub country_code: String,
    pub probability: f64,
}

/// Country-reference record (subset of fields the cache stores)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestCountry {
    #[serde(default)]
    pub cca2: String,
    pub cca3: Option<String>,
    #[serde(default)]
    pub name: CountryNames,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub independent: Option<bool>,
    #[serde(default)]
    pub maps: Maps,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(rename = "capitalInfo", default)]
    pub capital_info: CapitalInfo,
    #[serde(default)]
    pub flags: Images,
    #[serde(rename = "coatOfArms", default)]
    pub coat_of_arms: Images,
    #[serde(default)]
    pub borders: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryNames {
    #[serde(default)]
    pub common: String,
    pub official: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Maps {
    #[serde(rename = "googleMaps")]
    pub google_maps: Option<String>,
    #[serde(rename = "openStreetMaps")]
    pub open_street_maps: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CapitalInfo {
    #[serde(default)]
    pub latlng: Vec<f64>,
}

/// Flag or coat-of-arms asset links. Coat of arms is `{}` for some countries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Images {
    pub png: Option<String>,
    pub svg: Option<String>,
    pub alt: Option<String>,
}
