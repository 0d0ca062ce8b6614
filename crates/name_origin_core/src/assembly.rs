//! Mapping between upstream records, stored rows and response shapes.

use serde::{Deserialize, Serialize};

use crate::clients::RestCountry;
use crate::models::{CountryRecord, NewCountry, PopularName};

/// One probable country of origin, as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryDetails {
    pub country_code: String,
    pub country_name: String,
    pub official_name: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub independent: Option<bool>,
    pub google_maps_link: Option<String>,
    pub openstreetmap_link: Option<String>,
    pub capital_name: Option<String>,
    pub capital_coordinates: Option<String>,
    pub flag_png: Option<String>,
    pub flag_svg: Option<String>,
    pub flag_alt: Option<String>,
    pub coat_of_arms_png: Option<String>,
    pub coat_of_arms_svg: Option<String>,
    pub probability: f64,
    pub borders: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameResponse {
    pub name: String,
    pub countries: Vec<CountryDetails>,
    pub request_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularNamesResponse {
    pub country: String,
    pub names: Vec<PopularName>,
}

/// Build the insert shape for a country fetched from the reference service.
/// The row is keyed by the code that was looked up so later cache lookups
/// for the same code hit it.
pub fn new_country(country_code: &str, rest: &RestCountry) -> NewCountry {
    let (capital_latitude, capital_longitude) = match rest.capital_info.latlng.as_slice() {
        [lat, lon, ..] => (Some(*lat), Some(*lon)),
        [lat] => (Some(*lat), None),
        [] => (None, None),
    };

    NewCountry {
        country_code: country_code.to_uppercase(),
        country_code3: non_empty(rest.cca3.as_deref()),
        country_name: rest.name.common.clone(),
        official_name: non_empty(rest.name.official.as_deref()),
        region: non_empty(rest.region.as_deref()),
        subregion: non_empty(rest.subregion.as_deref()),
        independent: rest.independent,
        google_maps_link: non_empty(rest.maps.google_maps.as_deref()),
        openstreetmap_link: non_empty(rest.maps.open_street_maps.as_deref()),
        capital_name: non_empty(rest.capital.first().map(String::as_str)),
        capital_latitude,
        capital_longitude,
        flag_png: non_empty(rest.flags.png.as_deref()),
        flag_svg: non_empty(rest.flags.svg.as_deref()),
        flag_alt: non_empty(rest.flags.alt.as_deref()),
        coat_of_arms_png: non_empty(rest.coat_of_arms.png.as_deref()),
        coat_of_arms_svg: non_empty(rest.coat_of_arms.svg.as_deref()),
        borders: rest.borders.clone(),
    }
}

pub fn country_details(country: &CountryRecord, probability: f64) -> CountryDetails {
    CountryDetails {
        country_code: country.country_code.clone(),
        country_name: country.country_name.clone(),
        official_name: country.official_name.clone(),
        region: country.region.clone(),
        subregion: country.subregion.clone(),
        independent: country.independent,
        google_maps_link: country.google_maps_link.clone(),
        openstreetmap_link: country.openstreetmap_link.clone(),
        capital_name: country.capital_name.clone(),
        capital_coordinates: capital_coordinates(
            country.capital_latitude,
            country.capital_longitude,
        ),
        flag_png: country.flag_png.clone(),
        flag_svg: country.flag_svg.clone(),
        flag_alt: country.flag_alt.clone(),
        coat_of_arms_png: country.coat_of_arms_png.clone(),
        coat_of_arms_svg: country.coat_of_arms_svg.clone(),
        probability,
        borders: country.border_codes(),
    }
}

/// `"lat,lon"` only when both halves are known. Whole degrees keep their
/// `.0` (`"52.0,13.0"`), and `0.0` counts as known.
pub fn capital_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Option<String> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => Some(format!("{lat:?},{lon:?}")),
        _ => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
