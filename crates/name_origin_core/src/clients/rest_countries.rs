//! REST Countries client

use std::time::Duration;

use anyhow::bail;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::types::RestCountry;
use super::{build_http_client, CountryDirectory};
use crate::error::{OriginError, Result};

pub const REST_COUNTRIES_API_BASE: &str = "https://restcountries.com/v3.1";
const SERVICE: &str = "REST Countries";

pub struct RestCountriesClient {
    client: Client,
    base_url: Url,
}

impl RestCountriesClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            bail!("{base_url} cannot be used as a base URL");
        }
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url,
        })
    }

    fn request_url(&self, country_code: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("alpha").push(country_code);
        }
        url
    }
}

#[async_trait]
impl CountryDirectory for RestCountriesClient {
    async fn lookup(&self, country_code: &str) -> Result<Option<RestCountry>> {
        let url = self.request_url(country_code);
        debug!(%url, "fetching country details");

        let unavailable = |e: reqwest::Error| {
            warn!("{SERVICE} request failed: {e}");
            OriginError::UpstreamUnavailable { service: SERVICE }
        };

        let records: Vec<RestCountry> = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)?;

        Ok(records.into_iter().next())
    }
}
