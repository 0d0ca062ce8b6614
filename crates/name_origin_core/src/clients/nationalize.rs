//! Nationalize.io classifier client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::types::{CountryPrediction, NationalizeResponse};
use super::{build_http_client, NationalityClassifier};
use crate::error::{OriginError, Result};

pub const NATIONALIZE_API_BASE: &str = "https://api.nationalize.io";
const SERVICE: &str = "Nationalize.io";

pub struct NationalizeClient {
    client: Client,
    base_url: Url,
}

impl NationalizeClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: Url::parse(base_url)?,
        })
    }

    fn request_url(&self, name: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("name", name);
        url
    }
}

#[async_trait]
impl NationalityClassifier for NationalizeClient {
    async fn classify(&self, name: &str) -> Result<Vec<CountryPrediction>> {
        let url = self.request_url(name);
        debug!(%url, "classifying name");

        let unavailable = |e: reqwest::Error| {
            warn!("{SERVICE} request failed: {e}");
            OriginError::UpstreamUnavailable { service: SERVICE }
        };

        let body: NationalizeResponse = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)?;

        Ok(body.country)
    }
}
