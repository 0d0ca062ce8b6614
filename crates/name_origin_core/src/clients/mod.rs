//! Upstream integrations
//!
//! - Classifier: name → ranked (country code, probability) pairs (nationalize.io)
//! - Country directory: country code → descriptive metadata (restcountries.com)
//!
//! Orchestration depends on the traits below, never on the concrete clients.

pub mod nationalize;
pub mod rest_countries;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub use nationalize::NationalizeClient;
pub use rest_countries::RestCountriesClient;
pub use types::{CountryPrediction, RestCountry};

pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Predicts countries of origin for a name.
#[async_trait]
pub trait NationalityClassifier: Send + Sync {
    /// Possibly-empty predictions; `UpstreamUnavailable` on any transport or
    /// status failure.
    async fn classify(&self, name: &str) -> Result<Vec<CountryPrediction>>;
}

/// Looks up descriptive metadata for a two-letter country code.
#[async_trait]
pub trait CountryDirectory: Send + Sync {
    /// First matching record, or `None` when the service returns no records.
    async fn lookup(&self, country_code: &str) -> Result<Option<RestCountry>>;
}

pub(crate) fn build_http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    use anyhow::Context;

    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use tokio::net::TcpListener;

    /// Serve `app` on an ephemeral local port; returns its base URL with a
    /// trailing slash.
    pub async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }
}
