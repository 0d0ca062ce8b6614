//! OriginService - decides between serving a name from the local cache and
//! refreshing it from the upstream classifier.
//!
//! Upstream calls are awaited one after another: one classification, then one
//! country lookup per prediction whose country is not cached yet.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::assembly::{
    country_details, new_country, CountryDetails, NameResponse, PopularNamesResponse,
};
use crate::clients::{CountryDirectory, NationalityClassifier};
use crate::error::{OriginError, Result};
use crate::models::{CountryRecord, NameRecord};
use crate::repository::{OriginRepository, DEFAULT_POPULAR_LIMIT};

/// Age past which a cached name is refreshed from the classifier.
pub fn staleness_window() -> Duration {
    Duration::hours(24)
}

pub struct OriginService {
    repository: OriginRepository,
    classifier: Arc<dyn NationalityClassifier>,
    directory: Arc<dyn CountryDirectory>,
}

impl OriginService {
    pub fn new(
        repository: OriginRepository,
        classifier: Arc<dyn NationalityClassifier>,
        directory: Arc<dyn CountryDirectory>,
    ) -> Self {
        Self {
            repository,
            classifier,
            directory,
        }
    }

    pub fn repository(&self) -> &OriginRepository {
        &self.repository
    }

    pub async fn lookup_name(&self, name: &str) -> Result<NameResponse> {
        self.lookup_name_at(name, Utc::now()).await
    }

    /// Resolve `name` as of `now`. `now` is used both for the freshness check
    /// and as the timestamp of every row this call writes.
    pub async fn lookup_name_at(&self, name: &str, now: DateTime<Utc>) -> Result<NameResponse> {
        let cached = self.repository.find_name(name).await?;

        if let Some(record) = cached.as_ref().filter(|r| is_fresh(r, now)) {
            return self.serve_cached(record, now).await;
        }

        self.refresh(name, cached, now).await
    }

    async fn serve_cached(&self, record: &NameRecord, now: DateTime<Utc>) -> Result<NameResponse> {
        let record = self.repository.increment_name(record.id, now).await?;
        let countries = self
            .repository
            .latest_origins(record.id)
            .await?
            .iter()
            .map(|origin| country_details(&origin.country, origin.probability))
            .collect::<Vec<_>>();

        debug!(
            name = %record.name,
            request_count = record.request_count,
            countries = countries.len(),
            "served from cache"
        );

        Ok(NameResponse {
            name: record.name,
            countries,
            request_count: record.request_count,
        })
    }

    async fn refresh(
        &self,
        name: &str,
        cached: Option<NameRecord>,
        now: DateTime<Utc>,
    ) -> Result<NameResponse> {
        let predictions = self.classifier.classify(name).await?;
        if predictions.is_empty() {
            return Err(OriginError::NotFound(
                "No country data found for this name".to_string(),
            ));
        }

        // Resolve every country before the name row is written or touched.
        let mut resolved: Vec<(CountryRecord, f64)> = Vec::with_capacity(predictions.len());
        for prediction in &predictions {
            let code = prediction.country_code.to_uppercase();

            let country = match self.repository.find_country(&code).await? {
                Some(country) => country,
                None => match self.directory.lookup(&code).await? {
                    Some(rest) => {
                        self.repository
                            .create_country(&new_country(&code, &rest))
                            .await?
                    }
                    None => {
                        warn!(name, country_code = %code, "no country details; skipping prediction");
                        continue;
                    }
                },
            };
            resolved.push((country, prediction.probability));
        }

        let record = match cached {
            Some(existing) => self.repository.refresh_name(existing.id, now).await?,
            None => self.repository.create_name(name, now).await?,
        };

        let mut countries: Vec<CountryDetails> = Vec::with_capacity(resolved.len());
        for (country, probability) in &resolved {
            self.repository
                .create_name_origin(record.id, country.id, *probability, now)
                .await?;
            countries.push(country_details(country, *probability));
        }

        info!(
            name = %record.name,
            request_count = record.request_count,
            predictions = predictions.len(),
            countries = countries.len(),
            "refreshed from classifier"
        );

        Ok(NameResponse {
            name: record.name,
            countries,
            request_count: record.request_count,
        })
    }

    /// Top names for a country; `NotFound` when nothing has been recorded.
    pub async fn popular_names(&self, country_code: &str) -> Result<PopularNamesResponse> {
        let country = country_code.to_uppercase();
        let names = self
            .repository
            .popular_names(&country, DEFAULT_POPULAR_LIMIT)
            .await?;

        if names.is_empty() {
            return Err(OriginError::NotFound(
                "No data available for this country".to_string(),
            ));
        }

        Ok(PopularNamesResponse { country, names })
    }
}

fn is_fresh(record: &NameRecord, now: DateTime<Utc>) -> bool {
    record.last_accessed_at >= now - staleness_window()
}
