//! Validated query-string extractors.
//!
//! These run before [`crate::auth::Principal`] in handler signatures, so a
//! malformed request is reported as 422 whether or not it carries a token.

use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use crate::error::AppError;

pub const NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
struct NameQuery {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountryQuery {
    country: Option<String>,
}

/// `?name=` - 1 to 100 characters.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidName(pub String);

/// `?country=` - exactly two characters, upper-cased.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryCode(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ValidName
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<NameQuery>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::Validation(e.body_text()))?;
        let name = query
            .name
            .ok_or_else(|| AppError::Validation("query parameter 'name' is required".into()))?;

        let len = name.chars().count();
        if len == 0 || len > NAME_MAX_CHARS {
            return Err(AppError::Validation(format!(
                "query parameter 'name' must be 1 to {NAME_MAX_CHARS} characters"
            )));
        }
        Ok(ValidName(name))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CountryCode
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<CountryQuery>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::Validation(e.body_text()))?;
        let country = query.country.ok_or_else(|| {
            AppError::Validation("query parameter 'country' is required".into())
        })?;

        if country.chars().count() != 2 {
            return Err(AppError::Validation(
                "query parameter 'country' must be exactly 2 characters".into(),
            ));
        }
        Ok(CountryCode(country.to_uppercase()))
    }
}
