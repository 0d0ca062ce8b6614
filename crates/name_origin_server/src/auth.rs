//! Bearer-token authentication.
//!
//! `POST /token` exchanges the configured administrator credentials for an
//! HS256 JWT. Protected handlers take a [`Principal`] argument; extracting it
//! validates the `Authorization: Bearer <jwt>` header.

use std::fmt;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Signing keys, token lifetime and the account allowed to obtain tokens.
#[derive(Clone)]
pub struct AuthConfig {
    keys: Arc<Keys>,
    token_ttl: chrono::Duration,
    admin: AdminCredentials,
}

impl AuthConfig {
    pub fn new(secret: &[u8], token_ttl: chrono::Duration, admin: AdminCredentials) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            }),
            token_ttl,
            admin,
        }
    }

    pub fn admin(&self) -> &AdminCredentials {
        &self.admin
    }

    pub fn issue_token(
        &self,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.keys.decoding, &validation).map(|data| data.claims)
    }
}

/// Authenticated caller.
#[derive(Debug, Clone)]
pub struct Principal {
    pub subject: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<AuthConfig>()
            .cloned()
            .ok_or_else(|| AppError::Internal("auth config not installed".to_string()))?;

        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

        let claims = auth.verify(token).map_err(|e| {
            tracing::debug!("rejected bearer token: {e}");
            AppError::Unauthorized("Could not validate credentials".to_string())
        })?;

        Ok(Principal {
            subject: claims.sub,
        })
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
