//! Server configuration from environment variables.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context};
use name_origin_core::clients::nationalize::NATIONALIZE_API_BASE;
use name_origin_core::clients::rest_countries::REST_COUNTRIES_API_BASE;
use name_origin_core::db::DatabaseConfig;
use tracing::info;

use crate::auth::AdminCredentials;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database: DatabaseConfig,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub admin: AdminCredentials,
    pub token_ttl: chrono::Duration,
    pub nationalize_base_url: String,
    pub rest_countries_base_url: String,
    pub upstream_timeout: Duration,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    pub fn from_map(vars: &HashMap<String, String>) -> anyhow::Result<Self> {
        Self::from_source(|key| vars.get(key).cloned())
    }

    fn from_source(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database = DatabaseConfig {
            database_url: or_default(&get, "NAME_ORIGIN_DATABASE_URL", "sqlite://./database.db"),
            max_connections: parse_or(&get, "NAME_ORIGIN_DB_POOL_SIZE", 5)?,
            ..DatabaseConfig::default()
        };

        Ok(Self {
            database,
            bind_addr: or_default(&get, "NAME_ORIGIN_BIND_ADDR", "0.0.0.0:8000"),
            jwt_secret: required(&get, "NAME_ORIGIN_JWT_SECRET")?,
            admin: AdminCredentials {
                username: or_default(&get, "NAME_ORIGIN_ADMIN_USERNAME", "admin"),
                password: required(&get, "NAME_ORIGIN_ADMIN_PASSWORD")?,
            },
            token_ttl: chrono::Duration::minutes(positive(
                "NAME_ORIGIN_TOKEN_TTL_MINUTES",
                parse_or(&get, "NAME_ORIGIN_TOKEN_TTL_MINUTES", 30)?,
            )?),
            nationalize_base_url: or_default(&get, "NATIONALIZE_BASE_URL", NATIONALIZE_API_BASE),
            rest_countries_base_url: or_default(
                &get,
                "REST_COUNTRIES_BASE_URL",
                REST_COUNTRIES_API_BASE,
            ),
            upstream_timeout: Duration::from_secs(parse_or(
                &get,
                "NAME_ORIGIN_UPSTREAM_TIMEOUT_SECS",
                10,
            )?),
        })
    }
}

fn or_default(get: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn required(get: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<String> {
    get(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("{key} must be set"))
}

fn positive(key: &str, value: i64) -> anyhow::Result<i64> {
    if value <= 0 {
        return Err(anyhow!("{key} must be greater than zero, got {value}"));
    }
    Ok(value)
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("Invalid {key} value: {raw}")),
    }
}
