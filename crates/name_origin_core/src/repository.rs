//! Data access for the name-origin cache.
//!
//! Each operation is a single statement on a pooled connection (autocommit).
//! Counter updates are expressed in SQL so concurrent requests for the same
//! name never overwrite each other's increment.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::models::{
    join_codes, CountryRecord, NameOriginRecord, NameRecord, NewCountry, PopularName,
    StoredOrigin,
};

pub const DEFAULT_POPULAR_LIMIT: i64 = 5;

#[derive(FromRow)]
struct OriginRow {
    #[sqlx(flatten)]
    country: CountryRecord,
    probability: f64,
}

/// Repository for names, countries and name origins
#[derive(Debug, Clone)]
pub struct OriginRepository {
    pool: SqlitePool,
}

impl OriginRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ── Names ──────────────────────────────────────────────────

    pub async fn find_name(&self, name: &str) -> Result<Option<NameRecord>, sqlx::Error> {
        sqlx::query_as::<_, NameRecord>(
            "SELECT id, name, request_count, last_accessed_at, last_refreshed_at \
             FROM names WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert a freshly classified name with counter 1. If another request
    /// created it first, the existing row is incremented and marked refreshed
    /// instead.
    pub async fn create_name(
        &self,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<NameRecord, sqlx::Error> {
        sqlx::query_as::<_, NameRecord>(
            r#"
            INSERT INTO names (name, request_count, last_accessed_at, last_refreshed_at)
            VALUES (?, 1, ?, ?)
            ON CONFLICT(name) DO UPDATE
                SET request_count = names.request_count + 1,
                    last_accessed_at = excluded.last_accessed_at,
                    last_refreshed_at = excluded.last_refreshed_at
            RETURNING id, name, request_count, last_accessed_at, last_refreshed_at
            "#,
        )
        .bind(name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Count a cache hit. Leaves `last_refreshed_at` alone.
    pub async fn increment_name(
        &self,
        name_id: i64,
        now: DateTime<Utc>,
    ) -> Result<NameRecord, sqlx::Error> {
        sqlx::query_as::<_, NameRecord>(
            r#"
            UPDATE names
            SET request_count = request_count + 1,
                last_accessed_at = ?
            WHERE id = ?
            RETURNING id, name, request_count, last_accessed_at, last_refreshed_at
            "#,
        )
        .bind(now)
        .bind(name_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Count a request that re-classified an existing name.
    pub async fn refresh_name(
        &self,
        name_id: i64,
        now: DateTime<Utc>,
    ) -> Result<NameRecord, sqlx::Error> {
        sqlx::query_as::<_, NameRecord>(
            r#"
            UPDATE names
            SET request_count = request_count + 1,
                last_accessed_at = ?,
                last_refreshed_at = ?
            WHERE id = ?
            RETURNING id, name, request_count, last_accessed_at, last_refreshed_at
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(name_id)
        .fetch_one(&self.pool)
        .await
    }

    // ── Countries ──────────────────────────────────────────────

    pub async fn find_country(&self, code: &str) -> Result<Option<CountryRecord>, sqlx::Error> {
        sqlx::query_as::<_, CountryRecord>("SELECT * FROM countries WHERE country_code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
    }

    /// Insert a country. Country rows are immutable once written; a concurrent
    /// insert of the same code keeps the first row and both callers read it.
    pub async fn create_country(&self, country: &NewCountry) -> Result<CountryRecord, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO countries (
                country_code, country_code3, country_name, official_name,
                region, subregion, independent,
                google_maps_link, openstreetmap_link,
                capital_name, capital_latitude, capital_longitude,
                flag_png, flag_svg, flag_alt,
                coat_of_arms_png, coat_of_arms_svg, borders
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(country_code) DO NOTHING
            "#,
        )
        .bind(&country.country_code)
        .bind(&country.country_code3)
        .bind(&country.country_name)
        .bind(&country.official_name)
        .bind(&country.region)
        .bind(&country.subregion)
        .bind(country.independent)
        .bind(&country.google_maps_link)
        .bind(&country.openstreetmap_link)
        .bind(&country.capital_name)
        .bind(country.capital_latitude)
        .bind(country.capital_longitude)
        .bind(&country.flag_png)
        .bind(&country.flag_svg)
        .bind(&country.flag_alt)
        .bind(&country.coat_of_arms_png)
        .bind(&country.coat_of_arms_svg)
        .bind(join_codes(&country.borders))
        .execute(&self.pool)
        .await?;

        self.find_country(&country.country_code)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    // ── Name origins ───────────────────────────────────────────

    /// Append an origin row. Rows are never updated or deduplicated; each
    /// refresh writes a new snapshot stamped with `observed_at`.
    pub async fn create_name_origin(
        &self,
        name_id: i64,
        country_id: i64,
        probability: f64,
        observed_at: DateTime<Utc>,
    ) -> Result<NameOriginRecord, sqlx::Error> {
        sqlx::query_as::<_, NameOriginRecord>(
            r#"
            INSERT INTO name_origins (name_id, country_id, probability, observed_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, name_id, country_id, probability, observed_at
            "#,
        )
        .bind(name_id)
        .bind(country_id)
        .bind(probability)
        .bind(observed_at)
        .fetch_one(&self.pool)
        .await
    }

    /// Origins written by the most recent refresh of a name, highest
    /// probability first. Empty when that refresh kept no predictions.
    pub async fn latest_origins(&self, name_id: i64) -> Result<Vec<StoredOrigin>, sqlx::Error> {
        let rows = sqlx::query_as::<_, OriginRow>(
            r#"
            SELECT c.*, o.probability
            FROM name_origins o
            JOIN names n ON n.id = o.name_id
            JOIN countries c ON c.id = o.country_id
            WHERE o.name_id = ?
              AND o.observed_at = n.last_refreshed_at
            ORDER BY o.probability DESC, o.id ASC
            "#,
        )
        .bind(name_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| StoredOrigin {
                country: row.country,
                probability: row.probability,
            })
            .collect())
    }

    /// Top names for a country by number of origin rows. Ties are broken by
    /// name so the result is deterministic.
    pub async fn popular_names(
        &self,
        country_code: &str,
        limit: i64,
    ) -> Result<Vec<PopularName>, sqlx::Error> {
        sqlx::query_as::<_, PopularName>(
            r#"
            SELECT n.name AS name, COUNT(o.id) AS count
            FROM names n
            JOIN name_origins o ON o.name_id = n.id
            JOIN countries c ON c.id = o.country_id
            WHERE c.country_code = ?
            GROUP BY n.name
            ORDER BY count DESC, n.name ASC
            LIMIT ?
            "#,
        )
        .bind(country_code)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
