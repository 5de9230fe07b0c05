use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;
use crate::config::TableSettings;
use crate::models::{BehaviorSignal, PreferenceProfile, PropertyCandidate, PropertySnapshot};

/// Errors that can occur when reading from PostgreSQL
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

/// Read-only client for the marketplace database
///
/// Serves the profile, behavior signal, favorite and catalog reads the
/// recommendation flow needs. Nothing here writes.
pub struct PostgresClient {
    pool: PgPool,
    tables: TableSettings,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        tables: TableSettings,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool, tables })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        tables: TableSettings,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            tables,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Build a client whose pool connects on first use
    pub fn connect_lazy(database_url: &str, tables: TableSettings) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)?;

        Ok(Self { pool, tables })
    }

    /// Fetch the user's saved search preferences, if any
    pub async fn get_preference_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PreferenceProfile>, StoreError> {
        let query = format!(
            r#"
            SELECT preferred_locations,
                   preferred_property_types,
                   min_budget::float8 AS min_budget,
                   max_budget::float8 AS max_budget,
                   min_bedrooms::int4 AS min_bedrooms,
                   must_have_features
            FROM {}
            WHERE user_id = $1
            LIMIT 1
            "#,
            self.tables.preferences
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let profile = row
            .map(|row| -> Result<PreferenceProfile, sqlx::Error> {
                Ok(PreferenceProfile {
                    preferred_locations: row
                        .try_get::<Option<Vec<String>>, _>("preferred_locations")?
                        .unwrap_or_default(),
                    preferred_property_types: row
                        .try_get::<Option<Vec<String>>, _>("preferred_property_types")?
                        .unwrap_or_default(),
                    min_budget: row.try_get("min_budget")?,
                    max_budget: row.try_get("max_budget")?,
                    min_bedrooms: row.try_get("min_bedrooms")?,
                    must_have_features: row
                        .try_get::<Option<Vec<String>>, _>("must_have_features")?
                        .unwrap_or_default(),
                })
            })
            .transpose()?;

        tracing::debug!(%user_id, found = profile.is_some(), "Fetched preference profile");

        Ok(profile)
    }

    /// Fetch the user's most recent view signals since `since`, newest first
    pub async fn get_recent_views(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<BehaviorSignal>, StoreError> {
        let query = format!(
            r#"
            SELECT signal_type,
                   property_snapshot,
                   dwell_time_seconds::float8 AS dwell_time_seconds,
                   created_at
            FROM {}
            WHERE user_id = $1
              AND signal_type = 'view'
              AND created_at >= $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
            self.tables.behavior_signals
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(since)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let signals = rows
            .iter()
            .map(signal_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(%user_id, count = signals.len(), "Fetched recent views");

        Ok(signals)
    }

    /// Fetch the user's most recent signals of any type, newest first
    pub async fn get_recent_signals(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<BehaviorSignal>, StoreError> {
        let query = format!(
            r#"
            SELECT signal_type,
                   property_snapshot,
                   dwell_time_seconds::float8 AS dwell_time_seconds,
                   created_at
            FROM {}
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
            self.tables.behavior_signals
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(signal_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Fetch the ids of the user's most recently favorited listings
    pub async fn get_favorite_ids(&self, user_id: Uuid, limit: i64) -> Result<Vec<Uuid>, StoreError> {
        let query = format!(
            r#"
            SELECT property_id
            FROM {}
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
            self.tables.favorites
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| row.try_get("property_id"))
            .collect::<Result<Vec<Uuid>, _>>()?)
    }

    /// Fetch active, approved listings, newest first
    pub async fn get_active_properties(&self, limit: i64) -> Result<Vec<PropertyCandidate>, StoreError> {
        let query = format!(
            "{} WHERE status = 'active' AND approval_status = 'approved' ORDER BY created_at DESC LIMIT $1",
            self.select_properties()
        );

        let rows = sqlx::query(&query).bind(limit).fetch_all(&self.pool).await?;

        let candidates = rows
            .iter()
            .map(candidate_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = candidates.len(), "Fetched candidate listings");

        Ok(candidates)
    }

    /// Fetch one active, approved listing by id
    pub async fn get_property(&self, property_id: Uuid) -> Result<Option<PropertyCandidate>, StoreError> {
        let query = format!(
            "{} WHERE id = $1 AND status = 'active' AND approval_status = 'approved'",
            self.select_properties()
        );

        let row = sqlx::query(&query)
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(candidate_from_row).transpose()?)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    fn select_properties(&self) -> String {
        format!(
            r#"
            SELECT id,
                   title,
                   price::float8 AS price,
                   bedrooms::int4 AS bedrooms,
                   bathrooms::int4 AS bathrooms,
                   area::float8 AS area,
                   property_type,
                   listing_type,
                   city,
                   state,
                   location,
                   features,
                   amenities,
                   images,
                   views_count::int8 AS views_count
            FROM {}
            "#,
            self.tables.properties
        )
    }
}

/// Map a signal row, parsing the snapshot column leniently
fn signal_from_row(row: &PgRow) -> Result<BehaviorSignal, sqlx::Error> {
    let snapshot = row
        .try_get::<Option<Value>, _>("property_snapshot")?
        .map(|value| PropertySnapshot::from_json(&value))
        .unwrap_or_default();

    Ok(BehaviorSignal {
        signal_type: row
            .try_get::<Option<String>, _>("signal_type")?
            .unwrap_or_default(),
        snapshot,
        dwell_time_seconds: row.try_get("dwell_time_seconds")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Map a catalog row; nullable numbers become 0 and nullable lists empty
fn candidate_from_row(row: &PgRow) -> Result<PropertyCandidate, sqlx::Error> {
    let text = |column: &str| -> Result<String, sqlx::Error> {
        Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
    };
    let list = |column: &str| -> Result<Vec<String>, sqlx::Error> {
        Ok(row.try_get::<Option<Vec<String>>, _>(column)?.unwrap_or_default())
    };

    Ok(PropertyCandidate {
        id: row.try_get("id")?,
        title: text("title")?,
        price: row.try_get::<Option<f64>, _>("price")?.unwrap_or(0.0),
        bedrooms: row.try_get::<Option<i32>, _>("bedrooms")?.unwrap_or(0),
        bathrooms: row.try_get::<Option<i32>, _>("bathrooms")?.unwrap_or(0),
        area: row.try_get::<Option<f64>, _>("area")?.unwrap_or(0.0),
        property_type: text("property_type")?,
        listing_type: text("listing_type")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        location: text("location")?,
        features: list("features")?,
        amenities: list("amenities")?,
        images: list("images")?,
        views_count: row.try_get::<Option<i64>, _>("views_count")?.unwrap_or(0),
    })
}
