use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::models::{BehaviorSignal, PreferenceProfile, PropertyCandidate};
use crate::services::postgres::{PostgresClient, StoreError};

/// Reads the recommendation flow needs from the marketplace database
///
/// `PostgresClient` is the production implementation; handlers only see
/// this trait through `AppState`.
#[async_trait::async_trait]
pub trait ListingStore: Send + Sync {
    /// Saved search preferences, if the user has any
    async fn get_preference_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PreferenceProfile>, StoreError>;

    /// View signals since `since`, newest first
    async fn get_recent_views(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<BehaviorSignal>, StoreError>;

    /// Signals of any type, newest first
    async fn get_recent_signals(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<BehaviorSignal>, StoreError>;

    async fn get_favorite_ids(&self, user_id: Uuid, limit: i64) -> Result<Vec<Uuid>, StoreError>;

    /// Active, approved listings, newest first
    async fn get_active_properties(&self, limit: i64) -> Result<Vec<PropertyCandidate>, StoreError>;

    /// One active, approved listing
    async fn get_property(&self, property_id: Uuid) -> Result<Option<PropertyCandidate>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

#[async_trait::async_trait]
impl ListingStore for PostgresClient {
    async fn get_preference_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PreferenceProfile>, StoreError> {
        PostgresClient::get_preference_profile(self, user_id).await
    }

    async fn get_recent_views(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<BehaviorSignal>, StoreError> {
        PostgresClient::get_recent_views(self, user_id, since, limit).await
    }

    async fn get_recent_signals(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<BehaviorSignal>, StoreError> {
        PostgresClient::get_recent_signals(self, user_id, limit).await
    }

    async fn get_favorite_ids(&self, user_id: Uuid, limit: i64) -> Result<Vec<Uuid>, StoreError> {
        PostgresClient::get_favorite_ids(self, user_id, limit).await
    }

    async fn get_active_properties(&self, limit: i64) -> Result<Vec<PropertyCandidate>, StoreError> {
        PostgresClient::get_active_properties(self, limit).await
    }

    async fn get_property(&self, property_id: Uuid) -> Result<Option<PropertyCandidate>, StoreError> {
        PostgresClient::get_property(self, property_id).await
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        PostgresClient::health_check(self).await
    }
}
