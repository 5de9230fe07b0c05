// Service exports
pub mod auth;
pub mod enrichment;
pub mod gateway;
pub mod postgres;
pub mod store;

pub use auth::{AuthError, Claims, TokenVerifier};
pub use gateway::{ChatMessage, GatewayClient, GatewayError, ToolSpec};
pub use postgres::{PostgresClient, StoreError};
pub use store::ListingStore;
