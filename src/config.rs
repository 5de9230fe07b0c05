use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub tables: TableSettings,
    pub gateway: GatewaySettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub recommendation: RecommendationSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

/// Table names in the marketplace database
#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_preferences_table")]
    pub preferences: String,
    #[serde(default = "default_signals_table")]
    pub behavior_signals: String,
    #[serde(default = "default_favorites_table")]
    pub favorites: String,
    #[serde(default = "default_properties_table")]
    pub properties: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            preferences: default_preferences_table(),
            behavior_signals: default_signals_table(),
            favorites: default_favorites_table(),
            properties: default_properties_table(),
        }
    }
}

fn default_preferences_table() -> String { "user_preferences".to_string() }
fn default_signals_table() -> String { "user_behavior_signals".to_string() }
fn default_favorites_table() -> String { "favorites".to_string() }
fn default_properties_table() -> String { "properties".to_string() }

/// OpenAI-compatible chat completion gateway
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySettings {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,
}

fn default_gateway_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    #[serde(default = "default_audience")]
    pub audience: String,
}

fn default_audience() -> String { "authenticated".to_string() }

/// Request limits and read sizes for the recommendation flow
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: i64,
    #[serde(default = "default_signal_limit")]
    pub signal_limit: i64,
    #[serde(default = "default_signal_window_days")]
    pub signal_window_days: i64,
    #[serde(default = "default_favorite_limit")]
    pub favorite_limit: i64,
    #[serde(default = "default_insight_signal_limit")]
    pub insight_signal_limit: i64,
    #[serde(default = "default_explained_count")]
    pub explained_count: usize,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            candidate_limit: default_candidate_limit(),
            signal_limit: default_signal_limit(),
            signal_window_days: default_signal_window_days(),
            favorite_limit: default_favorite_limit(),
            insight_signal_limit: default_insight_signal_limit(),
            explained_count: default_explained_count(),
        }
    }
}

fn default_limit() -> u16 { 10 }
fn default_max_limit() -> u16 { 50 }
fn default_candidate_limit() -> i64 { 100 }
fn default_signal_limit() -> i64 { 50 }
fn default_signal_window_days() -> i64 { 30 }
fn default_favorite_limit() -> i64 { 20 }
fn default_insight_signal_limit() -> i64 { 100 }
fn default_explained_count() -> usize { 5 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_price_weight")]
    pub price: f64,
    #[serde(default = "default_property_type_weight")]
    pub property_type: f64,
    #[serde(default = "default_bedrooms_weight")]
    pub bedrooms: f64,
    #[serde(default = "default_features_weight")]
    pub features: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            location: default_location_weight(),
            price: default_price_weight(),
            property_type: default_property_type_weight(),
            bedrooms: default_bedrooms_weight(),
            features: default_features_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            location: config.location,
            price: config.price,
            property_type: config.property_type,
            bedrooms: config.bedrooms,
            features: config.features,
        }
    }
}

fn default_location_weight() -> f64 { 0.25 }
fn default_price_weight() -> f64 { 0.25 }
fn default_property_type_weight() -> f64 { 0.20 }
fn default_bedrooms_weight() -> f64 { 0.15 }
fn default_features_weight() -> f64 { 0.15 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RECS_)
    /// 5. DATABASE_URL, SUPABASE_JWT_SECRET and AI_GATEWAY_API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RECS__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("RECS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("RECS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = ScoringWeights::from(&self.scoring.weights);
        let all_weights = [
            weights.location,
            weights.price,
            weights.property_type,
            weights.bedrooms,
            weights.features,
        ];
        if all_weights.iter().any(|w| !w.is_finite() || *w < 0.0) || weights.total() <= 0.0 {
            return Err(ConfigError::Message(
                "scoring weights must be non-negative with a positive sum".to_string(),
            ));
        }

        let rec = &self.recommendation;
        if rec.default_limit == 0 || rec.default_limit > rec.max_limit {
            return Err(ConfigError::Message(format!(
                "recommendation.default_limit must be between 1 and max_limit ({})",
                rec.max_limit
            )));
        }

        let secret = self.auth.jwt_secret.trim();
        if secret.is_empty() {
            return Err(ConfigError::Message("auth.jwt_secret must be set".to_string()));
        }
        if PLACEHOLDER_SECRETS
            .iter()
            .any(|placeholder| secret.eq_ignore_ascii_case(placeholder))
        {
            return Err(ConfigError::Message(
                "auth.jwt_secret is a placeholder; set the project JWT secret".to_string(),
            ));
        }

        Ok(())
    }
}

/// Sample secrets that must never reach a running service
const PLACEHOLDER_SECRETS: [&str; 4] = ["change-me", "changeme", "your-jwt-secret", "your-super-secret-jwt-token"];

/// Apply well-known environment variables on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    let overrides = [
        ("DATABASE_URL", "database.url"),
        ("SUPABASE_JWT_SECRET", "auth.jwt_secret"),
        ("AI_GATEWAY_API_KEY", "gateway.api_key"),
    ];

    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
