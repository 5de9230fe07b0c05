use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

/// Explicit search preferences saved by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceProfile {
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    #[serde(default)]
    pub preferred_property_types: Vec<String>,
    #[serde(default)]
    pub min_budget: Option<f64>,
    #[serde(default)]
    pub max_budget: Option<f64>,
    #[serde(default)]
    pub min_bedrooms: Option<i32>,
    #[serde(default)]
    pub must_have_features: Vec<String>,
}

/// Property attributes copied onto a behavior signal at interaction time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySnapshot {
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub price: Option<f64>,
}

impl PropertySnapshot {
    /// Parse a snapshot from its JSON column, dropping fields of the wrong shape.
    ///
    /// Prices stored as numeric strings are accepted; blank strings and
    /// non-finite numbers are treated as missing.
    pub fn from_json(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let price = value
            .get("price")
            .and_then(|v| match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            })
            .filter(|p| p.is_finite());

        Self {
            location: text("location"),
            property_type: text("property_type"),
            price,
        }
    }
}

/// A recorded user interaction with a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorSignal {
    pub signal_type: String,
    pub snapshot: PropertySnapshot,
    pub dwell_time_seconds: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl BehaviorSignal {
    pub fn is_view(&self) -> bool {
        self.signal_type.eq_ignore_ascii_case("view")
    }
}

/// Active listing from the property catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyCandidate {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: f64,
    pub property_type: String,
    pub listing_type: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub location: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub views_count: i64,
}

impl PropertyCandidate {
    /// City when present, otherwise the free-form location string
    pub fn locality(&self) -> &str {
        self.city
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(&self.location)
    }

    /// "City, State" for display, falling back to the location string
    pub fn display_location(&self) -> String {
        match (self.city.as_deref(), self.state.as_deref()) {
            (Some(city), Some(state)) if !city.is_empty() && !state.is_empty() => {
                format!("{}, {}", city, state)
            }
            _ => self.locality().to_string(),
        }
    }
}

/// Price window used by the price factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetRange {
    pub min: f64,
    /// `f64::INFINITY` when no upper bound is known; serialized as `null`
    #[serde(serialize_with = "serialize_bound")]
    pub max: f64,
}

impl BudgetRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn unbounded() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }

    #[inline]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for BudgetRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

fn serialize_bound<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

/// Explicit and implicit preferences merged for one request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub preferred_locations: Vec<String>,
    pub preferred_types: Vec<String>,
    pub budget_range: BudgetRange,
    pub min_bedrooms: Option<i32>,
    pub must_have_features: Vec<String>,
    /// Collected for callers; no scoring factor reads it.
    pub favorite_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFactor {
    Location,
    Price,
    PropertyType,
    Bedrooms,
    Features,
}

impl MatchFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchFactor::Location => "location",
            MatchFactor::Price => "price",
            MatchFactor::PropertyType => "property_type",
            MatchFactor::Bedrooms => "bedrooms",
            MatchFactor::Features => "features",
        }
    }
}

/// Explanation of one scoring factor for one property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReason {
    pub factor: MatchFactor,
    /// Factor multiplier in [0, 1]
    pub score: f64,
    pub explanation: String,
    /// Weight of the factor in the preference score
    pub weight: f64,
}

/// Scored recommendation for one property
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMatch {
    pub property_id: Uuid,
    pub overall_score: f64,
    pub preference_score: f64,
    pub discovery_score: f64,
    pub match_reasons: Vec<MatchReason>,
    pub is_discovery_match: bool,
    pub property: PropertyCandidate,
    pub ai_explanation: Option<String>,
}

/// Factor weights for the preference score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub location: f64,
    pub price: f64,
    pub property_type: f64,
    pub bedrooms: f64,
    pub features: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.location + self.price + self.property_type + self.bedrooms + self.features
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            location: 0.25,
            price: 0.25,
            property_type: 0.20,
            bedrooms: 0.15,
            features: 0.15,
        }
    }
}

/// A tallied attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Aggregate browsing statistics for a user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryPatterns {
    pub top_property_types: Vec<PatternCount>,
    pub top_locations: Vec<PatternCount>,
    pub price_range: PriceRange,
    pub avg_dwell_time: f64,
    pub total_views: usize,
}

/// Free-text insight card produced from browsing patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub suggestion: String,
}
