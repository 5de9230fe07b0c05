use serde::Serialize;
use uuid::Uuid;
use crate::models::domain::{BudgetRange, DiscoveryPatterns, Insight, MatchReason, PropertyMatch};

/// Response for `get_ai_recommendations`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    pub success: bool,
    pub recommendations: Vec<PropertyMatch>,
    pub user_insights: UserInsights,
    pub meta: RecommendationMeta,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInsights {
    pub preferred_locations: Vec<String>,
    pub budget_range: BudgetRange,
    pub top_property_types: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationMeta {
    pub total_candidates: usize,
    pub preference_matches: usize,
    pub discovery_matches: usize,
}

/// Response for `explain_match`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainMatchResponse {
    pub success: bool,
    pub property: ExplainedProperty,
    pub match_score: f64,
    pub is_discovery_match: bool,
    pub explanation: String,
    pub match_breakdown: Vec<MatchReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplainedProperty {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub location: String,
}

/// Response for `get_discovery_insights`
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryInsightsResponse {
    pub success: bool,
    pub patterns: DiscoveryPatterns,
    pub insights: Vec<Insight>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
