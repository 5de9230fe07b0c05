// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BehaviorSignal, BudgetRange, DiscoveryPatterns, Insight, MatchFactor, MatchReason,
    PatternCount, PreferenceProfile, PriceRange, PropertyCandidate, PropertyMatch,
    PropertySnapshot, ScoringWeights, UserContext,
};
pub use requests::{RecommendParams, RecommendationAction, RecommendationRequest, RequestError};
pub use responses::{
    DiscoveryInsightsResponse, ErrorResponse, ExplainMatchResponse, ExplainedProperty,
    HealthResponse, RecommendationMeta, RecommendationsResponse, UserInsights,
};
