// Core algorithm exports
pub mod context;
pub mod discovery;
pub mod insights;
pub mod interleave;
pub mod recommender;
pub mod scoring;
pub mod stats;

pub use context::build_user_context;
pub use discovery::{discovery_score, is_discovery_match};
pub use insights::summarize_patterns;
pub use interleave::{interleave, split_quota};
pub use recommender::{RecommendationResult, Recommender};
pub use scoring::{calculate_preference_score, score_property};
