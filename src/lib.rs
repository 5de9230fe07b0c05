//! Property Recs - recommendation service for the real-estate marketplace
//!
//! Scores active listings against a user's stated and observed preferences,
//! interleaves preference and discovery matches, and decorates the results
//! with explanations from an AI gateway.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{build_user_context, interleave, score_property, Recommender};
pub use models::{PropertyCandidate, PropertyMatch, ScoringWeights, UserContext};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let context = build_user_context(None, &[], vec![]);
        let result = Recommender::default().recommend(&context, vec![], 10);
        assert!(result.recommendations.is_empty());
        assert_eq!(interleave(vec![1, 2, 3], vec![9]), vec![1, 2, 3, 9]);
    }
}
