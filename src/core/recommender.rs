use std::cmp::Ordering;
use crate::core::{interleave::{interleave, split_quota}, scoring::score_property};
use crate::models::{PropertyCandidate, PropertyMatch, ScoringWeights, UserContext};

/// Result of one recommendation pass
#[derive(Debug)]
pub struct RecommendationResult {
    pub recommendations: Vec<PropertyMatch>,
    pub total_candidates: usize,
    pub preference_matches: usize,
    pub discovery_matches: usize,
}

/// Recommendation orchestrator
///
/// # Pipeline Stages
/// 1. Score every candidate against the user context
/// 2. Split into preference and discovery matches
/// 3. Rank each side and trim it to its share of the limit
/// 4. Interleave discovery matches into the preference ranking
#[derive(Debug, Clone)]
pub struct Recommender {
    weights: ScoringWeights,
}

impl Recommender {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single listing
    pub fn score(&self, property: &PropertyCandidate, context: &UserContext) -> PropertyMatch {
        score_property(property, context, &self.weights)
    }

    /// Rank candidates for a user
    ///
    /// # Arguments
    /// * `context` - Merged explicit and implicit preferences
    /// * `candidates` - Active listings from the catalog
    /// * `limit` - Requested number of recommendations
    ///
    /// # Returns
    /// RecommendationResult with at most `limit` interleaved matches
    pub fn recommend(
        &self,
        context: &UserContext,
        candidates: Vec<PropertyCandidate>,
        limit: usize,
    ) -> RecommendationResult {
        let total_candidates = candidates.len();

        let (mut discovery, mut preference): (Vec<PropertyMatch>, Vec<PropertyMatch>) = candidates
            .iter()
            .map(|property| self.score(property, context))
            .partition(|m| m.is_discovery_match);

        // Stable sorts: equal scores keep catalog order
        preference.sort_by(|a, b| descending(a.overall_score, b.overall_score));
        discovery.sort_by(|a, b| descending(a.discovery_score, b.discovery_score));

        let (preference_quota, discovery_quota) = split_quota(limit);
        preference.truncate(preference_quota);
        discovery.truncate(discovery_quota);

        let preference_matches = preference.len();
        let discovery_matches = discovery.len();

        RecommendationResult {
            recommendations: interleave(preference, discovery),
            total_candidates,
            preference_matches,
            discovery_matches,
        }
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[inline]
fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
