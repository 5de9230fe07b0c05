use crate::core::scoring::matches_preferred_location;
use crate::models::{PropertyCandidate, UserContext};

pub const DISCOVERY_BASE: f64 = 50.0;
pub const DISCOVERY_CAP: f64 = 95.0;

/// Feature keywords that make a listing stand out
pub const PREMIUM_FEATURES: [&str; 5] = ["pool", "garden", "view", "smart home", "gym"];

/// Preference scores below this can be surfaced as discoveries
pub const PREFERENCE_THRESHOLD: f64 = 60.0;

/// Calculate discovery potential (0-95)
///
/// Starts at 50 and rewards popularity, a new area, a price below the
/// user's budget and premium features.
pub fn discovery_score(property: &PropertyCandidate, context: &UserContext) -> f64 {
    let mut score = DISCOVERY_BASE;

    if property.views_count > 100 {
        score += 10.0;
    }
    if property.views_count > 500 {
        score += 10.0;
    }

    if !matches_preferred_location(property, context) {
        score += 15.0;
    }

    if property.price < context.budget_range.min * 0.9 {
        score += 10.0;
    }

    if has_premium_feature(property) {
        score += 10.0;
    }

    score.clamp(0.0, DISCOVERY_CAP)
}

#[inline]
pub fn is_discovery_match(preference_score: f64, discovery_score: f64) -> bool {
    preference_score < PREFERENCE_THRESHOLD && discovery_score > DISCOVERY_BASE
}

fn has_premium_feature(property: &PropertyCandidate) -> bool {
    property.features.iter().any(|feature| {
        let feature = feature.to_lowercase();
        PREMIUM_FEATURES.iter().any(|premium| feature.contains(premium))
    })
}
