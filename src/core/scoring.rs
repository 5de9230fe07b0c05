use crate::core::discovery::{discovery_score, is_discovery_match};
use crate::models::{MatchFactor, MatchReason, PropertyCandidate, PropertyMatch, ScoringWeights, UserContext};

/// Multipliers applied when a factor is not fully satisfied
pub const LOCATION_MISS: f64 = 0.3;
pub const PRICE_GREAT_VALUE: f64 = 0.6;
pub const PRICE_ABOVE_RANGE: f64 = 0.2;
pub const TYPE_MISS: f64 = 0.4;
pub const BEDROOMS_MISS: f64 = 0.5;
pub const FEATURES_MISS: f64 = 0.5;

/// Prices below this fraction of the budget minimum count as great value
pub const GREAT_VALUE_RATIO: f64 = 0.8;

/// Score one listing against a user context
///
/// Scoring formula:
/// preference = (
///     location * 0.25 +        # City contains a preferred location
///     price * 0.25 +           # Within budget, or well below it
///     property_type * 0.20 +   # Type contains a preferred type
///     bedrooms * 0.15 +        # Meets the minimum bedroom count
///     features * 0.15          # Has every must-have feature
/// ) / sum(weights) * 100
///
/// A listing is a discovery match when its preference score is below 60 and
/// its discovery score is above 50; its overall score is then the discovery
/// score.
pub fn score_property(
    property: &PropertyCandidate,
    context: &UserContext,
    weights: &ScoringWeights,
) -> PropertyMatch {
    let (preference_score, match_reasons) = calculate_preference_score(property, context, weights);
    let discovery_score = discovery_score(property, context);
    let is_discovery = is_discovery_match(preference_score, discovery_score);

    PropertyMatch {
        property_id: property.id,
        overall_score: if is_discovery { discovery_score } else { preference_score },
        preference_score,
        discovery_score,
        match_reasons,
        is_discovery_match: is_discovery,
        property: property.clone(),
        ai_explanation: None,
    }
}

/// Weighted preference score (0-100) and one reason per factor
pub fn calculate_preference_score(
    property: &PropertyCandidate,
    context: &UserContext,
    weights: &ScoringWeights,
) -> (f64, Vec<MatchReason>) {
    let factors = [
        (MatchFactor::Location, weights.location, location_factor(property, context)),
        (MatchFactor::Price, weights.price, price_factor(property, context)),
        (MatchFactor::PropertyType, weights.property_type, type_factor(property, context)),
        (MatchFactor::Bedrooms, weights.bedrooms, bedrooms_factor(property, context)),
        (MatchFactor::Features, weights.features, features_factor(property, context)),
    ];

    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    let mut reasons = Vec::with_capacity(factors.len());

    for (factor, weight, (score, explanation)) in factors {
        weighted += score * weight;
        total_weight += weight;
        reasons.push(MatchReason {
            factor,
            score,
            explanation,
            weight,
        });
    }

    let preference_score = if total_weight > 0.0 {
        weighted / total_weight * 100.0
    } else {
        0.0
    };

    (preference_score.clamp(0.0, 100.0), reasons)
}

/// True when the listing's city (or location) contains a preferred location
pub fn matches_preferred_location(property: &PropertyCandidate, context: &UserContext) -> bool {
    let locality = property.locality().to_lowercase();
    context
        .preferred_locations
        .iter()
        .any(|loc| locality.contains(&loc.to_lowercase()))
}

#[inline]
fn location_factor(property: &PropertyCandidate, context: &UserContext) -> (f64, String) {
    if matches_preferred_location(property, context) {
        (
            1.0,
            format!("Located in {}, one of your preferred areas", property.locality()),
        )
    } else {
        (
            LOCATION_MISS,
            format!("Explore a new area: {}", property.locality()),
        )
    }
}

/// Over-budget prices always land in the lowest bucket, however far over.
#[inline]
fn price_factor(property: &PropertyCandidate, context: &UserContext) -> (f64, String) {
    let budget = context.budget_range;
    let price = property.price;

    if budget.contains(price) {
        (1.0, "Priced within your budget".to_string())
    } else if price < budget.min * GREAT_VALUE_RATIO {
        (
            PRICE_GREAT_VALUE,
            "Great value: priced well below your usual range".to_string(),
        )
    } else {
        (
            PRICE_ABOVE_RANGE,
            "Priced above your typical range".to_string(),
        )
    }
}

#[inline]
fn type_factor(property: &PropertyCandidate, context: &UserContext) -> (f64, String) {
    let property_type = property.property_type.to_lowercase();
    let matched = context
        .preferred_types
        .iter()
        .any(|t| property_type.contains(&t.to_lowercase()));

    if matched {
        (
            1.0,
            format!("Matches your preferred property type ({})", property.property_type),
        )
    } else {
        (
            TYPE_MISS,
            format!("A different property type to consider ({})", property.property_type),
        )
    }
}

#[inline]
fn bedrooms_factor(property: &PropertyCandidate, context: &UserContext) -> (f64, String) {
    match context.min_bedrooms {
        Some(min) if property.bedrooms < min => (
            BEDROOMS_MISS,
            format!(
                "Has {} bedrooms, fewer than your minimum of {}",
                property.bedrooms, min
            ),
        ),
        _ => (
            1.0,
            format!("Has {} bedrooms to fit your needs", property.bedrooms),
        ),
    }
}

#[inline]
fn features_factor(property: &PropertyCandidate, context: &UserContext) -> (f64, String) {
    let features: Vec<String> = property.features.iter().map(|f| f.to_lowercase()).collect();

    let has_must_haves = context.must_have_features.iter().all(|wanted| {
        let wanted = wanted.to_lowercase();
        features.iter().any(|f| f.contains(&wanted))
    });

    if !features.is_empty() && has_must_haves {
        let explanation = if context.must_have_features.is_empty() {
            format!("Comes with {} listed features", features.len())
        } else {
            "Includes all of your must-have features".to_string()
        };
        (1.0, explanation)
    } else {
        (
            FEATURES_MISS,
            "Some of your must-have features may be missing".to_string(),
        )
    }
}
