use uuid::Uuid;
use crate::core::stats::{percentile_bounds, top_by_count};
use crate::models::{BehaviorSignal, BudgetRange, PreferenceProfile, UserContext};

/// Number of most-viewed locations and types folded into the context
pub const IMPLICIT_TOP_N: usize = 3;

/// Merge stated preferences with recent browsing into a `UserContext`
///
/// Missing inputs degrade to empty lists and an unbounded budget; there is
/// no error path.
pub fn build_user_context(
    profile: Option<&PreferenceProfile>,
    signals: &[BehaviorSignal],
    favorite_ids: Vec<Uuid>,
) -> UserContext {
    let implicit_locations = top_by_count(
        signals.iter().filter_map(|s| s.snapshot.location.as_deref()),
        IMPLICIT_TOP_N,
    );
    let implicit_types = top_by_count(
        signals.iter().filter_map(|s| s.snapshot.property_type.as_deref()),
        IMPLICIT_TOP_N,
    );

    let explicit_locations = profile.map(|p| p.preferred_locations.as_slice()).unwrap_or(&[]);
    let explicit_types = profile.map(|p| p.preferred_property_types.as_slice()).unwrap_or(&[]);

    let preferred_locations = merge_unique(
        explicit_locations,
        implicit_locations.into_iter().map(|(value, _)| value),
    );
    let preferred_types = merge_unique(
        explicit_types,
        implicit_types.into_iter().map(|(value, _)| value),
    );

    let prices: Vec<f64> = signals.iter().filter_map(|s| s.snapshot.price).collect();
    let implicit_budget = percentile_bounds(&prices)
        .map(|(min, max)| BudgetRange::new(min, max))
        .unwrap_or_else(BudgetRange::unbounded);

    let budget_range = match profile {
        Some(p) if p.max_budget.map_or(false, f64::is_finite) => BudgetRange::new(
            p.min_budget.filter(|m| m.is_finite()).unwrap_or(0.0),
            p.max_budget.unwrap_or(f64::INFINITY),
        ),
        _ => implicit_budget,
    };

    UserContext {
        preferred_locations,
        preferred_types,
        budget_range,
        min_bedrooms: profile.and_then(|p| p.min_bedrooms),
        must_have_features: profile
            .map(|p| non_blank(&p.must_have_features))
            .unwrap_or_default(),
        favorite_ids,
    }
}

/// Explicit values first, then implicit ones, without duplicates or blanks
fn merge_unique<I>(explicit: &[String], implicit: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut merged: Vec<String> = Vec::new();
    for value in explicit.iter().cloned().chain(implicit) {
        if !value.trim().is_empty() && !merged.contains(&value) {
            merged.push(value);
        }
    }
    merged
}

fn non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertySnapshot;
    use chrono::Utc;

    fn view(location: &str, property_type: &str, price: f64) -> BehaviorSignal {
        BehaviorSignal {
            signal_type: "view".to_string(),
            snapshot: PropertySnapshot {
                location: Some(location.to_string()),
                property_type: Some(property_type.to_string()),
                price: Some(price),
            },
            dwell_time_seconds: Some(30.0),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_inputs_degrade_to_defaults() {
        let context = build_user_context(None, &[], vec![]);
        assert!(context.preferred_locations.is_empty());
        assert!(context.preferred_types.is_empty());
        assert_eq!(context.budget_range, BudgetRange::unbounded());
        assert_eq!(context.min_bedrooms, None);
    }

    #[test]
    fn test_implicit_top_three_locations() {
        let signals = vec![
            view("Austin", "house", 100.0),
            view("Denver", "house", 100.0),
            view("Austin", "condo", 100.0),
            view("Boise", "house", 100.0),
            view("Miami", "house", 100.0),
            view("Denver", "house", 100.0),
            view("Austin", "house", 100.0),
        ];
        let context = build_user_context(None, &signals, vec![]);
        assert_eq!(context.preferred_locations, vec!["Austin", "Denver", "Boise"]);
        assert_eq!(context.preferred_types, vec!["house", "condo"]);
    }

    #[test]
    fn test_explicit_preferences_come_first_without_duplicates() {
        let profile = PreferenceProfile {
            preferred_locations: vec!["Denver".to_string(), "Seattle".to_string()],
            ..Default::default()
        };
        let signals = vec![view("Austin", "house", 1.0), view("Denver", "house", 1.0)];
        let context = build_user_context(Some(&profile), &signals, vec![]);
        assert_eq!(context.preferred_locations, vec!["Denver", "Seattle", "Austin"]);
    }

    #[test]
    fn test_budget_falls_back_to_viewed_prices() {
        let profile = PreferenceProfile {
            min_budget: Some(50_000.0),
            max_budget: None,
            ..Default::default()
        };
        let signals: Vec<BehaviorSignal> = (1..=10)
            .map(|i| view("Austin", "house", i as f64 * 100.0))
            .collect();
        let context = build_user_context(Some(&profile), &signals, vec![]);
        assert_eq!(context.budget_range, BudgetRange::new(200.0, 1000.0));
    }

    #[test]
    fn test_explicit_budget_used_when_max_set() {
        let profile = PreferenceProfile {
            min_budget: None,
            max_budget: Some(400_000.0),
            ..Default::default()
        };
        let signals = vec![view("Austin", "house", 900_000.0)];
        let context = build_user_context(Some(&profile), &signals, vec![]);
        assert_eq!(context.budget_range, BudgetRange::new(0.0, 400_000.0));
    }

    #[test]
    fn test_favorites_threaded_through() {
        let favorite = Uuid::new_v4();
        let context = build_user_context(None, &[], vec![favorite]);
        assert_eq!(context.favorite_ids, vec![favorite]);
    }
}
