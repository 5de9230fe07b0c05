use crate::core::stats::{percentile_bounds, top_by_count};
use crate::models::{BehaviorSignal, DiscoveryPatterns, PatternCount, PriceRange};

pub const TOP_TYPES: usize = 3;
pub const TOP_LOCATIONS: usize = 5;

/// Summarize recent behavior signals into browsing patterns
pub fn summarize_patterns(signals: &[BehaviorSignal]) -> DiscoveryPatterns {
    let to_counts = |tally: Vec<(String, usize)>| {
        tally
            .into_iter()
            .map(|(value, count)| PatternCount { value, count })
            .collect::<Vec<_>>()
    };

    let top_property_types = to_counts(top_by_count(
        signals.iter().filter_map(|s| s.snapshot.property_type.as_deref()),
        TOP_TYPES,
    ));
    let top_locations = to_counts(top_by_count(
        signals.iter().filter_map(|s| s.snapshot.location.as_deref()),
        TOP_LOCATIONS,
    ));

    let prices: Vec<f64> = signals.iter().filter_map(|s| s.snapshot.price).collect();
    let price_range = percentile_bounds(&prices)
        .map(|(min, max)| PriceRange { min, max })
        .unwrap_or_default();

    // Signals without a dwell time count as zero
    let avg_dwell_time = if signals.is_empty() {
        0.0
    } else {
        signals
            .iter()
            .map(|s| s.dwell_time_seconds.unwrap_or(0.0))
            .sum::<f64>()
            / signals.len() as f64
    };

    DiscoveryPatterns {
        top_property_types,
        top_locations,
        price_range,
        avg_dwell_time,
        total_views: signals.iter().filter(|s| s.is_view()).count(),
    }
}
