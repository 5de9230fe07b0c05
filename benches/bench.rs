// Criterion benchmarks for the recommendation pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use chrono::Utc;
use property_recs::core::{build_user_context, interleave, score_property, summarize_patterns, Recommender};
use property_recs::models::{
    BehaviorSignal, BudgetRange, PropertyCandidate, PropertySnapshot, ScoringWeights, UserContext,
};
use uuid::Uuid;

const CITIES: [&str; 5] = ["Lisbon", "Porto", "Braga", "Faro", "Coimbra"];
const TYPES: [&str; 4] = ["apartment", "house", "villa", "studio"];

fn create_candidate(id: usize) -> PropertyCandidate {
    let city = CITIES[id % CITIES.len()];
    PropertyCandidate {
        id: Uuid::from_u128(id as u128),
        title: format!("Listing {}", id),
        price: 150_000.0 + (id % 40) as f64 * 25_000.0,
        bedrooms: 1 + (id % 5) as i32,
        bathrooms: 1 + (id % 3) as i32,
        area: 60.0 + (id % 100) as f64,
        property_type: TYPES[id % TYPES.len()].to_string(),
        listing_type: "sale".to_string(),
        city: Some(city.to_string()),
        state: None,
        location: city.to_string(),
        features: if id % 3 == 0 {
            vec!["Pool".to_string(), "Parking".to_string()]
        } else {
            vec!["Parking".to_string()]
        },
        amenities: vec![],
        images: vec![],
        views_count: (id * 37 % 800) as i64,
    }
}

fn create_context() -> UserContext {
    UserContext {
        preferred_locations: vec!["Lisbon".to_string(), "Porto".to_string()],
        preferred_types: vec!["apartment".to_string()],
        budget_range: BudgetRange::new(300_000.0, 700_000.0),
        min_bedrooms: Some(2),
        must_have_features: vec!["parking".to_string()],
        favorite_ids: vec![],
    }
}

fn create_signals(n: usize) -> Vec<BehaviorSignal> {
    (0..n)
        .map(|i| BehaviorSignal {
            signal_type: "view".to_string(),
            snapshot: PropertySnapshot {
                location: Some(CITIES[i % CITIES.len()].to_string()),
                property_type: Some(TYPES[i % TYPES.len()].to_string()),
                price: Some(200_000.0 + (i % 20) as f64 * 20_000.0),
            },
            dwell_time_seconds: Some((i % 90) as f64),
            created_at: Utc::now(),
        })
        .collect()
}

fn bench_score_property(c: &mut Criterion) {
    let context = create_context();
    let weights = ScoringWeights::default();
    let property = create_candidate(7);

    c.bench_function("score_property", |b| {
        b.iter(|| score_property(black_box(&property), black_box(&context), black_box(&weights)));
    });
}

fn bench_build_context(c: &mut Criterion) {
    let signals = create_signals(50);

    c.bench_function("build_user_context_50_signals", |b| {
        b.iter(|| build_user_context(None, black_box(&signals), vec![]));
    });
}

fn bench_recommend(c: &mut Criterion) {
    let recommender = Recommender::with_default_weights();
    let context = create_context();

    let mut group = c.benchmark_group("recommend");

    for candidate_count in [10, 50, 100, 500, 1000].iter() {
        let candidates: Vec<PropertyCandidate> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("recommend", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    recommender.recommend(
                        black_box(&context),
                        black_box(candidates.clone()),
                        black_box(10),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_interleave(c: &mut Criterion) {
    c.bench_function("interleave_40_10", |b| {
        b.iter(|| {
            let preference: Vec<usize> = (0..40).collect();
            let discovery: Vec<usize> = (100..110).collect();
            interleave(black_box(preference), black_box(discovery))
        });
    });
}

fn bench_patterns(c: &mut Criterion) {
    let signals = create_signals(100);

    c.bench_function("summarize_patterns_100_signals", |b| {
        b.iter(|| summarize_patterns(black_box(&signals)));
    });
}

criterion_group!(
    benches,
    bench_score_property,
    bench_build_context,
    bench_recommend,
    bench_interleave,
    bench_patterns
);

criterion_main!(benches);
