// AI gateway and enrichment tests against a mock OpenAI-compatible server

use mockito::{Matcher, Server};
use property_recs::core::{score_property, summarize_patterns};
use property_recs::models::{
    DiscoveryPatterns, PropertyCandidate, PropertyMatch, ScoringWeights, UserContext,
};
use property_recs::services::enrichment::{
    enrich_recommendations, explain_or_default, generate_batch_explanations, insights_or_empty,
    FALLBACK_EXPLANATION,
};
use property_recs::services::{GatewayClient, GatewayError};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

fn create_gateway(url: &str) -> GatewayClient {
    GatewayClient::new(
        url.to_string(),
        "test_key".to_string(),
        "test-model".to_string(),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn create_match(n: u128) -> PropertyMatch {
    let property = PropertyCandidate {
        id: Uuid::from_u128(n),
        title: format!("Townhouse {}", n),
        price: 420_000.0,
        bedrooms: 3,
        bathrooms: 2,
        area: 120.0,
        property_type: "townhouse".to_string(),
        listing_type: "sale".to_string(),
        city: Some("Austin".to_string()),
        state: Some("TX".to_string()),
        location: "Austin, TX".to_string(),
        features: vec!["Garden".to_string()],
        amenities: vec![],
        images: vec![],
        views_count: 12,
    };
    score_property(&property, &UserContext::default(), &ScoringWeights::default())
}

fn tool_call_body(name: &str, arguments: serde_json::Value) -> String {
    json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": name, "arguments": arguments.to_string() }
                }]
            }
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_batch_explanations_are_applied() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test_key")
        .match_body(Matcher::PartialJson(json!({
            "model": "test-model",
            "tool_choice": { "function": { "name": "provide_explanations" } }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tool_call_body(
            "provide_explanations",
            json!({
                "explanations": [
                    { "property_index": 1, "explanation": "Right in Austin with a garden." },
                    { "property_index": 2, "explanation": "Plenty of space for the price." },
                    { "property_index": 9, "explanation": "Out of range index." }
                ]
            }),
        ))
        .create_async()
        .await;

    let gateway = create_gateway(&server.url());
    let mut matches = vec![create_match(1), create_match(2), create_match(3)];

    let explained =
        enrich_recommendations(&gateway, &mut matches, &UserContext::default(), 5).await;

    mock.assert_async().await;
    assert_eq!(explained, 2);
    assert_eq!(
        matches[0].ai_explanation.as_deref(),
        Some("Right in Austin with a garden.")
    );
    assert_eq!(
        matches[1].ai_explanation.as_deref(),
        Some("Plenty of space for the price.")
    );
    assert_eq!(matches[2].ai_explanation, None);
}

#[tokio::test]
async fn test_only_top_matches_are_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("Townhouse 1".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tool_call_body(
            "provide_explanations",
            json!({ "explanations": [{ "property_index": 1, "explanation": "Top pick." }] }),
        ))
        .create_async()
        .await;

    let gateway = create_gateway(&server.url());
    let mut matches = vec![create_match(1), create_match(2)];

    let explained =
        enrich_recommendations(&gateway, &mut matches, &UserContext::default(), 1).await;

    mock.assert_async().await;
    assert_eq!(explained, 1);
    assert_eq!(matches[1].ai_explanation, None);
}

#[tokio::test]
async fn test_gateway_failure_leaves_recommendations_unexplained() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let gateway = create_gateway(&server.url());
    let mut matches = vec![create_match(1), create_match(2)];
    let before: Vec<f64> = matches.iter().map(|m| m.overall_score).collect();

    let explained =
        enrich_recommendations(&gateway, &mut matches, &UserContext::default(), 5).await;

    mock.assert_async().await;
    assert_eq!(explained, 0);
    assert!(matches.iter().all(|m| m.ai_explanation.is_none()));
    let after: Vec<f64> = matches.iter().map(|m| m.overall_score).collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_api_error_carries_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(402)
        .with_body("payment required")
        .create_async()
        .await;

    let gateway = create_gateway(&server.url());
    let err = generate_batch_explanations(&gateway, &[create_match(1)], &UserContext::default())
        .await
        .unwrap_err();

    match err {
        GatewayError::ApiError { status, body } => {
            assert_eq!(status, 402);
            assert_eq!(body, "payment required");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_rate_limit_is_reported() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .create();

    let gateway = create_gateway(&server.url());
    let result = tokio_test::block_on(generate_batch_explanations(
        &gateway,
        &[create_match(1)],
        &UserContext::default(),
    ));

    let err = tokio_test::assert_err!(result);
    assert!(matches!(err, GatewayError::RateLimited));
}

#[tokio::test]
async fn test_malformed_tool_arguments() {
    let mut server = Server::new_async().await;
    let body = json!({
        "choices": [{
            "message": {
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": "provide_explanations", "arguments": "{not json" }
                }]
            }
        }]
    });
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let gateway = create_gateway(&server.url());
    let mut matches = vec![create_match(1)];

    let err = generate_batch_explanations(&gateway, &matches, &UserContext::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::InvalidArguments(_)));

    let explained =
        enrich_recommendations(&gateway, &mut matches, &UserContext::default(), 5).await;
    assert_eq!(explained, 0);
    assert!(matches[0].ai_explanation.is_none());
}

#[tokio::test]
async fn test_missing_tool_call() {
    let mut server = Server::new_async().await;
    let body = json!({
        "choices": [{ "message": { "content": "I would rather chat.", "tool_calls": null } }]
    });
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let gateway = create_gateway(&server.url());
    let err = generate_batch_explanations(&gateway, &[create_match(1)], &UserContext::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::MissingToolCall(_)));
}

#[tokio::test]
async fn test_empty_matches_skip_gateway() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let gateway = create_gateway(&server.url());
    let explanations = generate_batch_explanations(&gateway, &[], &UserContext::default())
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(explanations.is_empty());
}

#[tokio::test]
async fn test_single_explanation() {
    let mut server = Server::new_async().await;
    let body = json!({
        "choices": [{
            "message": { "content": "  A quiet street close to good schools.  " }
        }]
    });
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let gateway = create_gateway(&server.url());
    let explanation = explain_or_default(&gateway, &create_match(1), &UserContext::default()).await;

    assert_eq!(explanation, "A quiet street close to good schools.");
}

#[tokio::test]
async fn test_single_explanation_falls_back() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .create_async()
        .await;

    let gateway = create_gateway(&server.url());
    let explanation = explain_or_default(&gateway, &create_match(1), &UserContext::default()).await;

    assert_eq!(explanation, FALLBACK_EXPLANATION);
}

#[tokio::test]
async fn test_insights_are_truncated_to_three() {
    let mut server = Server::new_async().await;
    let cards: Vec<_> = (1..=4)
        .map(|i| {
            json!({
                "title": format!("Insight {}", i),
                "description": "You keep coming back to condos.",
                "suggestion": "Look at townhouses nearby."
            })
        })
        .collect();
    let _mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("provide_insights".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tool_call_body("provide_insights", json!({ "insights": cards })))
        .create_async()
        .await;

    let gateway = create_gateway(&server.url());
    let insights = insights_or_empty(&gateway, &summarize_patterns(&[])).await;

    assert_eq!(insights.len(), 3);
    assert_eq!(insights[0].title, "Insight 1");
    assert_eq!(insights[2].suggestion, "Look at townhouses nearby.");
}

#[tokio::test]
async fn test_insights_empty_on_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .create_async()
        .await;

    let gateway = create_gateway(&server.url());
    let insights = insights_or_empty(&gateway, &DiscoveryPatterns::default()).await;

    assert!(insights.is_empty());
}
