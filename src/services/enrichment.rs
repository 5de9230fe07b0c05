//! AI explanations and insight cards layered on top of computed scores.
//!
//! Nothing here feeds back into scoring or ranking. Every gateway call
//! returns a `Result`; the `*_or_*` helpers absorb failures and substitute
//! the documented defaults.

use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;
use crate::models::{DiscoveryPatterns, Insight, PropertyMatch, UserContext};
use crate::services::gateway::{ChatMessage, GatewayClient, GatewayError, ToolSpec};

pub const FALLBACK_EXPLANATION: &str = "This property matches your search criteria and preferences.";

/// Insight cards requested per call
pub const INSIGHT_COUNT: usize = 3;

const ADVISOR_PROMPT: &str = "You are a friendly real estate advisor. Explain in one or two \
sentences why each property could suit the buyer, referring to their preferences. Be specific \
and avoid generic praise.";

const INSIGHTS_PROMPT: &str = "You are a real estate market analyst. From a buyer's browsing \
patterns, produce short, actionable insights about what they are looking for and what else \
they might consider.";

#[derive(Debug, Deserialize)]
struct ExplanationArgs {
    #[serde(default)]
    explanations: Vec<IndexedExplanation>,
}

#[derive(Debug, Deserialize)]
struct IndexedExplanation {
    property_index: usize,
    explanation: String,
}

#[derive(Debug, Deserialize)]
struct InsightArgs {
    #[serde(default)]
    insights: Vec<Insight>,
}

fn explanations_tool() -> ToolSpec {
    ToolSpec {
        name: "provide_explanations",
        description: "Provide a short explanation for each numbered property",
        parameters: json!({
            "type": "object",
            "properties": {
                "explanations": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "property_index": { "type": "integer", "description": "1-based property number" },
                            "explanation": { "type": "string" }
                        },
                        "required": ["property_index", "explanation"]
                    }
                }
            },
            "required": ["explanations"]
        }),
    }
}

fn insights_tool() -> ToolSpec {
    ToolSpec {
        name: "provide_insights",
        description: "Provide insight cards about the buyer's browsing patterns",
        parameters: json!({
            "type": "object",
            "properties": {
                "insights": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "description": { "type": "string" },
                            "suggestion": { "type": "string" }
                        },
                        "required": ["title", "description", "suggestion"]
                    }
                }
            },
            "required": ["insights"]
        }),
    }
}

/// One-paragraph summary of what the user is looking for
pub fn preference_summary(context: &UserContext) -> String {
    let or_any = |values: &[String]| {
        if values.is_empty() {
            "any".to_string()
        } else {
            values.join(", ")
        }
    };

    let budget = &context.budget_range;
    let budget_text = if budget.max.is_finite() {
        format!("{:.0} to {:.0}", budget.min, budget.max)
    } else if budget.min > 0.0 {
        format!("from {:.0}, no upper limit", budget.min)
    } else {
        "not specified".to_string()
    };

    let mut summary = format!(
        "Preferred locations: {}\nPreferred property types: {}\nBudget: {}",
        or_any(&context.preferred_locations),
        or_any(&context.preferred_types),
        budget_text,
    );
    if let Some(min) = context.min_bedrooms {
        summary.push_str(&format!("\nMinimum bedrooms: {}", min));
    }
    if !context.must_have_features.is_empty() {
        summary.push_str(&format!(
            "\nMust-have features: {}",
            context.must_have_features.join(", ")
        ));
    }
    summary
}

fn describe_property(index: usize, scored: &PropertyMatch) -> String {
    let property = &scored.property;
    let features = if property.features.is_empty() {
        "none listed".to_string()
    } else {
        property.features.join(", ")
    };

    format!(
        "{}. {} - {} in {}, price {:.0}, {} bed / {} bath, {:.0} sqm, features: {}. Match score {:.0}{}",
        index,
        property.title,
        property.property_type,
        property.display_location(),
        property.price,
        property.bedrooms,
        property.bathrooms,
        property.area,
        features,
        scored.overall_score,
        if scored.is_discovery_match { " (discovery pick)" } else { "" },
    )
}

/// Build the batched explanation prompt for the given matches
pub fn explanation_prompt(matches: &[PropertyMatch], context: &UserContext) -> String {
    let listings = matches
        .iter()
        .enumerate()
        .map(|(i, m)| describe_property(i + 1, m))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Buyer preferences:\n{}\n\nProperties:\n{}\n\nExplain why each property matches this buyer.",
        preference_summary(context),
        listings
    )
}

/// Ask the gateway for one explanation per match, keyed by property id
///
/// Indexes in the tool response are 1-based; unknown indexes are ignored.
pub async fn generate_batch_explanations(
    gateway: &GatewayClient,
    matches: &[PropertyMatch],
    context: &UserContext,
) -> Result<HashMap<Uuid, String>, GatewayError> {
    if matches.is_empty() {
        return Ok(HashMap::new());
    }

    let prompt = explanation_prompt(matches, context);
    tracing::debug!(properties = matches.len(), prompt_len = prompt.len(), "Requesting batch explanations");

    let messages = [ChatMessage::system(ADVISOR_PROMPT), ChatMessage::user(prompt)];
    let args = gateway.call_tool(&messages, &explanations_tool()).await?;
    let args: ExplanationArgs = serde_json::from_value(args)?;

    let explanations = args
        .explanations
        .into_iter()
        .filter_map(|item| {
            let slot = item.property_index.checked_sub(1)?;
            let scored = matches.get(slot)?;
            let text = item.explanation.trim();
            (!text.is_empty()).then(|| (scored.property_id, text.to_string()))
        })
        .collect();

    Ok(explanations)
}

/// Copy explanations onto matching recommendations; returns how many were set
pub fn apply_explanations(matches: &mut [PropertyMatch], explanations: &HashMap<Uuid, String>) -> usize {
    let mut applied = 0;
    for scored in matches.iter_mut() {
        if let Some(text) = explanations.get(&scored.property_id) {
            scored.ai_explanation = Some(text.clone());
            applied += 1;
        }
    }
    applied
}

/// Explain the top `count` recommendations, leaving them unexplained on failure
pub async fn enrich_recommendations(
    gateway: &GatewayClient,
    matches: &mut [PropertyMatch],
    context: &UserContext,
    count: usize,
) -> usize {
    let top = count.min(matches.len());

    let result = generate_batch_explanations(gateway, &matches[..top], context).await;
    match result {
        Ok(explanations) => apply_explanations(&mut matches[..top], &explanations),
        Err(e) => {
            tracing::warn!(error = %e, "Batch explanation failed, returning recommendations without explanations");
            0
        }
    }
}

/// Ask the gateway for a detailed explanation of a single match
pub async fn explain_match(
    gateway: &GatewayClient,
    scored: &PropertyMatch,
    context: &UserContext,
) -> Result<String, GatewayError> {
    let reasons = scored
        .match_reasons
        .iter()
        .map(|r| format!("- {} ({:.0}%): {}", r.factor.as_str(), r.score * 100.0, r.explanation))
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!(
        "Buyer preferences:\n{}\n\nProperty:\n{}\n\nScoring breakdown:\n{}\n\n\
         In three or four sentences, explain why this property is a good match for the buyer \
         and mention any trade-offs.",
        preference_summary(context),
        describe_property(1, scored),
        reasons
    );

    gateway
        .complete(&[ChatMessage::system(ADVISOR_PROMPT), ChatMessage::user(prompt)])
        .await
}

/// Single explanation, or the fallback text when the gateway fails
pub async fn explain_or_default(
    gateway: &GatewayClient,
    scored: &PropertyMatch,
    context: &UserContext,
) -> String {
    match explain_match(gateway, scored, context).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, property_id = %scored.property_id, "Explanation failed, using fallback");
            FALLBACK_EXPLANATION.to_string()
        }
    }
}

/// Build the insights prompt from the serialized patterns
pub fn insights_prompt(patterns: &DiscoveryPatterns) -> Result<String, GatewayError> {
    let patterns_json = serde_json::to_string_pretty(patterns)
        .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;

    Ok(format!(
        "Browsing patterns for a buyer:\n{}\n\nProvide exactly {} insights, each with a title, \
         a description of the pattern and a suggestion.",
        patterns_json, INSIGHT_COUNT
    ))
}

/// Ask the gateway for insight cards describing the browsing patterns
pub async fn generate_insights(
    gateway: &GatewayClient,
    patterns: &DiscoveryPatterns,
) -> Result<Vec<Insight>, GatewayError> {
    let prompt = insights_prompt(patterns)?;

    let messages = [ChatMessage::system(INSIGHTS_PROMPT), ChatMessage::user(prompt)];
    let args = gateway.call_tool(&messages, &insights_tool()).await?;
    let mut args: InsightArgs = serde_json::from_value(args)?;

    args.insights.truncate(INSIGHT_COUNT);
    Ok(args.insights)
}

/// Insight cards, or an empty list when the gateway fails
pub async fn insights_or_empty(gateway: &GatewayClient, patterns: &DiscoveryPatterns) -> Vec<Insight> {
    match generate_insights(gateway, patterns).await {
        Ok(insights) => insights,
        Err(e) => {
            tracing::warn!(error = %e, "Insight generation failed, returning patterns only");
            Vec::new()
        }
    }
}
