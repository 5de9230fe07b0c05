use actix_web::{http::header, http::Method, web, HttpRequest, HttpResponse};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use crate::config::RecommendationSettings;
use crate::core::{build_user_context, summarize_patterns, Recommender};
use crate::models::{
    DiscoveryInsightsResponse, ExplainMatchResponse, ExplainedProperty, HealthResponse,
    RecommendParams, RecommendationAction, RecommendationMeta, RecommendationRequest,
    RecommendationsResponse, UserContext, UserInsights,
};
use crate::routes::error::ApiError;
use crate::services::enrichment::{enrich_recommendations, explain_or_default, insights_or_empty};
use crate::services::{Claims, GatewayClient, ListingStore, StoreError, TokenVerifier};

/// Token role allowed to act on behalf of any user
pub const SERVICE_ROLE: &str = "service_role";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ListingStore>,
    pub gateway: Arc<GatewayClient>,
    pub verifier: Arc<TokenVerifier>,
    pub recommender: Recommender,
    pub settings: Arc<RecommendationSettings>,
}

/// Configure all recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::resource("/recommendations")
            .route(web::post().to(handle_action))
            .route(web::method(Method::OPTIONS).to(preflight)),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let db_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// CORS preflight
async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Recommendation endpoint
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// {
///   "action": "get_ai_recommendations",
///   "userId": "uuid",
///   "limit": 10
/// }
/// ```
///
/// The bearer token is checked before the body is parsed, so unauthenticated
/// callers always get a 401. The body's `userId` must be the token subject
/// unless the token carries the service role.
async fn handle_action(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let auth_header = http_req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let claims = state.verifier.verify_header(auth_header).map_err(|e| {
        tracing::info!(error = %e, path = %http_req.path(), "Rejected unauthenticated request");
        ApiError::from(e)
    })?;

    let request: RecommendationRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON: {}", e)))?;

    let action = request.into_action(state.settings.default_limit)?;
    authorize_subject(&claims, action.user_id())?;

    tracing::debug!(subject = %claims.sub, ?action, "Handling recommendation action");

    match action {
        RecommendationAction::Recommend(params) => get_ai_recommendations(&state, params).await,
        RecommendationAction::ExplainMatch {
            user_id,
            property_id,
        } => explain_match(&state, user_id, property_id).await,
        RecommendationAction::DiscoveryInsights { user_id } => {
            get_discovery_insights(&state, user_id).await
        }
    }
}

async fn get_ai_recommendations(
    state: &AppState,
    params: RecommendParams,
) -> Result<HttpResponse, ApiError> {
    let user_id = params.user_id;
    let limit = params.limit.min(state.settings.max_limit) as usize;

    tracing::info!(%user_id, limit, "Building recommendations");

    let context = load_user_context(state, user_id).await?;

    let candidates = state
        .store
        .get_active_properties(state.settings.candidate_limit)
        .await
        .map_err(|e| {
            tracing::error!(%user_id, error = %e, "Failed to fetch candidate listings");
            e
        })?;

    let mut result = state.recommender.recommend(&context, candidates, limit);

    let explained = enrich_recommendations(
        &state.gateway,
        &mut result.recommendations,
        &context,
        state.settings.explained_count,
    )
    .await;

    tracing::info!(
        %user_id,
        returned = result.recommendations.len(),
        candidates = result.total_candidates,
        discovery = result.discovery_matches,
        explained,
        "Returning recommendations"
    );

    let UserContext {
        preferred_locations,
        preferred_types,
        budget_range,
        ..
    } = context;

    Ok(HttpResponse::Ok().json(RecommendationsResponse {
        success: true,
        recommendations: result.recommendations,
        user_insights: UserInsights {
            preferred_locations,
            budget_range,
            top_property_types: preferred_types,
        },
        meta: RecommendationMeta {
            total_candidates: result.total_candidates,
            preference_matches: result.preference_matches,
            discovery_matches: result.discovery_matches,
        },
    }))
}

async fn explain_match(
    state: &AppState,
    user_id: Uuid,
    property_id: Uuid,
) -> Result<HttpResponse, ApiError> {
    tracing::info!(%user_id, %property_id, "Explaining match");

    let context = load_user_context(state, user_id).await?;

    let property = state
        .store
        .get_property(property_id)
        .await
        .map_err(|e| {
            tracing::error!(%property_id, error = %e, "Failed to fetch property");
            e
        })?
        .ok_or_else(|| ApiError::NotFound(format!("Property not found: {}", property_id)))?;

    let scored = state.recommender.score(&property, &context);
    let explanation = explain_or_default(&state.gateway, &scored, &context).await;

    Ok(HttpResponse::Ok().json(ExplainMatchResponse {
        success: true,
        property: ExplainedProperty {
            id: property.id,
            title: property.title.clone(),
            price: property.price,
            location: property.display_location(),
        },
        match_score: scored.overall_score,
        is_discovery_match: scored.is_discovery_match,
        explanation,
        match_breakdown: scored.match_reasons,
    }))
}

async fn get_discovery_insights(state: &AppState, user_id: Uuid) -> Result<HttpResponse, ApiError> {
    tracing::info!(%user_id, "Summarizing discovery insights");

    let signals = state
        .store
        .get_recent_signals(user_id, state.settings.insight_signal_limit)
        .await
        .map_err(|e| {
            tracing::error!(%user_id, error = %e, "Failed to fetch behavior signals");
            e
        })?;

    let patterns = summarize_patterns(&signals);
    let insights = insights_or_empty(&state.gateway, &patterns).await;

    Ok(HttpResponse::Ok().json(DiscoveryInsightsResponse {
        success: true,
        patterns,
        insights,
    }))
}

/// Reject requests about a user other than the token subject
fn authorize_subject(claims: &Claims, user_id: Uuid) -> Result<(), ApiError> {
    if claims.role.as_deref() == Some(SERVICE_ROLE) {
        return Ok(());
    }

    match Uuid::parse_str(&claims.sub) {
        Ok(subject) if subject == user_id => Ok(()),
        _ => {
            tracing::info!(subject = %claims.sub, %user_id, "Rejected request for another user");
            Err(ApiError::Forbidden)
        }
    }
}

/// Run the three independent context reads concurrently and merge them
async fn load_user_context(state: &AppState, user_id: Uuid) -> Result<UserContext, StoreError> {
    let since = Utc::now() - chrono::Duration::days(state.settings.signal_window_days);

    let (profile, views, favorites) = tokio::try_join!(
        state.store.get_preference_profile(user_id),
        state
            .store
            .get_recent_views(user_id, since, state.settings.signal_limit),
        state
            .store
            .get_favorite_ids(user_id, state.settings.favorite_limit),
    )
    .map_err(|e| {
        tracing::error!(%user_id, error = %e, "Failed to load user context");
        e
    })?;

    Ok(build_user_context(profile.as_ref(), &views, favorites))
}
