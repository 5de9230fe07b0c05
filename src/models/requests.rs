use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// Body of `POST /api/v1/recommendations`
///
/// ```json
/// {
///   "action": "get_ai_recommendations | explain_match | get_discovery_insights",
///   "userId": "uuid",
///   "limit": 10,
///   "propertyId": "uuid"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub action: String,
    #[serde(alias = "user_id", rename = "userId", default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub limit: Option<u16>,
    #[serde(alias = "property_id", rename = "propertyId", default)]
    pub property_id: Option<Uuid>,
}

/// Parameters for `get_ai_recommendations`
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct RecommendParams {
    pub user_id: Uuid,
    #[validate(range(min = 1, max = 50))]
    pub limit: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationAction {
    Recommend(RecommendParams),
    ExplainMatch { user_id: Uuid, property_id: Uuid },
    DiscoveryInsights { user_id: Uuid },
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Validation failed: {0}")]
    Invalid(#[from] ValidationErrors),
}

impl RecommendationAction {
    /// The user the action reads data for
    pub fn user_id(&self) -> Uuid {
        match self {
            RecommendationAction::Recommend(params) => params.user_id,
            RecommendationAction::ExplainMatch { user_id, .. } => *user_id,
            RecommendationAction::DiscoveryInsights { user_id } => *user_id,
        }
    }
}

impl RecommendationRequest {
    /// Resolve the action name into typed, validated parameters
    pub fn into_action(self, default_limit: u16) -> Result<RecommendationAction, RequestError> {
        let user_id = self.user_id.ok_or(RequestError::MissingField("userId"))?;

        match self.action.as_str() {
            "get_ai_recommendations" => {
                let params = RecommendParams {
                    user_id,
                    limit: self.limit.unwrap_or(default_limit),
                };
                params.validate()?;
                Ok(RecommendationAction::Recommend(params))
            }
            "explain_match" => {
                let property_id = self
                    .property_id
                    .ok_or(RequestError::MissingField("propertyId"))?;
                Ok(RecommendationAction::ExplainMatch {
                    user_id,
                    property_id,
                })
            }
            "get_discovery_insights" => Ok(RecommendationAction::DiscoveryInsights { user_id }),
            other => Err(RequestError::UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(action: &str) -> RecommendationRequest {
        RecommendationRequest {
            action: action.to_string(),
            user_id: Some(Uuid::nil()),
            limit: None,
            property_id: None,
        }
    }

    #[test]
    fn test_default_limit_applied() {
        let action = request("get_ai_recommendations").into_action(10).unwrap();
        assert_eq!(
            action,
            RecommendationAction::Recommend(RecommendParams {
                user_id: Uuid::nil(),
                limit: 10
            })
        );
    }

    #[test]
    fn test_limit_out_of_range_rejected() {
        let mut req = request("get_ai_recommendations");
        req.limit = Some(0);
        assert!(matches!(req.into_action(10), Err(RequestError::Invalid(_))));
    }

    #[test]
    fn test_explain_requires_property_id() {
        let err = request("explain_match").into_action(10).unwrap_err();
        assert!(matches!(err, RequestError::MissingField("propertyId")));
    }

    #[test]
    fn test_action_user_id() {
        let action = RecommendationAction::ExplainMatch {
            user_id: Uuid::from_u128(7),
            property_id: Uuid::from_u128(9),
        };
        assert_eq!(action.user_id(), Uuid::from_u128(7));
    }

    #[test]
    fn test_unknown_action() {
        let err = request("delete_everything").into_action(10).unwrap_err();
        assert_eq!(err.to_string(), "Unknown action: delete_everything");
    }

    #[test]
    fn test_camel_case_body() {
        let req: RecommendationRequest = serde_json::from_str(
            r#"{"action":"explain_match","userId":"00000000-0000-0000-0000-000000000000","propertyId":"00000000-0000-0000-0000-000000000001"}"#,
        )
        .unwrap();
        assert!(matches!(
            req.into_action(10),
            Ok(RecommendationAction::ExplainMatch { .. })
        ));
    }
}
