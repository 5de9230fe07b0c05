use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the AI gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Gateway returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Rate limited by gateway")]
    RateLimited,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Failed to build request: {0}")]
    InvalidRequest(String),

    #[error("Model did not call tool {0}")]
    MissingToolCall(String),

    #[error("Failed to parse tool arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),
}

/// Chat message sent to the model
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system", content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user", content: content.into() }
    }
}

/// Function tool the model is forced to call
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

/// Client for an OpenAI-compatible chat completion gateway
///
/// Each call is attempted once; the only timeout is the client timeout.
pub struct GatewayClient {
    endpoint: String,
    api_key: String,
    model: String,
    client: Client,
}

impl GatewayClient {
    /// Create a new gateway client
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key,
            model,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request a free-text completion and return the assistant content
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        let body = json!({
            "model": self.model,
            "messages": messages,
        });

        let completion = self.send(&body).await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| GatewayError::InvalidResponse("Empty completion content".into()))
    }

    /// Force a tool call and return its parsed JSON arguments
    pub async fn call_tool(
        &self,
        messages: &[ChatMessage],
        tool: &ToolSpec,
    ) -> Result<Value, GatewayError> {
        let body = json!({
            "model": self.model,
            "messages": messages,
            "tools": [{
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                }
            }],
            "tool_choice": { "type": "function", "function": { "name": tool.name } },
        });

        let completion = self.send(&body).await?;

        let call = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| {
                choice
                    .message
                    .tool_calls
                    .unwrap_or_default()
                    .into_iter()
                    .find(|call| call.function.name == tool.name)
            })
            .ok_or_else(|| GatewayError::MissingToolCall(tool.name.to_string()))?;

        Ok(serde_json::from_str(&call.function.arguments)?)
    }

    async fn send(&self, body: &Value) -> Result<ChatCompletion, GatewayError> {
        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));

        tracing::debug!(model = %self.model, "Calling AI gateway");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GatewayError::RateLimited);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(GatewayError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ChatCompletion>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}
