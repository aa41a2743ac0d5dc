use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

#[cfg(test)]
use mockall::automock;

use crate::error::{ResponseError, Result};
use crate::models::{GenerateRequest, GenerateResponse};

/// One request/response exchange with the generation endpoint, with HTTP
/// outcomes already classified. Retrying and timeouts live above this layer.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse>;
}

pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(req)
            .send()
            .await
            .map_err(|e| ResponseError::Network(format!("Failed to reach {}: {e}", self.endpoint)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ResponseError::Network(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });
            return Err(ResponseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_content(&body)
    }
}

/// Pull `content` out of a success body. Anything else is a contract violation.
fn parse_content(body: &str) -> Result<GenerateResponse> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ResponseError::MalformedResponse(format!("Body is not JSON: {e}")))?;

    match value.get("content") {
        Some(Value::String(content)) => Ok(GenerateResponse {
            content: content.clone(),
        }),
        Some(_) => Err(ResponseError::MalformedResponse(
            "Field `content` is not a string".to_string(),
        )),
        None => Err(ResponseError::MalformedResponse(
            "Missing field `content`".to_string(),
        )),
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
