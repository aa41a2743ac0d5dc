use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use crate::config::BackendConfig;
use crate::error::{ResponseError, Result};
use crate::models::{GenerateRequest, Mode};
use crate::retry::{RetryPolicy, with_timeout};
use crate::transport::{HttpTransport, Transport};

pub const DEFAULT_MAX_QUESTION_LENGTH: usize = 5000;

/// Turns a question (plus optional response style) into response text.
///
/// Implementations are interchangeable: the controller only ever sees this
/// trait, so the live backend and the offline simulator can be swapped at
/// startup.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ResponseService: Send + Sync {
    async fn generate_response(&self, question: &str, mode: Option<Mode>) -> Result<String>;
}

/// Reject blank or oversized questions before any network work happens.
pub fn validate_question(question: &str, max_length: usize) -> Result<()> {
    if question.trim().is_empty() {
        return Err(ResponseError::Validation(
            "Please enter a question.".to_string(),
        ));
    }

    let length = question.chars().count();
    if length > max_length {
        return Err(ResponseError::Validation(format!(
            "Question is too long ({length} characters). Please keep it under {max_length} characters."
        )));
    }

    Ok(())
}

/// Build the backend prompt: the trimmed question, prefixed with the
/// instruction for the requested response style.
pub fn format_prompt(question: &str, mode: Option<Mode>) -> String {
    let question = question.trim();
    match mode {
        Some(Mode::Simplify) => format!(
            "Please explain this in simple terms that a 12-year-old could understand: {question}"
        ),
        Some(Mode::Summarize) => {
            format!("Please provide a brief, clear summary of the following: {question}")
        }
        Some(Mode::Quiz) => format!(
            "Please create a short quiz with 3 questions and their answers to help a student study this topic: {question}"
        ),
        None => question.to_string(),
    }
}

/// Live implementation: validates, formats, then calls the generation
/// endpoint under a per-attempt timeout with exponential backoff retries.
pub struct BackendService {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    request_timeout: Duration,
    max_question_length: usize,
}

impl BackendService {
    pub fn new(
        transport: Arc<dyn Transport>,
        retry: RetryPolicy,
        request_timeout: Duration,
        max_question_length: usize,
    ) -> Self {
        Self {
            transport,
            retry,
            request_timeout,
            max_question_length,
        }
    }

    pub fn from_config(cfg: &BackendConfig) -> Self {
        let transport = Arc::new(HttpTransport::new(cfg.endpoint.clone()));
        Self::new(
            transport as Arc<dyn Transport>,
            cfg.retry_policy(),
            cfg.request_timeout(),
            cfg.max_question_length,
        )
    }
}

#[async_trait]
impl ResponseService for BackendService {
    async fn generate_response(&self, question: &str, mode: Option<Mode>) -> Result<String> {
        validate_question(question, self.max_question_length)?;

        let prompt = format_prompt(question, mode);
        tracing::info!(
            "Generating response (mode: {}) for question: {}",
            mode.map_or("normal", |m| m.as_str()),
            question.trim()
        );
        tracing::debug!("Formatted prompt: {}", prompt);

        let timeout = self.request_timeout;
        let response = self
            .retry
            .run(|attempt| {
                let transport = Arc::clone(&self.transport);
                let request = GenerateRequest::new(prompt.clone());
                tracing::debug!("Sending attempt {}", attempt);
                async move { with_timeout(timeout, transport.generate(&request)).await }
            })
            .await?;

        Ok(response.content)
    }
}
