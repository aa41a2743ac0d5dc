//! Conversation state and the submit/retry state machine.
//!
//! `idle -> submitting -> idle`. Only one submission may be in flight; a
//! second `submit` while loading is refused with [`SubmitOutcome::Busy`],
//! which is the server-side equivalent of a disabled submit button.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::time::Instant;

use crate::error::{ErrorKind, ResponseError};
use crate::intent::{clean_question_text, detect_intent};
use crate::models::{Mode, Question, ResponseRecord};
use crate::service::ResponseService;

const EMPTY_QUESTION_MESSAGE: &str = "Please enter a question.";

/// The single failure the UI currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorState {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl ErrorState {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
            retryable: false,
        }
    }

    /// Validation errors render inline without a retry button.
    pub fn show_retry(&self) -> bool {
        self.retryable && self.kind != ErrorKind::Validation
    }
}

impl From<&ResponseError> for ErrorState {
    fn from(err: &ResponseError) -> Self {
        let message = match err {
            ResponseError::Validation(msg) => msg.clone(),
            ResponseError::Network(_) => {
                "Unable to reach the response service. Please check your connection and try again."
                    .to_string()
            }
            ResponseError::Timeout { .. } => {
                "The response took too long to arrive. Please try again.".to_string()
            }
            ResponseError::Api { status, .. } if *status >= 500 => {
                "The response service is having trouble right now. Please try again in a moment."
                    .to_string()
            }
            ResponseError::Api { status, .. } => {
                format!("The response service could not handle this request (HTTP {status}).")
            }
            ResponseError::MalformedResponse(_) => {
                "The response service sent back an unexpected reply.".to_string()
            }
        };

        Self {
            kind: err.kind(),
            message,
            retryable: err.is_retryable(),
        }
    }
}

/// The last submitted request, kept for one-click retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryContext {
    pub question: String,
    pub mode: Option<Mode>,
}

/// Read-only view consumed by the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerSnapshot {
    pub is_loading: bool,
    pub error: Option<String>,
    pub error_state: Option<ErrorState>,
    pub responses: Vec<ResponseRecord>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Answered(ResponseRecord),
    Failed(ErrorState),
    /// A submission is already in flight; nothing changed.
    Busy,
    /// `retry` was called before anything was submitted.
    NothingToRetry,
}

#[derive(Default)]
struct ControllerState {
    responses: Vec<ResponseRecord>,
    // questions[i] was answered by responses[i]
    questions: Vec<Question>,
    error: Option<ErrorState>,
    loading: bool,
    retry_context: Option<RetryContext>,
}

pub struct Controller {
    service: Arc<dyn ResponseService>,
    state: Mutex<ControllerState>,
}

/// Clears the loading flag if a submission is dropped before it completes.
struct InFlight<'a> {
    state: &'a Mutex<ControllerState>,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("Submission cancelled before completion");
            self.state.lock().loading = false;
        }
    }
}

impl Controller {
    pub fn new(service: Arc<dyn ResponseService>) -> Self {
        Self {
            service,
            state: Mutex::new(ControllerState::default()),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn error(&self) -> Option<ErrorState> {
        self.state.lock().error.clone()
    }

    pub fn responses(&self) -> Vec<ResponseRecord> {
        self.state.lock().responses.clone()
    }

    pub fn retry_context(&self) -> Option<RetryContext> {
        self.state.lock().retry_context.clone()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let state = self.state.lock();
        ControllerSnapshot {
            is_loading: state.loading,
            error: state.error.as_ref().map(|e| e.message.clone()),
            error_state: state.error.clone(),
            responses: state.responses.clone(),
            questions: state.questions.clone(),
        }
    }

    /// Banner dismissal. Leaves everything else untouched.
    pub fn dismiss_error(&self) {
        self.state.lock().error = None;
    }

    /// Submit a question. A phrase-detected mode takes precedence over
    /// `explicit_mode`, and in that case the phrase is stripped before the
    /// question is sent.
    pub async fn submit(&self, question: &str, explicit_mode: Option<Mode>) -> SubmitOutcome {
        let trimmed = question.trim();

        {
            let mut state = self.state.lock();
            if state.loading {
                tracing::debug!("Ignoring submission while another is in flight");
                return SubmitOutcome::Busy;
            }
            if trimmed.is_empty() {
                let error = ErrorState::validation(EMPTY_QUESTION_MESSAGE);
                state.error = Some(error.clone());
                return SubmitOutcome::Failed(error);
            }

            state.retry_context = Some(RetryContext {
                question: question.to_string(),
                mode: explicit_mode,
            });
            state.error = None;
            state.loading = true;
        }
        let guard = InFlight {
            state: &self.state,
            armed: true,
        };
        let started = Instant::now();

        let (text, mode) = resolve_mode(trimmed, explicit_mode);
        let asked = Question::new(trimmed, mode);
        tracing::info!(
            "Submitting question {} (mode: {})",
            asked.id,
            mode.map_or("normal", |m| m.as_str())
        );

        let result = self.service.generate_response(&text, mode).await;

        guard.disarm();
        let mut state = self.state.lock();
        state.loading = false;

        match result {
            Ok(content) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                let record = ResponseRecord::new(asked.id, content, mode, Some(elapsed_ms));
                tracing::info!("Question {} answered in {} ms", asked.id, elapsed_ms);
                state.questions.push(asked);
                state.responses.push(record.clone());
                state.error = None;
                SubmitOutcome::Answered(record)
            }
            Err(e) => {
                tracing::warn!("Question {} failed: {}", asked.id, e);
                let error = ErrorState::from(&e);
                state.error = Some(error.clone());
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Replay the last submitted request exactly.
    pub async fn retry(&self) -> SubmitOutcome {
        let Some(ctx) = self.retry_context() else {
            return SubmitOutcome::NothingToRetry;
        };
        tracing::info!("Retrying last question");
        self.submit(&ctx.question, ctx.mode).await
    }
}

/// Detected mode wins over the explicit one. If stripping the phrase leaves
/// nothing, the question is sent as typed.
fn resolve_mode(trimmed: &str, explicit_mode: Option<Mode>) -> (String, Option<Mode>) {
    match detect_intent(trimmed) {
        Some(detected) => {
            let cleaned = clean_question_text(trimmed, Some(detected));
            if cleaned.is_empty() {
                (trimmed.to_string(), Some(detected))
            } else {
                tracing::debug!("Detected {} intent, cleaned question: {}", detected, cleaned);
                (cleaned, Some(detected))
            }
        }
        None => (trimmed.to_string(), explicit_mode),
    }
}
