use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::controller::{Controller, SubmitOutcome};
use crate::models::Mode;

#[derive(Debug, Deserialize)]
pub struct AskParams {
    pub question: String,
    #[serde(default)]
    pub mode: Option<Mode>,
}

/// JSON surface for the browser UI.
pub fn router(controller: Arc<Controller>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/state", get(state))
        .route("/api/ask", post(ask))
        .route("/api/retry", post(retry))
        .route("/api/error", delete(dismiss_error))
        .with_state(controller)
}

async fn state(State(controller): State<Arc<Controller>>) -> Response {
    Json(controller.snapshot()).into_response()
}

async fn ask(
    State(controller): State<Arc<Controller>>,
    Json(params): Json<AskParams>,
) -> Response {
    let outcome = controller.submit(&params.question, params.mode).await;
    respond(&controller, outcome)
}

async fn retry(State(controller): State<Arc<Controller>>) -> Response {
    let outcome = controller.retry().await;
    respond(&controller, outcome)
}

async fn dismiss_error(State(controller): State<Arc<Controller>>) -> Response {
    controller.dismiss_error();
    Json(controller.snapshot()).into_response()
}

// Classified failures are part of the state, not HTTP errors.
fn respond(controller: &Controller, outcome: SubmitOutcome) -> Response {
    let status = match outcome {
        SubmitOutcome::Busy => StatusCode::CONFLICT,
        SubmitOutcome::Answered(_) | SubmitOutcome::Failed(_) | SubmitOutcome::NothingToRetry => {
            StatusCode::OK
        }
    };
    (status, Json(controller.snapshot())).into_response()
}
