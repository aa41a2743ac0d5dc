pub mod config;
pub mod controller;
pub mod error;
pub mod intent;
pub mod models;
pub mod retry;
pub mod service;
pub mod simulated;
pub mod transport;
pub mod web;

use std::sync::Arc;

use crate::config::Config;
use crate::service::{BackendService, ResponseService};
use crate::simulated::SimulatedService;

/// Pick the response service for this process. Decided once at startup.
pub fn build_response_service(cfg: &Config) -> Arc<dyn ResponseService> {
    if cfg.simulated.enabled {
        tracing::info!("Using simulated response service (offline mode)");
        Arc::new(SimulatedService::from_config(
            &cfg.simulated,
            cfg.backend.max_question_length,
        ))
    } else {
        tracing::info!("Using backend response service at {}", cfg.backend.endpoint);
        Arc::new(BackendService::from_config(&cfg.backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Controller, SubmitOutcome};

    #[tokio::test(start_paused = true)]
    async fn test_simulated_service_is_invisible_to_controller() {
        let mut cfg = Config::default();
        cfg.simulated.enabled = true;
        let controller = Controller::new(build_response_service(&cfg));

        let outcome = controller.submit("explain like I'm 5: volcanoes", None).await;

        let SubmitOutcome::Answered(record) = outcome else {
            panic!("expected an answer, got {outcome:?}");
        };
        assert_eq!(record.mode, Some(crate::models::Mode::Simplify));
        assert!(record.content.contains("volcanoes"));
        assert!(record.processing_time_ms.unwrap_or_default() >= 500);
    }
}
