use axum::{
    extract::State,
    response::{Json, Response},
};
use tracing::debug;

use super::{HealthState, ReadinessResponse};
use crate::error::AppError;

/// Liveness probe at /health: the process is up, whether or not it is ready.
pub async fn liveness_handler() -> Response<String> {
    debug!("Liveness check requested");

    Response::new("OK".to_string())
}

/// Readiness probe at /health/ready: 200 with a JSON report once the
/// listener is bound, 503 before that.
pub async fn readiness_handler(
    State(health): State<HealthState>,
) -> Result<Json<ReadinessResponse>, AppError> {
    debug!("Readiness check requested");

    if health.is_ready() {
        Ok(Json(health.report()))
    } else {
        Err(AppError::ServiceUnavailable("server is starting".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use tracing_test::traced_test;

    #[tokio::test]
    async fn test_liveness_handler() {
        let response = liveness_handler().await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), "OK");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_probes_are_logged_at_debug() {
        liveness_handler().await;
        let _ = readiness_handler(State(HealthState::new())).await;

        assert!(logs_contain("Liveness check requested"));
        assert!(logs_contain("Readiness check requested"));
    }

    #[tokio::test]
    async fn test_readiness_handler_ready() {
        let health = HealthState::new();
        health.mark_ready();

        let Json(report) = readiness_handler(State(health)).await.unwrap();
        assert_eq!(report.status, "ready");
    }

    #[tokio::test]
    async fn test_readiness_handler_starting() {
        let health = HealthState::new();

        let err = readiness_handler(State(health)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
