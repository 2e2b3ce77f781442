use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Readiness report returned by `/health/ready`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// `ready` or `starting`
    pub status: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Shared readiness flag, flipped once the listener is bound
#[derive(Debug, Clone)]
pub struct HealthState {
    ready: Arc<AtomicBool>,
    startup_time: Instant,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(false)),
            startup_time: Instant::now(),
        }
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
        info!("API service marked as ready");
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn report(&self) -> ReadinessResponse {
        ReadinessResponse {
            status: if self.is_ready() { "ready" } else { "starting" }.to_string(),
            uptime_seconds: self.startup_time.elapsed().as_secs(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}
