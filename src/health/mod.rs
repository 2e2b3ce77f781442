pub mod handlers;
pub mod state;

pub use state::{HealthState, ReadinessResponse};
