pub mod health;
pub mod settlements;

pub use health::{health_check, metrics_handler, readiness_check, root};
