pub mod health;
pub mod providers;

pub use health::{health_check, metrics_handler, readiness_check, root};
