//! Services module for invoicing-service.

pub mod database;
pub mod engine;
pub mod metrics;
pub mod totals;
pub mod unit_of_work;

pub use database::Database;
pub use engine::InvoiceUnitOfWork;
pub use metrics::{get_metrics, init_metrics};
pub use unit_of_work::PgUnitOfWork;
