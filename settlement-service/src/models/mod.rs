//! Domain models for settlement-service.

mod settlement;

pub use settlement::{NewSettlement, Settlement, SettlementChanges, SettlementFilter};
