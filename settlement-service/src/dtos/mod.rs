pub mod settlements;

pub use settlements::{
    CreateSettlementRequest, SettlementListParams, SettlementListResponse,
    UpdateSettlementRequest,
};
