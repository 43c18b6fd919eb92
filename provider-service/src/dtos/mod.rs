pub mod providers;

pub use providers::{
    CreateProviderRequest, ProviderListParams, ProviderListResponse, UpdateProviderRequest,
};
