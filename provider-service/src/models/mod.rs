//! Domain models for provider-service.

mod provider;

pub use provider::{NewProvider, Provider, ProviderChanges, ProviderFilter, ProviderStats};
