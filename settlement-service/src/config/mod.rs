//! Configuration module for settlement-service.

use service_core::config::{self as core_config, env_or, parse_list, DatabaseConfig};
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct SettlementConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub environment: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub allowed_origins: Vec<String>,
    pub run_migrations: bool,
}

impl SettlementConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "settlement-service".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            database: DatabaseConfig::from_env()?,
            allowed_origins: parse_list(
                &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
            run_migrations: env_or("RUN_MIGRATIONS", true),
        })
    }
}
