use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service_core::status::StatusSummary;
use sqlx::FromRow;
use std::collections::BTreeMap;

/// Hotel or travel provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Provider {
    pub id: i64,
    pub hotel_code: Option<i32>,
    pub business_name: Option<String>,
    pub name: Option<String>,
    pub identification: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub provider_type: Option<i32>,
    pub status: i16,
    pub city_id: Option<i32>,
    pub dropbox_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProvider {
    pub hotel_code: Option<i32>,
    pub business_name: Option<String>,
    pub name: Option<String>,
    pub identification: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub provider_type: Option<i32>,
    pub status: i16,
    pub city_id: Option<i32>,
    pub dropbox_link: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProviderChanges {
    pub hotel_code: Option<i32>,
    pub business_name: Option<String>,
    pub name: Option<String>,
    pub identification: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub provider_type: Option<i32>,
    pub status: Option<i16>,
    pub city_id: Option<i32>,
    pub dropbox_link: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProviderFilter {
    pub search: Option<String>,
    pub status: Option<i16>,
    pub provider_type: Option<i32>,
    pub city_id: Option<i32>,
}

/// Status counts plus counts per provider type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderStats {
    #[serde(flatten)]
    pub status: StatusSummary,
    pub by_type: BTreeMap<String, i64>,
}
