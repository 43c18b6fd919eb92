use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Settlement of a travel service sold under a reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Settlement {
    pub id: i64,
    pub reservation_id: Option<i32>,
    pub advisor_name: Option<String>,
    pub company_name: Option<String>,
    pub company_nit: Option<String>,
    pub company_address: Option<String>,
    pub company_phone: Option<String>,
    pub service: Option<String>,
    pub service_date: Option<NaiveDate>,
    pub service_includes: Option<String>,
    pub passenger_count: Option<i32>,
    pub settlement_value: Option<Decimal>,
    pub vat_rate: Option<i32>,
    pub vat_value: Option<Decimal>,
    pub total_with_vat: Option<Decimal>,
    pub passenger_name: Option<String>,
    pub settlement_date: Option<NaiveDate>,
    pub invoice_number: Option<i32>,
    pub status: i16,
    pub sales_channel: Option<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSettlement {
    pub reservation_id: Option<i32>,
    pub advisor_name: Option<String>,
    pub company_name: Option<String>,
    pub company_nit: Option<String>,
    pub company_address: Option<String>,
    pub company_phone: Option<String>,
    pub service: Option<String>,
    pub service_date: Option<NaiveDate>,
    pub service_includes: Option<String>,
    pub passenger_count: Option<i32>,
    pub settlement_value: Option<Decimal>,
    pub vat_rate: Option<i32>,
    pub vat_value: Option<Decimal>,
    pub total_with_vat: Option<Decimal>,
    pub passenger_name: Option<String>,
    pub settlement_date: Option<NaiveDate>,
    pub invoice_number: Option<i32>,
    pub status: i16,
    pub sales_channel: Option<String>,
    pub notes: String,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct SettlementChanges {
    pub reservation_id: Option<i32>,
    pub advisor_name: Option<String>,
    pub company_name: Option<String>,
    pub company_nit: Option<String>,
    pub company_address: Option<String>,
    pub company_phone: Option<String>,
    pub service: Option<String>,
    pub service_date: Option<NaiveDate>,
    pub service_includes: Option<String>,
    pub passenger_count: Option<i32>,
    pub settlement_value: Option<Decimal>,
    pub vat_rate: Option<i32>,
    pub vat_value: Option<Decimal>,
    pub total_with_vat: Option<Decimal>,
    pub passenger_name: Option<String>,
    pub settlement_date: Option<NaiveDate>,
    pub invoice_number: Option<i32>,
    pub status: Option<i16>,
    pub sales_channel: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SettlementFilter {
    pub search: Option<String>,
    pub status: Option<i16>,
    pub reservation_id: Option<i32>,
    pub invoice_number: Option<i32>,
}
