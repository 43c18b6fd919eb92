//! Invoice model for invoicing-service.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Hotel invoice as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: String,
    pub cufe: String,
    pub provider_name: String,
    pub provider_nit: String,
    pub client_name: String,
    pub client_nit: String,
    pub client_address: Option<String>,
    pub client_email: Option<String>,
    pub issue_date: NaiveDateTime,
    pub authorization_date: Option<NaiveDateTime>,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub guest_name: Option<String>,
    pub cashier_id: Option<String>,
    pub reservation_number: Option<String>,
    pub total_amount: Decimal,
    pub payment_method: Option<String>,
    pub payment_terms: Option<String>,
    pub bank_account: Option<String>,
    pub additional_info: Option<String>,
    pub loaded_in_settlement: bool,
    pub paid: bool,
    pub reviewed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Descriptive fields of a new invoice. The total is decided by the caller.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub cufe: String,
    pub provider_name: String,
    pub provider_nit: String,
    pub client_name: String,
    pub client_nit: String,
    pub client_address: Option<String>,
    pub client_email: Option<String>,
    pub issue_date: NaiveDateTime,
    pub authorization_date: Option<NaiveDateTime>,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub guest_name: Option<String>,
    pub cashier_id: Option<String>,
    pub reservation_number: Option<String>,
    pub payment_method: Option<String>,
    pub payment_terms: Option<String>,
    pub bank_account: Option<String>,
    pub additional_info: Option<String>,
    pub loaded_in_settlement: bool,
    pub paid: bool,
    pub reviewed_by: Option<String>,
}

/// Partial update of an invoice; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct InvoiceChanges {
    pub invoice_number: Option<String>,
    pub cufe: Option<String>,
    pub provider_name: Option<String>,
    pub provider_nit: Option<String>,
    pub client_name: Option<String>,
    pub client_nit: Option<String>,
    pub client_address: Option<String>,
    pub client_email: Option<String>,
    pub issue_date: Option<NaiveDateTime>,
    pub authorization_date: Option<NaiveDateTime>,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub guest_name: Option<String>,
    pub cashier_id: Option<String>,
    pub reservation_number: Option<String>,
    pub total_amount: Option<Decimal>,
    pub payment_method: Option<String>,
    pub payment_terms: Option<String>,
    pub bank_account: Option<String>,
    pub additional_info: Option<String>,
    pub loaded_in_settlement: Option<bool>,
    pub paid: Option<bool>,
    pub reviewed_by: Option<String>,
}

/// Filters accepted by the invoice listing.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub search: Option<String>,
    pub paid: Option<bool>,
    pub loaded_in_settlement: Option<bool>,
    pub provider_nit: Option<String>,
    pub client_nit: Option<String>,
    pub reservation_number: Option<String>,
    pub issue_date_from: Option<NaiveDateTime>,
    pub issue_date_to: Option<NaiveDateTime>,
}

/// Aggregate counters over all invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct InvoiceStats {
    pub total: i64,
    pub paid: i64,
    pub unpaid: i64,
    pub loaded_in_settlement: i64,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub unpaid_amount: Decimal,
}
