//! Invoice item model for invoicing-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Line item belonging to exactly one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct InvoiceItem {
    pub id: i64,
    pub invoice_id: i64,
    pub description: String,
    pub unit: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub subtotal: Decimal,
    pub tax_rate: Option<Decimal>,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

/// Client input for a new item. Amounts left out are derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub description: String,
    pub unit: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub subtotal: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub total_amount: Option<Decimal>,
}

/// Partial update of an item; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub description: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub subtotal: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub total_amount: Option<Decimal>,
}

impl ItemChanges {
    /// True when any input of the amount calculation was supplied.
    pub fn touches_amounts(&self) -> bool {
        self.quantity.is_some()
            || self.unit_price.is_some()
            || self.subtotal.is_some()
            || self.tax_rate.is_some()
            || self.tax_amount.is_some()
    }
}

/// Fully resolved item ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub description: String,
    pub unit: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub subtotal: Decimal,
    pub tax_rate: Option<Decimal>,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}
