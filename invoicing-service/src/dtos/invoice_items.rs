use crate::models::{InvoiceItem, ItemChanges, ItemDraft};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Item supplied on its own or nested in an invoice create.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInvoiceItemRequest {
    #[validate(length(min = 1, max = 500, message = "Description is required"))]
    pub description: String,
    #[validate(length(max = 50))]
    pub unit: Option<String>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub quantity: Option<Decimal>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub unit_price: Option<Decimal>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub subtotal: Option<Decimal>,
    #[validate(custom(function = "service_core::validation::percentage"))]
    pub tax_rate: Option<Decimal>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub tax_amount: Option<Decimal>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub total_amount: Option<Decimal>,
}

impl From<CreateInvoiceItemRequest> for ItemDraft {
    fn from(req: CreateInvoiceItemRequest) -> Self {
        Self {
            description: req.description,
            unit: req.unit,
            quantity: req.quantity,
            unit_price: req.unit_price,
            subtotal: req.subtotal,
            tax_rate: req.tax_rate,
            tax_amount: req.tax_amount,
            total_amount: req.total_amount,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInvoiceItemRequest {
    #[validate(length(min = 1, max = 500))]
    pub description: Option<String>,
    #[validate(length(max = 50))]
    pub unit: Option<String>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub quantity: Option<Decimal>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub unit_price: Option<Decimal>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub subtotal: Option<Decimal>,
    #[validate(custom(function = "service_core::validation::percentage"))]
    pub tax_rate: Option<Decimal>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub tax_amount: Option<Decimal>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub total_amount: Option<Decimal>,
}

impl From<UpdateInvoiceItemRequest> for ItemChanges {
    fn from(req: UpdateInvoiceItemRequest) -> Self {
        Self {
            description: req.description,
            unit: req.unit,
            quantity: req.quantity,
            unit_price: req.unit_price,
            subtotal: req.subtotal,
            tax_rate: req.tax_rate,
            tax_amount: req.tax_amount,
            total_amount: req.total_amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceItemListResponse {
    pub items: Vec<InvoiceItem>,
    pub total: usize,
    pub invoice_id: i64,
}
