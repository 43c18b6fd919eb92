use crate::dtos::invoice_items::CreateInvoiceItemRequest;
use crate::models::{Invoice, InvoiceChanges, InvoiceFilter, InvoiceItem, NewInvoice};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Descriptive invoice fields shared by both create requests.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvoiceFields {
    #[validate(length(min = 1, max = 255, message = "Invoice number is required"))]
    pub invoice_number: String,
    #[validate(length(min = 1, max = 255, message = "CUFE is required"))]
    pub cufe: String,
    #[validate(length(min = 1, max = 255, message = "Provider name is required"))]
    pub provider_name: String,
    #[validate(length(min = 1, max = 50, message = "Provider NIT is required"))]
    pub provider_nit: String,
    #[validate(length(min = 1, max = 255, message = "Client name is required"))]
    pub client_name: String,
    #[validate(length(min = 1, max = 50, message = "Client NIT is required"))]
    pub client_nit: String,
    pub client_address: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub client_email: Option<String>,
    pub issue_date: NaiveDateTime,
    pub authorization_date: Option<NaiveDateTime>,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub guest_name: Option<String>,
    #[validate(length(max = 100))]
    pub cashier_id: Option<String>,
    #[validate(length(max = 100))]
    pub reservation_number: Option<String>,
    #[validate(length(max = 100))]
    pub payment_method: Option<String>,
    pub payment_terms: Option<String>,
    #[validate(length(max = 100))]
    pub bank_account: Option<String>,
    pub additional_info: Option<String>,
    #[serde(default)]
    pub loaded_in_settlement: bool,
    #[serde(default)]
    pub paid: bool,
    #[validate(length(max = 255))]
    pub reviewed_by: Option<String>,
}

impl From<InvoiceFields> for NewInvoice {
    fn from(fields: InvoiceFields) -> Self {
        Self {
            invoice_number: fields.invoice_number,
            cufe: fields.cufe,
            provider_name: fields.provider_name,
            provider_nit: fields.provider_nit,
            client_name: fields.client_name,
            client_nit: fields.client_nit,
            client_address: fields.client_address,
            client_email: fields.client_email,
            issue_date: fields.issue_date,
            authorization_date: fields.authorization_date,
            arrival_date: fields.arrival_date,
            departure_date: fields.departure_date,
            guest_name: fields.guest_name,
            cashier_id: fields.cashier_id,
            reservation_number: fields.reservation_number,
            payment_method: fields.payment_method,
            payment_terms: fields.payment_terms,
            bank_account: fields.bank_account,
            additional_info: fields.additional_info,
            loaded_in_settlement: fields.loaded_in_settlement,
            paid: fields.paid,
            reviewed_by: fields.reviewed_by,
        }
    }
}

/// Invoice without items; the total is stated by the client.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub invoice: InvoiceFields,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub total_amount: Decimal,
}

/// Invoice created together with its items in one transaction.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceWithItemsRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub invoice: InvoiceFields,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub total_amount: Option<Decimal>,
    #[validate(length(min = 1, message = "At least one item is required"), nested)]
    pub items: Vec<CreateInvoiceItemRequest>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateInvoiceRequest {
    #[validate(length(min = 1, max = 255))]
    pub invoice_number: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub cufe: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub provider_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub provider_nit: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub client_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub client_nit: Option<String>,
    pub client_address: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub client_email: Option<String>,
    pub issue_date: Option<NaiveDateTime>,
    pub authorization_date: Option<NaiveDateTime>,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub guest_name: Option<String>,
    #[validate(length(max = 100))]
    pub cashier_id: Option<String>,
    #[validate(length(max = 100))]
    pub reservation_number: Option<String>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub total_amount: Option<Decimal>,
    #[validate(length(max = 100))]
    pub payment_method: Option<String>,
    pub payment_terms: Option<String>,
    #[validate(length(max = 100))]
    pub bank_account: Option<String>,
    pub additional_info: Option<String>,
    pub loaded_in_settlement: Option<bool>,
    pub paid: Option<bool>,
    #[validate(length(max = 255))]
    pub reviewed_by: Option<String>,
}

impl From<UpdateInvoiceRequest> for InvoiceChanges {
    fn from(req: UpdateInvoiceRequest) -> Self {
        Self {
            invoice_number: req.invoice_number,
            cufe: req.cufe,
            provider_name: req.provider_name,
            provider_nit: req.provider_nit,
            client_name: req.client_name,
            client_nit: req.client_nit,
            client_address: req.client_address,
            client_email: req.client_email,
            issue_date: req.issue_date,
            authorization_date: req.authorization_date,
            arrival_date: req.arrival_date,
            departure_date: req.departure_date,
            guest_name: req.guest_name,
            cashier_id: req.cashier_id,
            reservation_number: req.reservation_number,
            total_amount: req.total_amount,
            payment_method: req.payment_method,
            payment_terms: req.payment_terms,
            bank_account: req.bank_account,
            additional_info: req.additional_info,
            loaded_in_settlement: req.loaded_in_settlement,
            paid: req.paid,
            reviewed_by: req.reviewed_by,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct InvoiceListParams {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub paid: Option<bool>,
    pub loaded_in_settlement: Option<bool>,
    pub provider_nit: Option<String>,
    pub client_nit: Option<String>,
    pub reservation_number: Option<String>,
    pub issue_date_from: Option<NaiveDateTime>,
    pub issue_date_to: Option<NaiveDateTime>,
}

impl InvoiceListParams {
    pub fn filter(&self) -> InvoiceFilter {
        InvoiceFilter {
            search: self.search.clone(),
            paid: self.paid,
            loaded_in_settlement: self.loaded_in_settlement,
            provider_nit: self.provider_nit.clone(),
            client_nit: self.client_nit.clone(),
            reservation_number: self.reservation_number.clone(),
            issue_date_from: self.issue_date_from,
            issue_date_to: self.issue_date_to,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetInvoiceParams {
    #[serde(default = "default_include_items")]
    pub include_items: bool,
}

fn default_include_items() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Invoice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<InvoiceItem>>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            invoice,
            items: None,
        }
    }
}

impl InvoiceResponse {
    pub fn with_items(invoice: Invoice, items: Vec<InvoiceItem>) -> Self {
        Self {
            invoice,
            items: Some(items),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<Invoice>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_payload() -> serde_json::Value {
        json!({
            "invoice_number": "FE-1001",
            "cufe": "cufe-1001",
            "provider_name": "Hotel Caribe",
            "provider_nit": "900123456",
            "client_name": "Viajes Andinos",
            "client_nit": "800654321",
            "client_email": "billing@andinos.test",
            "issue_date": "2025-01-10T10:00:00",
            "arrival_date": "2025-01-15",
            "departure_date": "2025-01-17",
            "items": [{
                "description": "Standard room",
                "unit": "night",
                "quantity": "2",
                "unit_price": "150000.00",
                "tax_rate": "19"
            }]
        })
    }

    #[test]
    fn nested_request_deserializes_flattened_fields() {
        let req: CreateInvoiceWithItemsRequest =
            serde_json::from_value(nested_payload()).unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.invoice.invoice_number, "FE-1001");
        assert!(!req.invoice.paid);
        assert!(req.total_amount.is_none());
        assert_eq!(req.items.len(), 1);
    }

    #[test]
    fn nested_request_requires_items() {
        let mut payload = nested_payload();
        payload["items"] = json!([]);
        let req: CreateInvoiceWithItemsRequest = serde_json::from_value(payload).unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_malformed_email_and_negative_total() {
        let mut payload = nested_payload();
        payload["client_email"] = json!("not-an-email");
        payload["total_amount"] = json!("-1.00");
        let req: CreateInvoiceWithItemsRequest = serde_json::from_value(payload).unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("total_amount"));
        assert!(errors.errors().contains_key("invoice"));
    }

    #[test]
    fn rejects_item_with_rate_above_hundred() {
        let mut payload = nested_payload();
        payload["items"][0]["tax_rate"] = json!("150");
        let req: CreateInvoiceWithItemsRequest = serde_json::from_value(payload).unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn list_params_bound_the_limit() {
        let params = InvoiceListParams {
            limit: Some(101),
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = InvoiceListParams {
            page: Some(2),
            limit: Some(100),
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn include_items_defaults_to_true() {
        let params: GetInvoiceParams = serde_json::from_value(json!({})).unwrap();
        assert!(params.include_items);
    }
}
