use crate::models::{NewSettlement, Settlement, SettlementChanges, SettlementFilter};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::status::ACTIVE;
use validator::Validate;

fn default_status() -> i16 {
    ACTIVE
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSettlementRequest {
    pub reservation_id: Option<i32>,
    #[validate(length(max = 150))]
    pub advisor_name: Option<String>,
    #[validate(length(max = 150))]
    pub company_name: Option<String>,
    #[validate(length(max = 25))]
    pub company_nit: Option<String>,
    #[validate(length(max = 150))]
    pub company_address: Option<String>,
    #[validate(length(max = 15))]
    pub company_phone: Option<String>,
    #[validate(length(max = 100))]
    pub service: Option<String>,
    pub service_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub service_includes: Option<String>,
    #[validate(range(min = 0, message = "passenger_count cannot be negative"))]
    pub passenger_count: Option<i32>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub settlement_value: Option<Decimal>,
    #[validate(range(min = 0, max = 100, message = "vat_rate must be between 0 and 100"))]
    pub vat_rate: Option<i32>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub vat_value: Option<Decimal>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub total_with_vat: Option<Decimal>,
    #[validate(length(max = 150))]
    pub passenger_name: Option<String>,
    pub settlement_date: Option<NaiveDate>,
    pub invoice_number: Option<i32>,
    #[serde(default = "default_status")]
    #[validate(range(min = 0, max = 1, message = "status must be 0 or 1"))]
    pub status: i16,
    #[validate(length(max = 75))]
    pub sales_channel: Option<String>,
    pub notes: String,
}

impl From<CreateSettlementRequest> for NewSettlement {
    fn from(req: CreateSettlementRequest) -> Self {
        Self {
            reservation_id: req.reservation_id,
            advisor_name: req.advisor_name,
            company_name: req.company_name,
            company_nit: req.company_nit,
            company_address: req.company_address,
            company_phone: req.company_phone,
            service: req.service,
            service_date: req.service_date,
            service_includes: req.service_includes,
            passenger_count: req.passenger_count,
            settlement_value: req.settlement_value,
            vat_rate: req.vat_rate,
            vat_value: req.vat_value,
            total_with_vat: req.total_with_vat,
            passenger_name: req.passenger_name,
            settlement_date: req.settlement_date,
            invoice_number: req.invoice_number,
            status: req.status,
            sales_channel: req.sales_channel,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSettlementRequest {
    pub reservation_id: Option<i32>,
    #[validate(length(max = 150))]
    pub advisor_name: Option<String>,
    #[validate(length(max = 150))]
    pub company_name: Option<String>,
    #[validate(length(max = 25))]
    pub company_nit: Option<String>,
    #[validate(length(max = 150))]
    pub company_address: Option<String>,
    #[validate(length(max = 15))]
    pub company_phone: Option<String>,
    #[validate(length(max = 100))]
    pub service: Option<String>,
    pub service_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub service_includes: Option<String>,
    #[validate(range(min = 0, message = "passenger_count cannot be negative"))]
    pub passenger_count: Option<i32>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub settlement_value: Option<Decimal>,
    #[validate(range(min = 0, max = 100, message = "vat_rate must be between 0 and 100"))]
    pub vat_rate: Option<i32>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub vat_value: Option<Decimal>,
    #[validate(custom(function = "service_core::validation::non_negative"))]
    pub total_with_vat: Option<Decimal>,
    #[validate(length(max = 150))]
    pub passenger_name: Option<String>,
    pub settlement_date: Option<NaiveDate>,
    pub invoice_number: Option<i32>,
    #[validate(range(min = 0, max = 1, message = "status must be 0 or 1"))]
    pub status: Option<i16>,
    #[validate(length(max = 75))]
    pub sales_channel: Option<String>,
    pub notes: Option<String>,
}

impl From<UpdateSettlementRequest> for SettlementChanges {
    fn from(req: UpdateSettlementRequest) -> Self {
        Self {
            reservation_id: req.reservation_id,
            advisor_name: req.advisor_name,
            company_name: req.company_name,
            company_nit: req.company_nit,
            company_address: req.company_address,
            company_phone: req.company_phone,
            service: req.service,
            service_date: req.service_date,
            service_includes: req.service_includes,
            passenger_count: req.passenger_count,
            settlement_value: req.settlement_value,
            vat_rate: req.vat_rate,
            vat_value: req.vat_value,
            total_with_vat: req.total_with_vat,
            passenger_name: req.passenger_name,
            settlement_date: req.settlement_date,
            invoice_number: req.invoice_number,
            status: req.status,
            sales_channel: req.sales_channel,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SettlementListParams {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub search: Option<String>,
    #[validate(range(min = 0, max = 1, message = "status must be 0 or 1"))]
    pub status: Option<i16>,
    pub reservation_id: Option<i32>,
    pub invoice_number: Option<i32>,
}

impl SettlementListParams {
    pub fn filter(&self) -> SettlementFilter {
        SettlementFilter {
            search: self.search.clone(),
            status: self.status,
            reservation_id: self.reservation_id,
            invoice_number: self.invoice_number,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SettlementListResponse {
    pub settlements: Vec<Settlement>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> serde_json::Value {
        json!({
            "reservation_id": 123,
            "advisor_name": "Juan Perez",
            "company_name": "Empresa Ejemplo S.A.",
            "company_nit": "900123456-7",
            "service": "Hotel",
            "service_date": "2025-01-15",
            "passenger_count": 2,
            "settlement_value": "500000",
            "vat_rate": 19,
            "vat_value": "95000",
            "total_with_vat": "595000",
            "passenger_name": "Maria Garcia",
            "settlement_date": "2025-01-10",
            "invoice_number": 1001,
            "sales_channel": "Web",
            "notes": "Test settlement"
        })
    }

    #[test]
    fn status_defaults_to_active() {
        let req: CreateSettlementRequest = serde_json::from_value(payload()).unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.status, ACTIVE);
    }

    #[test]
    fn notes_are_required() {
        let mut body = payload();
        body.as_object_mut().unwrap().remove("notes");

        assert!(serde_json::from_value::<CreateSettlementRequest>(body).is_err());
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        let mut body = payload();
        body["vat_rate"] = json!(101);
        body["passenger_count"] = json!(-1);
        body["status"] = json!(2);
        let req: CreateSettlementRequest = serde_json::from_value(body).unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("vat_rate"));
        assert!(fields.contains_key("passenger_count"));
        assert!(fields.contains_key("status"));
    }

    #[test]
    fn rejects_overlong_phone_and_negative_value() {
        let mut body = payload();
        body["company_phone"] = json!("1".repeat(16));
        body["settlement_value"] = json!("-10");
        let req: CreateSettlementRequest = serde_json::from_value(body).unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("company_phone"));
        assert!(errors.field_errors().contains_key("settlement_value"));
    }

    #[test]
    fn update_accepts_empty_body() {
        let req: UpdateSettlementRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.validate().is_ok());

        let changes = SettlementChanges::from(req);
        assert!(changes.status.is_none());
        assert!(changes.notes.is_none());
    }

    #[test]
    fn list_params_reject_unknown_status() {
        let params = SettlementListParams {
            status: Some(3),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
