use crate::models::{NewProvider, Provider, ProviderChanges, ProviderFilter};
use serde::{Deserialize, Serialize};
use service_core::status::ACTIVE;
use validator::Validate;

fn default_status() -> i16 {
    ACTIVE
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProviderRequest {
    pub hotel_code: Option<i32>,
    #[validate(length(max = 250))]
    pub business_name: Option<String>,
    #[validate(length(max = 150))]
    pub name: Option<String>,
    #[validate(length(max = 25))]
    pub identification: Option<String>,
    #[validate(length(max = 250))]
    pub address: Option<String>,
    #[validate(length(max = 25))]
    pub phone: Option<String>,
    pub provider_type: Option<i32>,
    #[serde(default = "default_status")]
    #[validate(range(min = 0, max = 1, message = "status must be 0 or 1"))]
    pub status: i16,
    pub city_id: Option<i32>,
    #[validate(length(max = 500))]
    pub dropbox_link: Option<String>,
}

impl From<CreateProviderRequest> for NewProvider {
    fn from(req: CreateProviderRequest) -> Self {
        Self {
            hotel_code: req.hotel_code,
            business_name: req.business_name,
            name: req.name,
            identification: req.identification,
            address: req.address,
            phone: req.phone,
            provider_type: req.provider_type,
            status: req.status,
            city_id: req.city_id,
            dropbox_link: req.dropbox_link,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProviderRequest {
    pub hotel_code: Option<i32>,
    #[validate(length(max = 250))]
    pub business_name: Option<String>,
    #[validate(length(max = 150))]
    pub name: Option<String>,
    #[validate(length(max = 25))]
    pub identification: Option<String>,
    #[validate(length(max = 250))]
    pub address: Option<String>,
    #[validate(length(max = 25))]
    pub phone: Option<String>,
    pub provider_type: Option<i32>,
    #[validate(range(min = 0, max = 1, message = "status must be 0 or 1"))]
    pub status: Option<i16>,
    pub city_id: Option<i32>,
    #[validate(length(max = 500))]
    pub dropbox_link: Option<String>,
}

impl From<UpdateProviderRequest> for ProviderChanges {
    fn from(req: UpdateProviderRequest) -> Self {
        Self {
            hotel_code: req.hotel_code,
            business_name: req.business_name,
            name: req.name,
            identification: req.identification,
            address: req.address,
            phone: req.phone,
            provider_type: req.provider_type,
            status: req.status,
            city_id: req.city_id,
            dropbox_link: req.dropbox_link,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProviderListParams {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub search: Option<String>,
    #[validate(range(min = 0, max = 1, message = "status must be 0 or 1"))]
    pub status: Option<i16>,
    pub provider_type: Option<i32>,
    pub city_id: Option<i32>,
}

impl ProviderListParams {
    pub fn filter(&self) -> ProviderFilter {
        ProviderFilter {
            search: self.search.clone(),
            status: self.status,
            provider_type: self.provider_type,
            city_id: self.city_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderListResponse {
    pub providers: Vec<Provider>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_provider_is_active() {
        let req: CreateProviderRequest =
            serde_json::from_value(json!({ "name": "Hotel Andino" })).unwrap();

        assert!(req.validate().is_ok());
        let provider = NewProvider::from(req);
        assert_eq!(provider.status, ACTIVE);
        assert!(provider.provider_type.is_none());
    }

    #[test]
    fn rejects_overlong_identification_and_link() {
        let req: CreateProviderRequest = serde_json::from_value(json!({
            "identification": "9".repeat(26),
            "dropbox_link": format!("https://dropbox.test/{}", "a".repeat(500)),
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("identification"));
        assert!(errors.field_errors().contains_key("dropbox_link"));
    }

    #[test]
    fn update_rejects_unknown_status() {
        let req = UpdateProviderRequest {
            status: Some(2),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn list_filter_carries_params() {
        let params: ProviderListParams = serde_json::from_value(json!({
            "search": "andino",
            "provider_type": 2,
            "city_id": 11001
        }))
        .unwrap();

        let filter = params.filter();
        assert_eq!(filter.search.as_deref(), Some("andino"));
        assert_eq!(filter.provider_type, Some(2));
        assert_eq!(filter.city_id, Some(11001));
        assert!(filter.status.is_none());
    }
}
