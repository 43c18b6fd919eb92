use crate::dtos::{
    CreateProviderRequest, ProviderListParams, ProviderListResponse, UpdateProviderRequest,
};
use crate::models::{NewProvider, ProviderChanges};
use crate::services::metrics::record_change;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use service_core::pagination::PageRequest;
use validator::Validate;

pub async fn list_providers(
    State(state): State<AppState>,
    Query(params): Query<ProviderListParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let page = PageRequest::new(params.page, params.limit);
    let (providers, total) = state.db.list_providers(&params.filter(), page).await?;

    Ok(Json(ProviderListResponse {
        providers,
        total,
        page: page.page,
        limit: page.limit,
        pages: page.pages(total),
    }))
}

pub async fn provider_stats(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.db.provider_stats().await?))
}

pub async fn get_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let provider = state
        .db
        .get_provider(provider_id)
        .await?
        .ok_or_else(|| AppError::not_found("Provider", provider_id))?;

    Ok(Json(provider))
}

pub async fn create_provider(
    State(state): State<AppState>,
    Json(payload): Json<CreateProviderRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let provider = state.db.create_provider(&NewProvider::from(payload)).await?;
    record_change("create");

    Ok((StatusCode::CREATED, Json(provider)))
}

pub async fn update_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<i64>,
    Json(payload): Json<UpdateProviderRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let provider = state
        .db
        .update_provider(provider_id, &ProviderChanges::from(payload))
        .await?
        .ok_or_else(|| AppError::not_found("Provider", provider_id))?;
    record_change("update");

    Ok(Json(provider))
}

/// Marks the provider inactive; it stays readable.
pub async fn delete_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !state.db.deactivate_provider(provider_id).await? {
        return Err(AppError::not_found("Provider", provider_id));
    }
    record_change("delete");

    Ok(StatusCode::NO_CONTENT)
}
