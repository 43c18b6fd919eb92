use crate::dtos::{
    CreateSettlementRequest, SettlementListParams, SettlementListResponse,
    UpdateSettlementRequest,
};
use crate::models::{NewSettlement, SettlementChanges};
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

pub async fn list_settlements(
    State(state): State<AppState>,
    Query(params): Query<SettlementListParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let page = PageRequest::new(params.page, params.limit);
    let (settlements, total) = state
        .db
        .list_settlements(&params.filter(), page)
        .await?;

    Ok(Json(SettlementListResponse {
        settlements,
        total,
        page: page.page,
        limit: page.limit,
        pages: page.pages(total),
    }))
}

pub async fn settlement_stats(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.db.settlement_stats().await?))
}

pub async fn get_settlement(
    State(state): State<AppState>,
    Path(settlement_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let settlement = state
        .db
        .get_settlement(settlement_id)
        .await?
        .ok_or_else(|| AppError::not_found("Settlement", settlement_id))?;

    Ok(Json(settlement))
}

pub async fn create_settlement(
    State(state): State<AppState>,
    Json(payload): Json<CreateSettlementRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let settlement = state
        .db
        .create_settlement(&NewSettlement::from(payload))
        .await?;
    record_change("create");

    Ok((StatusCode::CREATED, Json(settlement)))
}

pub async fn update_settlement(
    State(state): State<AppState>,
    Path(settlement_id): Path<i64>,
    Json(payload): Json<UpdateSettlementRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let settlement = state
        .db
        .update_settlement(settlement_id, &SettlementChanges::from(payload))
        .await?
        .ok_or_else(|| AppError::not_found("Settlement", settlement_id))?;
    record_change("update");

    Ok(Json(settlement))
}

/// Marks the settlement inactive; it stays readable.
pub async fn delete_settlement(
    State(state): State<AppState>,
    Path(settlement_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !state.db.deactivate_settlement(settlement_id).await? {
        return Err(AppError::not_found("Settlement", settlement_id));
    }
    record_change("delete");

    Ok(StatusCode::NO_CONTENT)
}
