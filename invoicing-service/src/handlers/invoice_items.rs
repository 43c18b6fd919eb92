use crate::dtos::{CreateInvoiceItemRequest, InvoiceItemListResponse, UpdateInvoiceItemRequest};
use crate::services::engine;
use crate::services::metrics::record_item_mutation;
use crate::services::InvoiceUnitOfWork;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use validator::Validate;

pub async fn list_items(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let items = state
        .db
        .list_items(invoice_id)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice", invoice_id))?;

    Ok(Json(InvoiceItemListResponse {
        total: items.len(),
        items,
        invoice_id,
    }))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .db
        .get_item(item_id)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice item", item_id))?;

    Ok(Json(item))
}

pub async fn create_item(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
    Json(payload): Json<CreateInvoiceItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut uow = state.db.begin().await?;
    let created = engine::create_item(&mut uow, invoice_id, payload.into()).await?;
    uow.commit().await?;
    record_item_mutation("create");

    Ok((StatusCode::CREATED, Json(created.item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Json(payload): Json<UpdateInvoiceItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut uow = state.db.begin().await?;
    let updated = engine::update_item(&mut uow, item_id, payload.into()).await?;
    uow.commit().await?;
    record_item_mutation("update");

    Ok(Json(updated.item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut uow = state.db.begin().await?;
    engine::delete_item(&mut uow, item_id).await?;
    uow.commit().await?;
    record_item_mutation("delete");

    Ok(StatusCode::NO_CONTENT)
}
