use crate::dtos::{
    CreateInvoiceRequest, CreateInvoiceWithItemsRequest, GetInvoiceParams, InvoiceListParams,
    InvoiceListResponse, InvoiceResponse, UpdateInvoiceRequest,
};
use crate::models::{InvoiceChanges, NewInvoice};
use crate::services::engine::{self, prepare_invoice_with_items, validate_stay_dates};
use crate::services::metrics::record_invoice_created;
use crate::services::totals::round_money;
use crate::services::InvoiceUnitOfWork;
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

pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<InvoiceListParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let page = PageRequest::new(params.page, params.limit);
    let (invoices, total) = state.db.list_invoices(&params.filter(), page).await?;

    Ok(Json(InvoiceListResponse {
        invoices,
        total,
        page: page.page,
        limit: page.limit,
        pages: page.pages(total),
    }))
}

pub async fn invoice_stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.db.invoice_stats().await?))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
    Query(params): Query<GetInvoiceParams>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state
        .db
        .get_invoice(invoice_id)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice", invoice_id))?;

    if !params.include_items {
        return Ok(Json(InvoiceResponse::from(invoice)));
    }

    let items = state.db.list_items(invoice_id).await?.unwrap_or_default();
    Ok(Json(InvoiceResponse::with_items(invoice, items)))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let invoice = NewInvoice::from(payload.invoice);
    validate_stay_dates(invoice.arrival_date, invoice.departure_date)?;

    let created = state
        .db
        .create_invoice(&invoice, round_money(payload.total_amount))
        .await?;
    record_invoice_created("plain");

    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(created))))
}

pub async fn create_invoice_with_items(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoiceWithItemsRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let prepared = prepare_invoice_with_items(
        payload.invoice.into(),
        payload.total_amount,
        payload.items.into_iter().map(Into::into).collect(),
    )?;

    let mut uow = state.db.begin().await?;
    let (invoice, items) = engine::create_invoice_with_items(&mut uow, prepared).await?;
    uow.commit().await?;
    record_invoice_created("with_items");

    Ok((
        StatusCode::CREATED,
        Json(InvoiceResponse::with_items(invoice, items)),
    ))
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
    Json(payload): Json<UpdateInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut changes = InvoiceChanges::from(payload);
    changes.total_amount = changes.total_amount.map(round_money);

    let invoice = state
        .db
        .update_invoice(invoice_id, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice", invoice_id))?;

    Ok(Json(InvoiceResponse::from(invoice)))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !state.db.delete_invoice(invoice_id).await? {
        return Err(AppError::not_found("Invoice", invoice_id));
    }
    Ok(StatusCode::NO_CONTENT)
}
