//! Invoice total engine.
//!
//! Every operation that touches invoice items runs inside one
//! [`InvoiceUnitOfWork`] and finishes by writing the sum of the invoice's
//! item totals back onto the invoice. Callers commit the unit of work once
//! the operation returns `Ok`; dropping it instead discards every write.

use crate::models::{Invoice, InvoiceItem, ItemChanges, ItemDraft, ItemRecord, NewInvoice};
use crate::services::metrics::record_recalculation;
use crate::services::totals::{
    merge_item_changes, resolve_new_item, sum_item_totals, totals_match,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use service_core::error::AppError;
use tracing::{info, instrument};

/// Transactional storage seam used by the engine.
///
/// Implementations must make all writes atomic: nothing is visible to
/// other units of work before [`commit`](Self::commit), and dropping an
/// uncommitted unit discards everything.
#[async_trait]
pub trait InvoiceUnitOfWork: Send {
    /// Lock the invoice row for the rest of the unit. Returns `false` when
    /// the invoice does not exist.
    async fn lock_invoice(&mut self, invoice_id: i64) -> Result<bool, AppError>;

    /// Invoice owning the item, if the item exists.
    async fn item_invoice_id(&mut self, item_id: i64) -> Result<Option<i64>, AppError>;

    async fn find_item(&mut self, item_id: i64) -> Result<Option<InvoiceItem>, AppError>;

    async fn insert_invoice(
        &mut self,
        invoice: &NewInvoice,
        total_amount: Decimal,
    ) -> Result<Invoice, AppError>;

    async fn insert_item(
        &mut self,
        invoice_id: i64,
        item: &ItemRecord,
    ) -> Result<InvoiceItem, AppError>;

    async fn update_item(
        &mut self,
        item_id: i64,
        item: &ItemRecord,
    ) -> Result<Option<InvoiceItem>, AppError>;

    /// Returns `false` when no row was removed.
    async fn delete_item(&mut self, item_id: i64) -> Result<bool, AppError>;

    /// Store the sum of the invoice's item totals on the invoice and return
    /// it. `None` when the invoice does not exist.
    async fn store_items_total(&mut self, invoice_id: i64) -> Result<Option<Decimal>, AppError>;

    async fn commit(self) -> Result<(), AppError>
    where
        Self: Sized;
}

/// Result of an item mutation: the item (absent after delete) and the
/// invoice total it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemMutation<T> {
    pub item: T,
    pub invoice_total: Decimal,
}

/// Nested invoice creation after validation, ready to persist.
#[derive(Debug, Clone)]
pub struct PreparedInvoice {
    pub invoice: NewInvoice,
    pub items: Vec<ItemRecord>,
    pub items_total: Decimal,
}

/// Reject a stay that ends before it starts.
pub fn validate_stay_dates(
    arrival_date: Option<NaiveDate>,
    departure_date: Option<NaiveDate>,
) -> Result<(), AppError> {
    match (arrival_date, departure_date) {
        (Some(arrival), Some(departure)) if departure < arrival => Err(AppError::BadRequest(
            anyhow::anyhow!(
                "departure_date ({}) must be on or after arrival_date ({})",
                departure,
                arrival
            ),
        )),
        _ => Ok(()),
    }
}

/// Validate a nested create without touching storage.
///
/// Requires at least one item and a consistent stay, resolves every item's
/// amounts and checks a declared total against their sum within
/// [`total_tolerance`](crate::services::totals::total_tolerance). The
/// stored invoice total is always the items' sum.
pub fn prepare_invoice_with_items(
    invoice: NewInvoice,
    declared_total: Option<Decimal>,
    items: Vec<ItemDraft>,
) -> Result<PreparedInvoice, AppError> {
    if items.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "An invoice must contain at least one item"
        )));
    }

    validate_stay_dates(invoice.arrival_date, invoice.departure_date)?;

    let items = items
        .into_iter()
        .map(resolve_new_item)
        .collect::<Result<Vec<ItemRecord>, _>>()?;
    let items_total = sum_item_totals(items.iter().map(|item| &item.total_amount))?;

    if let Some(declared) = declared_total {
        if !totals_match(declared, items_total) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Total mismatch: invoice total_amount {} does not match items total {}",
                declared,
                items_total
            )));
        }
    }

    Ok(PreparedInvoice {
        invoice,
        items,
        items_total,
    })
}

/// Recompute the invoice total from its items inside `uow`.
#[instrument(skip(uow))]
pub async fn recalculate_invoice_total<U: InvoiceUnitOfWork>(
    uow: &mut U,
    invoice_id: i64,
) -> Result<Decimal, AppError> {
    let total = uow
        .store_items_total(invoice_id)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice", invoice_id))?;

    record_recalculation();
    info!(invoice_id = invoice_id, total = %total, "Recalculated invoice total");

    Ok(total)
}

/// Persist a prepared invoice and its items.
#[instrument(skip(uow, prepared), fields(items = prepared.items.len()))]
pub async fn create_invoice_with_items<U: InvoiceUnitOfWork>(
    uow: &mut U,
    prepared: PreparedInvoice,
) -> Result<(Invoice, Vec<InvoiceItem>), AppError> {
    let invoice = uow
        .insert_invoice(&prepared.invoice, prepared.items_total)
        .await?;

    let mut items = Vec::with_capacity(prepared.items.len());
    for record in &prepared.items {
        items.push(uow.insert_item(invoice.id, record).await?);
    }

    info!(
        invoice_id = invoice.id,
        total = %invoice.total_amount,
        items = items.len(),
        "Invoice created with items"
    );

    Ok((invoice, items))
}

/// Add an item to an existing invoice.
#[instrument(skip(uow, draft))]
pub async fn create_item<U: InvoiceUnitOfWork>(
    uow: &mut U,
    invoice_id: i64,
    draft: ItemDraft,
) -> Result<ItemMutation<InvoiceItem>, AppError> {
    if !uow.lock_invoice(invoice_id).await? {
        return Err(AppError::not_found("Invoice", invoice_id));
    }

    let record = resolve_new_item(draft)?;
    let item = uow.insert_item(invoice_id, &record).await?;
    let invoice_total = recalculate_invoice_total(uow, invoice_id).await?;

    info!(item_id = item.id, invoice_id = invoice_id, "Invoice item created");

    Ok(ItemMutation {
        item,
        invoice_total,
    })
}

/// Apply a partial update to an item.
#[instrument(skip(uow, changes))]
pub async fn update_item<U: InvoiceUnitOfWork>(
    uow: &mut U,
    item_id: i64,
    changes: ItemChanges,
) -> Result<ItemMutation<InvoiceItem>, AppError> {
    let invoice_id = lock_item_invoice(uow, item_id).await?;

    let existing = uow
        .find_item(item_id)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice item", item_id))?;

    let record = merge_item_changes(&existing, changes)?;
    let item = uow
        .update_item(item_id, &record)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice item", item_id))?;
    let invoice_total = recalculate_invoice_total(uow, invoice_id).await?;

    info!(item_id = item_id, invoice_id = invoice_id, "Invoice item updated");

    Ok(ItemMutation {
        item,
        invoice_total,
    })
}

/// Remove an item.
#[instrument(skip(uow))]
pub async fn delete_item<U: InvoiceUnitOfWork>(
    uow: &mut U,
    item_id: i64,
) -> Result<ItemMutation<()>, AppError> {
    let invoice_id = lock_item_invoice(uow, item_id).await?;

    if !uow.delete_item(item_id).await? {
        return Err(AppError::not_found("Invoice item", item_id));
    }
    let invoice_total = recalculate_invoice_total(uow, invoice_id).await?;

    info!(item_id = item_id, invoice_id = invoice_id, "Invoice item deleted");

    Ok(ItemMutation {
        item: (),
        invoice_total,
    })
}

/// Resolve the owning invoice and lock it before the item is read, so
/// item writers on the same invoice are serialized.
async fn lock_item_invoice<U: InvoiceUnitOfWork>(
    uow: &mut U,
    item_id: i64,
) -> Result<i64, AppError> {
    let invoice_id = uow
        .item_invoice_id(item_id)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice item", item_id))?;

    if !uow.lock_invoice(invoice_id).await? {
        return Err(AppError::not_found("Invoice", invoice_id));
    }

    Ok(invoice_id)
}
