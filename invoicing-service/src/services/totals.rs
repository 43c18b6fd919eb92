//! Amount rules for invoice items.
//!
//! Every derived amount follows the same precedence: a value supplied by
//! the client wins, otherwise it is computed from the other inputs,
//! otherwise it is zero. Derived amounts must stay below
//! [`max_amount`] or the item is rejected.

use crate::models::{InvoiceItem, ItemChanges, ItemDraft, ItemRecord};
use rust_decimal::{Decimal, RoundingStrategy};
use service_core::error::AppError;
use service_core::validation::max_amount;

/// Subtotal, tax and total of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

/// Maximum accepted gap between a declared invoice total and the sum of
/// its items.
pub fn total_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Whether a declared total agrees with the computed one.
pub fn totals_match(declared: Decimal, computed: Decimal) -> bool {
    (declared - computed).abs() <= total_tolerance()
}

/// Round a money amount to cents, halves away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn within_range(value: Option<Decimal>) -> Result<Decimal, AppError> {
    value.filter(|v| v.abs() < max_amount()).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!(
            "Item amounts must be less than {}",
            max_amount()
        ))
    })
}

/// Exact item amounts.
///
/// 1. subtotal: supplied, else `quantity * unit_price`, else 0.
/// 2. tax: supplied, else `subtotal * tax_rate / 100` when a rate is
///    present and the subtotal is positive, else 0.
/// 3. total: supplied, else `subtotal + tax`.
///
/// Contradictory supplied values are accepted as-is.
pub fn compute_item_totals(
    quantity: Option<Decimal>,
    unit_price: Option<Decimal>,
    subtotal: Option<Decimal>,
    tax_rate: Option<Decimal>,
    tax_amount: Option<Decimal>,
    total_amount: Option<Decimal>,
) -> Result<ItemTotals, AppError> {
    let subtotal = match (subtotal, quantity, unit_price) {
        (Some(subtotal), _, _) => subtotal,
        (None, Some(q), Some(p)) => within_range(q.checked_mul(p))?,
        _ => Decimal::ZERO,
    };

    let tax_amount = match (tax_amount, tax_rate) {
        (Some(tax), _) => tax,
        (None, Some(rate)) if subtotal > Decimal::ZERO => within_range(
            subtotal
                .checked_mul(rate)
                .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED)),
        )?,
        _ => Decimal::ZERO,
    };

    let total_amount = match total_amount {
        Some(total) => total,
        None => within_range(subtotal.checked_add(tax_amount))?,
    };

    Ok(ItemTotals {
        subtotal,
        tax_amount,
        total_amount,
    })
}

/// Item amounts as persisted: each rounded to cents, with a derived total
/// re-added from the rounded parts so `total = subtotal + tax` holds in
/// storage.
pub fn stored_item_totals(
    quantity: Option<Decimal>,
    unit_price: Option<Decimal>,
    subtotal: Option<Decimal>,
    tax_rate: Option<Decimal>,
    tax_amount: Option<Decimal>,
    total_amount: Option<Decimal>,
) -> Result<ItemTotals, AppError> {
    let exact = compute_item_totals(
        quantity,
        unit_price,
        subtotal,
        tax_rate,
        tax_amount,
        total_amount,
    )?;
    let subtotal = round_money(exact.subtotal);
    let tax_amount = round_money(exact.tax_amount);
    let total_amount = match total_amount {
        Some(total) => round_money(total),
        None => within_range(subtotal.checked_add(tax_amount))?,
    };

    Ok(ItemTotals {
        subtotal,
        tax_amount,
        total_amount,
    })
}

/// Resolve a client draft into the record to insert.
pub fn resolve_new_item(draft: ItemDraft) -> Result<ItemRecord, AppError> {
    let totals = stored_item_totals(
        draft.quantity,
        draft.unit_price,
        draft.subtotal,
        draft.tax_rate,
        draft.tax_amount,
        draft.total_amount,
    )?;

    Ok(ItemRecord {
        description: draft.description,
        unit: draft.unit,
        quantity: draft.quantity,
        unit_price: draft.unit_price,
        subtotal: totals.subtotal,
        tax_rate: draft.tax_rate,
        tax_amount: totals.tax_amount,
        total_amount: totals.total_amount,
    })
}

/// Merge a partial update over a stored item.
///
/// Supplied fields replace stored ones and amounts are recomputed from the
/// merged values. The stored subtotal is re-derived only when the update
/// changes quantity or unit price and both are known afterwards. The
/// stored tax is re-derived only when the rate or the subtotal changes.
/// Without amount inputs the stored amounts stay, except for an explicit
/// new total.
pub fn merge_item_changes(
    existing: &InvoiceItem,
    changes: ItemChanges,
) -> Result<ItemRecord, AppError> {
    let quantity = changes.quantity.or(existing.quantity);
    let unit_price = changes.unit_price.or(existing.unit_price);
    let tax_rate = changes.tax_rate.or(existing.tax_rate);

    let totals = if changes.touches_amounts() {
        let rederive_subtotal = (changes.quantity.is_some() || changes.unit_price.is_some())
            && quantity.is_some()
            && unit_price.is_some();
        let subtotal = changes
            .subtotal
            .or_else(|| (!rederive_subtotal).then_some(existing.subtotal));

        let subtotal_changed = changes.subtotal.is_some() || rederive_subtotal;
        let tax_amount = changes.tax_amount.or_else(|| {
            (changes.tax_rate.is_none() && !subtotal_changed).then_some(existing.tax_amount)
        });

        stored_item_totals(
            quantity,
            unit_price,
            subtotal,
            tax_rate,
            tax_amount,
            changes.total_amount,
        )?
    } else {
        ItemTotals {
            subtotal: existing.subtotal,
            tax_amount: existing.tax_amount,
            total_amount: changes
                .total_amount
                .map(round_money)
                .unwrap_or(existing.total_amount),
        }
    };

    Ok(ItemRecord {
        description: changes
            .description
            .unwrap_or_else(|| existing.description.clone()),
        unit: changes.unit.or_else(|| existing.unit.clone()),
        quantity,
        unit_price,
        subtotal: totals.subtotal,
        tax_rate,
        tax_amount: totals.tax_amount,
        total_amount: totals.total_amount,
    })
}

/// Sum of stored item totals; zero for no items.
pub fn sum_item_totals<'a>(
    totals: impl IntoIterator<Item = &'a Decimal>,
) -> Result<Decimal, AppError> {
    let sum = totals
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, total| acc.checked_add(*total));
    within_range(sum)
}
