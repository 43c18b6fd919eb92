//! Postgres-backed unit of work for the invoice total engine.

use crate::models::{Invoice, InvoiceItem, ItemRecord, NewInvoice};
use crate::services::database::{insert_invoice, ITEM_COLUMNS};
use crate::services::engine::InvoiceUnitOfWork;
use crate::services::metrics::QueryTimer;
use async_trait::async_trait;
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::postgres::PgPool;
use sqlx::{Postgres, Transaction};
use tracing::instrument;

/// One database transaction. Dropping it without [`commit`] rolls back.
///
/// [`commit`]: InvoiceUnitOfWork::commit
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PgUnitOfWork {
    pub async fn begin(pool: &PgPool) -> Result<Self, AppError> {
        let tx = pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;
        Ok(Self { tx })
    }
}

#[async_trait]
impl InvoiceUnitOfWork for PgUnitOfWork {
    #[instrument(skip(self))]
    async fn lock_invoice(&mut self, invoice_id: i64) -> Result<bool, AppError> {
        let timer = QueryTimer::start("lock_invoice");

        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM invoices WHERE id = $1 FOR UPDATE")
                .bind(invoice_id)
                .fetch_optional(&mut *self.tx)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to lock invoice: {}", e))
                })?;

        timer.observe_duration();

        Ok(locked.is_some())
    }

    async fn item_invoice_id(&mut self, item_id: i64) -> Result<Option<i64>, AppError> {
        sqlx::query_scalar("SELECT invoice_id FROM invoice_items WHERE id = $1")
            .bind(item_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get item: {}", e)))
    }

    async fn find_item(&mut self, item_id: i64) -> Result<Option<InvoiceItem>, AppError> {
        sqlx::query_as::<_, InvoiceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE id = $1 FOR UPDATE"
        ))
        .bind(item_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get item: {}", e)))
    }

    #[instrument(skip(self, invoice), fields(invoice_number = %invoice.invoice_number))]
    async fn insert_invoice(
        &mut self,
        invoice: &NewInvoice,
        total_amount: Decimal,
    ) -> Result<Invoice, AppError> {
        let timer = QueryTimer::start("create_invoice");
        let invoice = insert_invoice(&mut *self.tx, invoice, total_amount).await?;
        timer.observe_duration();
        Ok(invoice)
    }

    #[instrument(skip(self, item))]
    async fn insert_item(
        &mut self,
        invoice_id: i64,
        item: &ItemRecord,
    ) -> Result<InvoiceItem, AppError> {
        let timer = QueryTimer::start("create_item");

        let item = sqlx::query_as::<_, InvoiceItem>(&format!(
            r#"
            INSERT INTO invoice_items (
                invoice_id, description, unit, quantity, unit_price,
                subtotal, tax_rate, tax_amount, total_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(invoice_id)
        .bind(&item.description)
        .bind(&item.unit)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.subtotal)
        .bind(item.tax_rate)
        .bind(item.tax_amount)
        .bind(item.total_amount)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create item: {}", e)))?;

        timer.observe_duration();

        Ok(item)
    }

    #[instrument(skip(self, item))]
    async fn update_item(
        &mut self,
        item_id: i64,
        item: &ItemRecord,
    ) -> Result<Option<InvoiceItem>, AppError> {
        let timer = QueryTimer::start("update_item");

        let item = sqlx::query_as::<_, InvoiceItem>(&format!(
            r#"
            UPDATE invoice_items
            SET description = $2,
                unit = $3,
                quantity = $4,
                unit_price = $5,
                subtotal = $6,
                tax_rate = $7,
                tax_amount = $8,
                total_amount = $9
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item_id)
        .bind(&item.description)
        .bind(&item.unit)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.subtotal)
        .bind(item.tax_rate)
        .bind(item.tax_amount)
        .bind(item.total_amount)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update item: {}", e)))?;

        timer.observe_duration();

        Ok(item)
    }

    #[instrument(skip(self))]
    async fn delete_item(&mut self, item_id: i64) -> Result<bool, AppError> {
        let timer = QueryTimer::start("delete_item");

        let result = sqlx::query("DELETE FROM invoice_items WHERE id = $1")
            .bind(item_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete item: {}", e))
            })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn store_items_total(&mut self, invoice_id: i64) -> Result<Option<Decimal>, AppError> {
        let timer = QueryTimer::start("recalculate_total");

        let total: Option<Decimal> = sqlx::query_scalar(
            r#"
            UPDATE invoices
            SET total_amount = (
                    SELECT COALESCE(SUM(total_amount), 0)
                    FROM invoice_items
                    WHERE invoice_id = $1
                ),
                updated_at = NOW()
            WHERE id = $1
            RETURNING total_amount
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to recalculate invoice total: {}", e))
        })?;

        timer.observe_duration();

        Ok(total)
    }

    async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })
    }
}
