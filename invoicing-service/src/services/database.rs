//! Database service for invoicing-service.

use crate::models::{
    Invoice, InvoiceChanges, InvoiceFilter, InvoiceItem, InvoiceStats, NewInvoice,
};
use crate::services::engine::validate_stay_dates;
use crate::services::metrics::QueryTimer;
use crate::services::unit_of_work::PgUnitOfWork;
use rust_decimal::Decimal;
use service_core::config::DatabaseConfig;
use service_core::database::contains_pattern;
use service_core::error::AppError;
use service_core::pagination::PageRequest;
use sqlx::postgres::PgPool;
use sqlx::PgExecutor;
use tracing::{info, instrument};

pub(crate) const INVOICE_COLUMNS: &str = "id, invoice_number, cufe, provider_name, provider_nit, \
    client_name, client_nit, client_address, client_email, issue_date, authorization_date, \
    arrival_date, departure_date, guest_name, cashier_id, reservation_number, total_amount, \
    payment_method, payment_terms, bank_account, additional_info, loaded_in_settlement, paid, \
    reviewed_by, created_at, updated_at";

pub(crate) const ITEM_COLUMNS: &str = "id, invoice_id, description, unit, quantity, unit_price, \
    subtotal, tax_rate, tax_amount, total_amount";

const INVOICE_FILTER: &str = r#"
    ($1::text IS NULL
        OR invoice_number ILIKE $1 ESCAPE '\'
        OR provider_name ILIKE $1 ESCAPE '\'
        OR client_name ILIKE $1 ESCAPE '\'
        OR cufe ILIKE $1 ESCAPE '\')
    AND ($2::bool IS NULL OR paid = $2)
    AND ($3::bool IS NULL OR loaded_in_settlement = $3)
    AND ($4::text IS NULL OR provider_nit = $4)
    AND ($5::text IS NULL OR client_nit = $5)
    AND ($6::text IS NULL OR reservation_number = $6)
    AND ($7::timestamp IS NULL OR issue_date >= $7)
    AND ($8::timestamp IS NULL OR issue_date <= $8)
"#;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(config), fields(service = "invoicing-service"))]
    pub async fn new(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = service_core::database::connect_pool(config).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    pub async fn health_check(&self) -> Result<(), AppError> {
        service_core::database::ping(&self.pool).await
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        // Services may share one database; skip versions owned by the others.
        let mut migrator = sqlx::migrate!("./migrations");
        migrator.set_ignore_missing(true);
        migrator
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Open a unit of work for the total engine.
    pub async fn begin(&self) -> Result<PgUnitOfWork, AppError> {
        PgUnitOfWork::begin(&self.pool).await
    }

    // -------------------------------------------------------------------------
    // Invoice Operations
    // -------------------------------------------------------------------------

    /// Create an invoice without items, with an explicit total.
    #[instrument(skip(self, input), fields(invoice_number = %input.invoice_number))]
    pub async fn create_invoice(
        &self,
        input: &NewInvoice,
        total_amount: Decimal,
    ) -> Result<Invoice, AppError> {
        let timer = QueryTimer::start("create_invoice");
        let invoice = insert_invoice(&self.pool, input, total_amount).await?;
        timer.observe_duration();

        info!(invoice_id = invoice.id, "Invoice created");

        Ok(invoice)
    }

    /// Get an invoice by ID.
    #[instrument(skip(self))]
    pub async fn get_invoice(&self, invoice_id: i64) -> Result<Option<Invoice>, AppError> {
        let timer = QueryTimer::start("get_invoice");

        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"
        ))
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e)))?;

        timer.observe_duration();

        Ok(invoice)
    }

    /// List invoices matching `filter`, newest issue date first, with the
    /// total number of matches.
    #[instrument(skip(self, filter))]
    pub async fn list_invoices(
        &self,
        filter: &InvoiceFilter,
        page: PageRequest,
    ) -> Result<(Vec<Invoice>, i64), AppError> {
        let timer = QueryTimer::start("list_invoices");
        let search = filter
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(contains_pattern);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM invoices WHERE {INVOICE_FILTER}"
        ))
        .bind(search.as_deref())
        .bind(filter.paid)
        .bind(filter.loaded_in_settlement)
        .bind(&filter.provider_nit)
        .bind(&filter.client_nit)
        .bind(&filter.reservation_number)
        .bind(filter.issue_date_from)
        .bind(filter.issue_date_to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count invoices: {}", e)))?;

        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE {INVOICE_FILTER} \
             ORDER BY issue_date DESC, id DESC LIMIT $9 OFFSET $10"
        ))
        .bind(search.as_deref())
        .bind(filter.paid)
        .bind(filter.loaded_in_settlement)
        .bind(&filter.provider_nit)
        .bind(&filter.client_nit)
        .bind(&filter.reservation_number)
        .bind(filter.issue_date_from)
        .bind(filter.issue_date_to)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e)))?;

        timer.observe_duration();

        Ok((invoices, total))
    }

    /// Apply a partial update. The stay is validated against the merged
    /// arrival and departure dates.
    #[instrument(skip(self, changes))]
    pub async fn update_invoice(
        &self,
        invoice_id: i64,
        changes: &InvoiceChanges,
    ) -> Result<Option<Invoice>, AppError> {
        let timer = QueryTimer::start("update_invoice");

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let current = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1 FOR UPDATE"
        ))
        .bind(invoice_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e)))?;

        let Some(current) = current else {
            return Ok(None);
        };

        validate_stay_dates(
            changes.arrival_date.or(current.arrival_date),
            changes.departure_date.or(current.departure_date),
        )?;

        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET invoice_number = COALESCE($2, invoice_number),
                cufe = COALESCE($3, cufe),
                provider_name = COALESCE($4, provider_name),
                provider_nit = COALESCE($5, provider_nit),
                client_name = COALESCE($6, client_name),
                client_nit = COALESCE($7, client_nit),
                client_address = COALESCE($8, client_address),
                client_email = COALESCE($9, client_email),
                issue_date = COALESCE($10, issue_date),
                authorization_date = COALESCE($11, authorization_date),
                arrival_date = COALESCE($12, arrival_date),
                departure_date = COALESCE($13, departure_date),
                guest_name = COALESCE($14, guest_name),
                cashier_id = COALESCE($15, cashier_id),
                reservation_number = COALESCE($16, reservation_number),
                total_amount = COALESCE($17, total_amount),
                payment_method = COALESCE($18, payment_method),
                payment_terms = COALESCE($19, payment_terms),
                bank_account = COALESCE($20, bank_account),
                additional_info = COALESCE($21, additional_info),
                loaded_in_settlement = COALESCE($22, loaded_in_settlement),
                paid = COALESCE($23, paid),
                reviewed_by = COALESCE($24, reviewed_by),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(invoice_id)
        .bind(&changes.invoice_number)
        .bind(&changes.cufe)
        .bind(&changes.provider_name)
        .bind(&changes.provider_nit)
        .bind(&changes.client_name)
        .bind(&changes.client_nit)
        .bind(&changes.client_address)
        .bind(&changes.client_email)
        .bind(changes.issue_date)
        .bind(changes.authorization_date)
        .bind(changes.arrival_date)
        .bind(changes.departure_date)
        .bind(&changes.guest_name)
        .bind(&changes.cashier_id)
        .bind(&changes.reservation_number)
        .bind(changes.total_amount)
        .bind(&changes.payment_method)
        .bind(&changes.payment_terms)
        .bind(&changes.bank_account)
        .bind(&changes.additional_info)
        .bind(changes.loaded_in_settlement)
        .bind(changes.paid)
        .bind(&changes.reviewed_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update invoice: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(invoice_id = invoice_id, "Invoice updated");

        Ok(Some(invoice))
    }

    /// Delete an invoice; its items go with it.
    #[instrument(skip(self))]
    pub async fn delete_invoice(&self, invoice_id: i64) -> Result<bool, AppError> {
        let timer = QueryTimer::start("delete_invoice");

        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(invoice_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete invoice: {}", e))
            })?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(invoice_id = invoice_id, "Invoice deleted");
        }

        Ok(deleted)
    }

    /// Counters and amounts over all invoices.
    #[instrument(skip(self))]
    pub async fn invoice_stats(&self) -> Result<InvoiceStats, AppError> {
        let timer = QueryTimer::start("invoice_stats");

        let stats = sqlx::query_as::<_, InvoiceStats>(
            r#"
            SELECT COUNT(*) AS total,
                COUNT(*) FILTER (WHERE paid) AS paid,
                COUNT(*) FILTER (WHERE NOT paid) AS unpaid,
                COUNT(*) FILTER (WHERE loaded_in_settlement) AS loaded_in_settlement,
                COALESCE(SUM(total_amount), 0) AS total_amount,
                COALESCE(SUM(total_amount) FILTER (WHERE paid), 0) AS paid_amount,
                COALESCE(SUM(total_amount) FILTER (WHERE NOT paid), 0) AS unpaid_amount
            FROM invoices
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to compute invoice stats: {}", e))
        })?;

        timer.observe_duration();

        Ok(stats)
    }

    // -------------------------------------------------------------------------
    // Invoice Item Reads
    // -------------------------------------------------------------------------

    /// Items of an invoice in insertion order; `None` when the invoice
    /// does not exist.
    #[instrument(skip(self))]
    pub async fn list_items(&self, invoice_id: i64) -> Result<Option<Vec<InvoiceItem>>, AppError> {
        let timer = QueryTimer::start("list_items");

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM invoices WHERE id = $1)")
                .bind(invoice_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to check invoice: {}", e))
                })?;

        if !exists {
            return Ok(None);
        }

        let items = sqlx::query_as::<_, InvoiceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE invoice_id = $1 ORDER BY id"
        ))
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list items: {}", e)))?;

        timer.observe_duration();

        Ok(Some(items))
    }

    /// Get an item by ID.
    #[instrument(skip(self))]
    pub async fn get_item(&self, item_id: i64) -> Result<Option<InvoiceItem>, AppError> {
        let timer = QueryTimer::start("get_item");

        let item = sqlx::query_as::<_, InvoiceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE id = $1"
        ))
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get item: {}", e)))?;

        timer.observe_duration();

        Ok(item)
    }
}

/// Insert an invoice row through any executor (pool or open transaction).
pub(crate) async fn insert_invoice<'e, E: PgExecutor<'e>>(
    executor: E,
    input: &NewInvoice,
    total_amount: Decimal,
) -> Result<Invoice, AppError> {
    sqlx::query_as::<_, Invoice>(&format!(
        r#"
        INSERT INTO invoices (
            invoice_number, cufe, provider_name, provider_nit, client_name, client_nit,
            client_address, client_email, issue_date, authorization_date, arrival_date,
            departure_date, guest_name, cashier_id, reservation_number, total_amount,
            payment_method, payment_terms, bank_account, additional_info,
            loaded_in_settlement, paid, reviewed_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
            $17, $18, $19, $20, $21, $22, $23)
        RETURNING {INVOICE_COLUMNS}
        "#
    ))
    .bind(&input.invoice_number)
    .bind(&input.cufe)
    .bind(&input.provider_name)
    .bind(&input.provider_nit)
    .bind(&input.client_name)
    .bind(&input.client_nit)
    .bind(&input.client_address)
    .bind(&input.client_email)
    .bind(input.issue_date)
    .bind(input.authorization_date)
    .bind(input.arrival_date)
    .bind(input.departure_date)
    .bind(&input.guest_name)
    .bind(&input.cashier_id)
    .bind(&input.reservation_number)
    .bind(total_amount)
    .bind(&input.payment_method)
    .bind(&input.payment_terms)
    .bind(&input.bank_account)
    .bind(&input.additional_info)
    .bind(input.loaded_in_settlement)
    .bind(input.paid)
    .bind(&input.reviewed_by)
    .fetch_one(executor)
    .await
    .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create invoice: {}", e)))
}
