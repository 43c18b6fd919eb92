//! Database service for settlement-service.

use crate::models::{NewSettlement, Settlement, SettlementChanges, SettlementFilter};
use crate::services::metrics::QueryTimer;
use service_core::config::DatabaseConfig;
use service_core::database::contains_pattern;
use service_core::error::AppError;
use service_core::pagination::PageRequest;
use service_core::status::{StatusSummary, INACTIVE};
use sqlx::postgres::PgPool;
use tracing::{info, instrument};

const SETTLEMENT_COLUMNS: &str = "id, reservation_id, advisor_name, company_name, company_nit, \
    company_address, company_phone, service, service_date, service_includes, passenger_count, \
    settlement_value, vat_rate, vat_value, total_with_vat, passenger_name, settlement_date, \
    invoice_number, status, sales_channel, notes, created_at, updated_at";

const SETTLEMENT_FILTER: &str = r#"
    ($1::text IS NULL
        OR company_name ILIKE $1 ESCAPE '\'
        OR passenger_name ILIKE $1 ESCAPE '\'
        OR advisor_name ILIKE $1 ESCAPE '\'
        OR notes ILIKE $1 ESCAPE '\')
    AND ($2::smallint IS NULL OR status = $2)
    AND ($3::int IS NULL OR reservation_id = $3)
    AND ($4::int IS NULL OR invoice_number = $4)
"#;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    #[instrument(skip(config), fields(service = "settlement-service"))]
    pub async fn new(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = service_core::database::connect_pool(config).await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        service_core::database::ping(&self.pool).await
    }

    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        let mut migrator = sqlx::migrate!("./migrations");
        migrator.set_ignore_missing(true);
        migrator
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    #[instrument(skip(self, input), fields(reservation_id = ?input.reservation_id))]
    pub async fn create_settlement(&self, input: &NewSettlement) -> Result<Settlement, AppError> {
        let timer = QueryTimer::start("create_settlement");

        let settlement = sqlx::query_as::<_, Settlement>(&format!(
            r#"
            INSERT INTO settlements (
                reservation_id, advisor_name, company_name, company_nit, company_address,
                company_phone, service, service_date, service_includes, passenger_count,
                settlement_value, vat_rate, vat_value, total_with_vat, passenger_name,
                settlement_date, invoice_number, status, sales_channel, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18, $19, $20)
            RETURNING {SETTLEMENT_COLUMNS}
            "#
        ))
        .bind(input.reservation_id)
        .bind(&input.advisor_name)
        .bind(&input.company_name)
        .bind(&input.company_nit)
        .bind(&input.company_address)
        .bind(&input.company_phone)
        .bind(&input.service)
        .bind(input.service_date)
        .bind(&input.service_includes)
        .bind(input.passenger_count)
        .bind(input.settlement_value)
        .bind(input.vat_rate)
        .bind(input.vat_value)
        .bind(input.total_with_vat)
        .bind(&input.passenger_name)
        .bind(input.settlement_date)
        .bind(input.invoice_number)
        .bind(input.status)
        .bind(&input.sales_channel)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create settlement: {}", e))
        })?;

        timer.observe_duration();

        info!(settlement_id = settlement.id, "Settlement created");

        Ok(settlement)
    }

    #[instrument(skip(self))]
    pub async fn get_settlement(&self, settlement_id: i64) -> Result<Option<Settlement>, AppError> {
        let timer = QueryTimer::start("get_settlement");

        let settlement = sqlx::query_as::<_, Settlement>(&format!(
            "SELECT {SETTLEMENT_COLUMNS} FROM settlements WHERE id = $1"
        ))
        .bind(settlement_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get settlement: {}", e)))?;

        timer.observe_duration();

        Ok(settlement)
    }

    /// Newest first, with the total number of matches.
    #[instrument(skip(self, filter))]
    pub async fn list_settlements(
        &self,
        filter: &SettlementFilter,
        page: PageRequest,
    ) -> Result<(Vec<Settlement>, i64), AppError> {
        let timer = QueryTimer::start("list_settlements");
        let search = filter
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(contains_pattern);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM settlements WHERE {SETTLEMENT_FILTER}"
        ))
        .bind(search.as_deref())
        .bind(filter.status)
        .bind(filter.reservation_id)
        .bind(filter.invoice_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to count settlements: {}", e))
        })?;

        let settlements = sqlx::query_as::<_, Settlement>(&format!(
            "SELECT {SETTLEMENT_COLUMNS} FROM settlements WHERE {SETTLEMENT_FILTER} \
             ORDER BY id DESC LIMIT $5 OFFSET $6"
        ))
        .bind(search.as_deref())
        .bind(filter.status)
        .bind(filter.reservation_id)
        .bind(filter.invoice_number)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list settlements: {}", e))
        })?;

        timer.observe_duration();

        Ok((settlements, total))
    }

    #[instrument(skip(self, changes))]
    pub async fn update_settlement(
        &self,
        settlement_id: i64,
        changes: &SettlementChanges,
    ) -> Result<Option<Settlement>, AppError> {
        let timer = QueryTimer::start("update_settlement");

        let settlement = sqlx::query_as::<_, Settlement>(&format!(
            r#"
            UPDATE settlements
            SET reservation_id = COALESCE($2, reservation_id),
                advisor_name = COALESCE($3, advisor_name),
                company_name = COALESCE($4, company_name),
                company_nit = COALESCE($5, company_nit),
                company_address = COALESCE($6, company_address),
                company_phone = COALESCE($7, company_phone),
                service = COALESCE($8, service),
                service_date = COALESCE($9, service_date),
                service_includes = COALESCE($10, service_includes),
                passenger_count = COALESCE($11, passenger_count),
                settlement_value = COALESCE($12, settlement_value),
                vat_rate = COALESCE($13, vat_rate),
                vat_value = COALESCE($14, vat_value),
                total_with_vat = COALESCE($15, total_with_vat),
                passenger_name = COALESCE($16, passenger_name),
                settlement_date = COALESCE($17, settlement_date),
                invoice_number = COALESCE($18, invoice_number),
                status = COALESCE($19, status),
                sales_channel = COALESCE($20, sales_channel),
                notes = COALESCE($21, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SETTLEMENT_COLUMNS}
            "#
        ))
        .bind(settlement_id)
        .bind(changes.reservation_id)
        .bind(&changes.advisor_name)
        .bind(&changes.company_name)
        .bind(&changes.company_nit)
        .bind(&changes.company_address)
        .bind(&changes.company_phone)
        .bind(&changes.service)
        .bind(changes.service_date)
        .bind(&changes.service_includes)
        .bind(changes.passenger_count)
        .bind(changes.settlement_value)
        .bind(changes.vat_rate)
        .bind(changes.vat_value)
        .bind(changes.total_with_vat)
        .bind(&changes.passenger_name)
        .bind(changes.settlement_date)
        .bind(changes.invoice_number)
        .bind(changes.status)
        .bind(&changes.sales_channel)
        .bind(&changes.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update settlement: {}", e))
        })?;

        timer.observe_duration();

        if settlement.is_some() {
            info!(settlement_id = settlement_id, "Settlement updated");
        }

        Ok(settlement)
    }

    /// Soft delete: the row stays, marked inactive.
    #[instrument(skip(self))]
    pub async fn deactivate_settlement(&self, settlement_id: i64) -> Result<bool, AppError> {
        let timer = QueryTimer::start("deactivate_settlement");

        let result =
            sqlx::query("UPDATE settlements SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(settlement_id)
                .bind(INACTIVE)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to deactivate settlement: {}",
                        e
                    ))
                })?;

        timer.observe_duration();

        let found = result.rows_affected() > 0;
        if found {
            info!(settlement_id = settlement_id, "Settlement deactivated");
        }

        Ok(found)
    }

    #[instrument(skip(self))]
    pub async fn settlement_stats(&self) -> Result<StatusSummary, AppError> {
        let timer = QueryTimer::start("settlement_stats");

        let rows: Vec<(Option<i16>, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM settlements GROUP BY status")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to compute settlement stats: {}",
                        e
                    ))
                })?;

        timer.observe_duration();

        Ok(StatusSummary::from_counts(&rows))
    }
}
