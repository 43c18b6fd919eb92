//! Database service for provider-service.

use crate::models::{NewProvider, Provider, ProviderChanges, ProviderFilter, ProviderStats};
use crate::services::metrics::QueryTimer;
use service_core::config::DatabaseConfig;
use service_core::database::contains_pattern;
use service_core::error::AppError;
use service_core::pagination::PageRequest;
use service_core::status::{counts_by_key, StatusSummary, INACTIVE};
use sqlx::postgres::PgPool;
use tracing::{info, instrument};

const PROVIDER_COLUMNS: &str = "id, hotel_code, business_name, name, identification, address, \
    phone, provider_type, status, city_id, dropbox_link, created_at, updated_at";

const PROVIDER_FILTER: &str = r#"
    ($1::text IS NULL
        OR name ILIKE $1 ESCAPE '\'
        OR business_name ILIKE $1 ESCAPE '\'
        OR identification ILIKE $1 ESCAPE '\')
    AND ($2::smallint IS NULL OR status = $2)
    AND ($3::int IS NULL OR provider_type = $3)
    AND ($4::int IS NULL OR city_id = $4)
"#;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    #[instrument(skip(config), fields(service = "provider-service"))]
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

    #[instrument(skip(self, input), fields(hotel_code = ?input.hotel_code))]
    pub async fn create_provider(&self, input: &NewProvider) -> Result<Provider, AppError> {
        let timer = QueryTimer::start("create_provider");

        let provider = sqlx::query_as::<_, Provider>(&format!(
            r#"
            INSERT INTO providers (
                hotel_code, business_name, name, identification, address, phone,
                provider_type, status, city_id, dropbox_link
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PROVIDER_COLUMNS}
            "#
        ))
        .bind(input.hotel_code)
        .bind(&input.business_name)
        .bind(&input.name)
        .bind(&input.identification)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(input.provider_type)
        .bind(input.status)
        .bind(input.city_id)
        .bind(&input.dropbox_link)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create provider: {}", e)))?;

        timer.observe_duration();

        info!(provider_id = provider.id, "Provider created");

        Ok(provider)
    }

    #[instrument(skip(self))]
    pub async fn get_provider(&self, provider_id: i64) -> Result<Option<Provider>, AppError> {
        let timer = QueryTimer::start("get_provider");

        let provider = sqlx::query_as::<_, Provider>(&format!(
            "SELECT {PROVIDER_COLUMNS} FROM providers WHERE id = $1"
        ))
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get provider: {}", e)))?;

        timer.observe_duration();

        Ok(provider)
    }

    /// Newest first, with the total number of matches.
    #[instrument(skip(self, filter))]
    pub async fn list_providers(
        &self,
        filter: &ProviderFilter,
        page: PageRequest,
    ) -> Result<(Vec<Provider>, i64), AppError> {
        let timer = QueryTimer::start("list_providers");
        let search = filter
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(contains_pattern);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM providers WHERE {PROVIDER_FILTER}"
        ))
        .bind(search.as_deref())
        .bind(filter.status)
        .bind(filter.provider_type)
        .bind(filter.city_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count providers: {}", e)))?;

        let providers = sqlx::query_as::<_, Provider>(&format!(
            "SELECT {PROVIDER_COLUMNS} FROM providers WHERE {PROVIDER_FILTER} \
             ORDER BY id DESC LIMIT $5 OFFSET $6"
        ))
        .bind(search.as_deref())
        .bind(filter.status)
        .bind(filter.provider_type)
        .bind(filter.city_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list providers: {}", e)))?;

        timer.observe_duration();

        Ok((providers, total))
    }

    #[instrument(skip(self, changes))]
    pub async fn update_provider(
        &self,
        provider_id: i64,
        changes: &ProviderChanges,
    ) -> Result<Option<Provider>, AppError> {
        let timer = QueryTimer::start("update_provider");

        let provider = sqlx::query_as::<_, Provider>(&format!(
            r#"
            UPDATE providers
            SET hotel_code = COALESCE($2, hotel_code),
                business_name = COALESCE($3, business_name),
                name = COALESCE($4, name),
                identification = COALESCE($5, identification),
                address = COALESCE($6, address),
                phone = COALESCE($7, phone),
                provider_type = COALESCE($8, provider_type),
                status = COALESCE($9, status),
                city_id = COALESCE($10, city_id),
                dropbox_link = COALESCE($11, dropbox_link),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROVIDER_COLUMNS}
            "#
        ))
        .bind(provider_id)
        .bind(changes.hotel_code)
        .bind(&changes.business_name)
        .bind(&changes.name)
        .bind(&changes.identification)
        .bind(&changes.address)
        .bind(&changes.phone)
        .bind(changes.provider_type)
        .bind(changes.status)
        .bind(changes.city_id)
        .bind(&changes.dropbox_link)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update provider: {}", e)))?;

        timer.observe_duration();

        if provider.is_some() {
            info!(provider_id = provider_id, "Provider updated");
        }

        Ok(provider)
    }

    /// Soft delete: the row stays, marked inactive.
    #[instrument(skip(self))]
    pub async fn deactivate_provider(&self, provider_id: i64) -> Result<bool, AppError> {
        let timer = QueryTimer::start("deactivate_provider");

        let result =
            sqlx::query("UPDATE providers SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(provider_id)
                .bind(INACTIVE)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to deactivate provider: {}",
                        e
                    ))
                })?;

        timer.observe_duration();

        let found = result.rows_affected() > 0;
        if found {
            info!(provider_id = provider_id, "Provider deactivated");
        }

        Ok(found)
    }

    #[instrument(skip(self))]
    pub async fn provider_stats(&self) -> Result<ProviderStats, AppError> {
        let timer = QueryTimer::start("provider_stats");

        let by_status: Vec<(Option<i16>, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM providers GROUP BY status")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to compute provider stats: {}",
                        e
                    ))
                })?;

        let by_type: Vec<(Option<i32>, i64)> =
            sqlx::query_as("SELECT provider_type, COUNT(*) FROM providers GROUP BY provider_type")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to compute provider stats: {}",
                        e
                    ))
                })?;

        timer.observe_duration();

        Ok(ProviderStats {
            status: StatusSummary::from_counts(&by_status),
            by_type: counts_by_key(by_type),
        })
    }
}
