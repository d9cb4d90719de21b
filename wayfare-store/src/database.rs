use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::{info, warn};
use wayfare_core::schema::TABLES;

use crate::app_config::DatabaseConfig;
use crate::schema_check::{diff_table, LiveColumn, SchemaDrift};

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.url)
            .await?;

        info!(max_connections = config.max_connections, "Database pool ready");
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed successfully.");
        Ok(())
    }

    /// Checks every declared table against `information_schema`.
    pub async fn verify_schema(&self) -> Result<Vec<SchemaDrift>, sqlx::Error> {
        let mut drift = Vec::new();

        for table in TABLES {
            // information_schema uses its own domain types; cast to text for decoding.
            let live = sqlx::query_as::<_, LiveColumn>(
                r#"
                SELECT column_name::text AS column_name,
                       data_type::text AS data_type,
                       is_nullable::text AS is_nullable
                FROM information_schema.columns
                WHERE table_schema = current_schema() AND table_name = $1
                "#,
            )
            .bind(table.name)
            .fetch_all(&self.pool)
            .await?;

            for finding in diff_table(table, &live) {
                warn!(table = table.name, "Schema drift: {}", finding);
                drift.push(finding);
            }
        }

        if drift.is_empty() {
            info!(tables = TABLES.len(), "Schema matches declared tables");
        }
        Ok(drift)
    }
}
