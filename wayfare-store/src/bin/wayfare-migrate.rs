use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfare_store::{Config, DbClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load config")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = DbClient::new(&config.database)
        .await
        .context("Failed to connect to Postgres")?;

    db.migrate().await.context("Failed to run migrations")?;

    let drift = db.verify_schema().await.context("Failed to read live schema")?;
    if !drift.is_empty() {
        bail!("{} schema drift finding(s); see log for details", drift.len());
    }

    tracing::info!("Database is up to date");
    Ok(())
}
