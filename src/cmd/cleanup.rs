use crate::{
    conf::settings,
    pkg::{
        internal::{images::ImageStore, retention},
        server::state::db_pool,
    },
    prelude::Result,
};

pub async fn sweep(days: Option<i64>) -> Result<()> {
    let days = days.unwrap_or(settings.job_retention_days);
    let pool = db_pool()?;
    let images = ImageStore::from_settings().await?;
    tracing::info!("{} cleanup start", "=".repeat(20));
    let removed = retention::sweep(&pool, &images, days).await?;
    tracing::info!("removed {} posting(s) older than {} days", removed, days);
    retention::statistics(&pool).await?.log();
    tracing::info!("{} cleanup end", "=".repeat(20));
    pool.close().await;
    Ok(())
}

pub async fn stats() -> Result<()> {
    let pool = db_pool()?;
    retention::statistics(&pool).await?.log();
    pool.close().await;
    Ok(())
}
