use crate::{
    pkg::{internal::adaptors::MIGRATOR, server::state::db_pool},
    prelude::{OrStandardError, Result},
};

pub async fn apply() -> Result<()> {
    let pool = db_pool()?;
    tracing::debug!("connected to db");
    MIGRATOR.run(&pool).await.or_err("ERR-DB-000")?;
    pool.close().await;
    println!("Migrations applied successfully");
    Ok(())
}
