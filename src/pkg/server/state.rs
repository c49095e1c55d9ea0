use std::{str::FromStr, sync::Arc};

use sqlx::{
    Sqlite, SqlitePool, Transaction,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{
    conf::settings,
    pkg::internal::images::ImageStore,
    prelude::Result,
};

pub fn db_pool() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.database_url)?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(settings.database_pool_max_connections)
        .connect_lazy_with(options);
    Ok(pool)
}

pub trait GetTxn {
    fn begin_txn(&self) -> impl Future<Output = Result<Transaction<'static, Sqlite>>> + Send;

    /// Takes the write lock up front. A deferred transaction that reads before
    /// writing gets SQLITE_BUSY instead of waiting when another writer holds it.
    fn begin_write_txn(&self) -> impl Future<Output = Result<Transaction<'static, Sqlite>>> + Send;
}

impl GetTxn for SqlitePool {
    async fn begin_txn(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.begin().await?)
    }

    async fn begin_write_txn(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.begin_with("BEGIN IMMEDIATE").await?)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub db_pool: Arc<SqlitePool>,
    pub images: Arc<ImageStore>,
    pub base_url: String,
    pub max_image_bytes: usize,
}

impl AppState {
    pub async fn new() -> Result<AppState> {
        Ok(AppState {
            db_pool: Arc::new(db_pool()?),
            images: Arc::new(ImageStore::from_settings().await?),
            base_url: settings.base_url.clone(),
            max_image_bytes: settings.max_image_bytes,
        })
    }
}
