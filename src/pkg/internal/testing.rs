use std::{path::Path, sync::Arc};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::pkg::{
    internal::{
        adaptors::{
            MIGRATOR,
            jobs::spec::{Category, NewJob},
        },
        images::ImageStore,
    },
    server::state::AppState,
};

pub async fn create_test_pool() -> SqlitePool {
    // every connection to :memory: is its own database, so pin the pool to one
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    pool
}

/// Database file under `dir` shared by several connections, for tests that
/// need writers to contend for the lock.
pub async fn create_file_test_pool(dir: &Path) -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(dir.join("jobboard.db"))
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    pool
}

pub async fn create_test_state(upload_dir: &Path) -> AppState {
    test_state(create_test_pool().await, upload_dir)
}

pub async fn create_file_test_state(dir: &Path) -> AppState {
    test_state(create_file_test_pool(dir).await, &dir.join("images"))
}

fn test_state(pool: SqlitePool, upload_dir: &Path) -> AppState {
    AppState {
        db_pool: Arc::new(pool),
        images: Arc::new(ImageStore::local(upload_dir)),
        base_url: "http://localhost:8003".into(),
        max_image_bytes: 1024 * 1024,
    }
}

pub fn sample_job(category: Category, company_name: &str) -> NewJob {
    NewJob {
        category,
        company_name: company_name.into(),
        job_role: "Software Engineer".into(),
        website_link: Some("https://careers.example.com".into()),
        state: "Karnataka".into(),
        city: "Bengaluru".into(),
        experience: Some("Fresher".into()),
        qualification: "B.E / B.Tech".into(),
        batch: None,
        salary_package: Some("6 LPA".into()),
        job_description: "<p>Build and ship services.</p>".into(),
        key_responsibility: None,
        about_company: None,
        selection_process: Some("<ol><li>Online test</li><li>Interview</li></ol>".into()),
    }
}
