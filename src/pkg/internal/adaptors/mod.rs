use sqlx::migrate::Migrator;

pub mod jobs;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
