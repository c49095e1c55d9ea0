use config::{Config, ConfigError, Environment};
use lazy_static::lazy_static;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageBackend {
    Local,
    S3,
}

#[derive(Deserialize, Debug)]
pub struct Settings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_listen_port")]
    pub listen_port: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_pool_max_connections")]
    pub database_pool_max_connections: u32,
    //images
    #[serde(default = "default_image_backend")]
    pub image_backend: ImageBackend,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
    #[serde(default = "default_s3_endpoint")]
    pub s3_endpoint: String,
    #[serde(default = "default_s3_region")]
    pub s3_region: String,
    #[serde(default = "default_s3_bucket_name")]
    pub s3_bucket_name: String,
    #[serde(default)]
    pub s3_access_key: String,
    #[serde(default)]
    pub s3_secret_key: String,
    //retention
    #[serde(default = "default_job_retention_days")]
    pub job_retention_days: i64,
}

fn default_base_url() -> String {
    "http://localhost:8003".into()
}

fn default_service_name() -> String {
    "jobboard".into()
}

fn default_listen_port() -> String {
    "8003".into()
}

fn default_database_url() -> String {
    "sqlite://jobboard.db?mode=rwc".into()
}

fn default_pool_max_connections() -> u32 {
    5
}

fn default_image_backend() -> ImageBackend {
    ImageBackend::Local
}

fn default_upload_dir() -> String {
    "uploaded_images".into()
}

fn default_max_image_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_s3_endpoint() -> String {
    "http://localhost:9000".into()
}

fn default_s3_region() -> String {
    "us-east-1".into()
}

fn default_s3_bucket_name() -> String {
    "jobboard".into()
}

fn default_job_retention_days() -> i64 {
    100
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .add_source(Environment::default().try_parsing(true))
            .build()?;
        let mut s: Settings = conf.try_deserialize()?;
        s.base_url = s.base_url.trim_end_matches('/').to_string();
        if s.job_retention_days < 1 {
            return Err(ConfigError::Message(format!(
                "job_retention_days must be positive, got {}",
                s.job_retention_days
            )));
        }
        Ok(s)
    }
}

lazy_static! {
    pub static ref settings: Settings = Settings::new().expect("improperly configured");
}
