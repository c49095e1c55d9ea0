use std::{io::ErrorKind, path::{Path, PathBuf}};

use aws_sdk_s3::Client;
use uuid::Uuid;

use crate::{
    conf::{ImageBackend, settings},
    pkg::internal::minio::{self, S3Ops},
    prelude::{Result, bad_request, not_found},
};

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl UploadedImage {
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase()
    }

    pub fn validate(&self, max_bytes: usize) -> Result<()> {
        let extension = self.extension();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(bad_request("ERR-IMG-001", &self.file_name));
        }
        if self.data.len() > max_bytes {
            return Err(bad_request(
                "ERR-IMG-002",
                format!("{} bytes, limit is {}", self.data.len(), max_bytes),
            ));
        }
        Ok(())
    }
}

pub fn content_type_for(key: &str) -> &'static str {
    match key.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Keys are generated by [`ImageStore::put`]; anything else is refused so a
/// key can never address a path outside the store.
pub fn is_valid_key(key: &str) -> bool {
    let Some((stem, extension)) = key.rsplit_once('.') else {
        return false;
    };
    stem.chars().any(|c| c.is_ascii_alphanumeric())
        && stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && ALLOWED_EXTENSIONS.contains(&extension.to_lowercase().as_str())
}

fn slugify(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let slug = slug.trim_matches('_');
    if slug.is_empty() { "job".to_string() } else { slug.to_string() }
}

#[derive(Debug)]
pub enum ImageStore {
    Local { root: PathBuf },
    S3 { client: Client, bucket: String },
}

impl ImageStore {
    pub fn local(root: impl Into<PathBuf>) -> Self {
        ImageStore::Local { root: root.into() }
    }

    pub async fn from_settings() -> Result<Self> {
        match settings.image_backend {
            ImageBackend::Local => {
                tracing::info!("storing images under {}", &settings.upload_dir);
                Ok(ImageStore::local(&settings.upload_dir))
            }
            ImageBackend::S3 => {
                let client = minio::client();
                if minio::create_bucket(&client, &settings.s3_bucket_name).await?.is_some() {
                    tracing::info!("created bucket {}", &settings.s3_bucket_name);
                }
                Ok(ImageStore::S3 {
                    client,
                    bucket: settings.s3_bucket_name.clone(),
                })
            }
        }
    }

    /// Stores the image under a fresh key derived from the company name and
    /// returns that key.
    pub async fn put(&self, company_name: &str, image: UploadedImage) -> Result<String> {
        let key = format!("{}-{}.{}", slugify(company_name), Uuid::new_v4(), image.extension());
        let size = image.data.len();
        match self {
            ImageStore::Local { root } => {
                tokio::fs::create_dir_all(root).await?;
                tokio::fs::write(root.join(&key), image.data).await?;
            }
            ImageStore::S3 { client, bucket } => {
                client
                    .upload_object(bucket, &key, image.data, content_type_for(&key))
                    .await?;
            }
        }
        tracing::debug!("stored image {} ({} bytes)", &key, size);
        Ok(key)
    }

    pub async fn get(&self, key: &str) -> Result<(Vec<u8>, String)> {
        if !is_valid_key(key) {
            return Err(not_found("ERR-IMG-003"));
        }
        match self {
            ImageStore::Local { root } => match tokio::fs::read(root.join(key)).await {
                Ok(data) => Ok((data, content_type_for(key).to_string())),
                Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found("ERR-IMG-003")),
                Err(e) => Err(e.into()),
            },
            ImageStore::S3 { client, bucket } => client.retrieve_object(bucket, key).await,
        }
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        if !is_valid_key(key) {
            return Err(not_found("ERR-IMG-003"));
        }
        match self {
            ImageStore::Local { root } => match tokio::fs::remove_file(root.join(key)).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found("ERR-IMG-003")),
                Err(e) => Err(e.into()),
            },
            ImageStore::S3 { client, bucket } => client.remove_object(bucket, key).await,
        }
    }

    /// Deletes an image that is no longer referenced; failures are only logged.
    pub async fn discard(&self, key: &str) {
        match self.delete(key).await {
            Ok(()) => tracing::debug!("removed image {}", key),
            Err(e) => tracing::warn!("could not remove image {}: {:?}", key, e),
        }
    }
}
