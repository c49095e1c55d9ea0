use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region},
    primitives::ByteStream,
};
use standard_error::{Interpolate, StandardError};

use crate::{
    conf::settings,
    prelude::{Result, not_found},
};

pub fn client() -> Client {
    let credentials = Credentials::new(
        &settings.s3_access_key,
        &settings.s3_secret_key,
        None,
        None,
        "jobboard",
    );
    let conf = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(settings.s3_region.clone()))
        .endpoint_url(&settings.s3_endpoint)
        .credentials_provider(credentials)
        .force_path_style(true)
        .build();
    Client::from_conf(conf)
}

fn storage_error(err: impl std::fmt::Display) -> StandardError {
    StandardError::new("ERR-S3-001").interpolate_err(err.to_string())
}

pub async fn create_bucket(
    client: &Client,
    bucket_name: &str,
) -> Result<Option<aws_sdk_s3::operation::create_bucket::CreateBucketOutput>> {
    let mut create = client.create_bucket().bucket(bucket_name);
    // us-east-1 is the implicit location and is rejected when sent explicitly
    if settings.s3_region != "us-east-1" {
        let constraint = aws_sdk_s3::types::BucketLocationConstraint::from(settings.s3_region.as_str());
        let cfg = aws_sdk_s3::types::CreateBucketConfiguration::builder()
            .location_constraint(constraint)
            .build();
        create = create.create_bucket_configuration(cfg);
    }
    create.send().await.map(Some).or_else(|err| {
        if err
            .as_service_error()
            .map(|se| se.is_bucket_already_exists() || se.is_bucket_already_owned_by_you())
            == Some(true)
        {
            Ok(None)
        } else {
            Err(storage_error(err))
        }
    })
}

pub trait S3Ops {
    fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    fn retrieve_object(&self, bucket: &str, key: &str) -> impl Future<Output = Result<(Vec<u8>, String)>> + Send;

    fn remove_object(&self, bucket: &str, key: &str) -> impl Future<Output = Result<()>> + Send;
}

impl S3Ops for Client {
    async fn upload_object(&self, bucket: &str, key: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        self.put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(storage_error)?;
        tracing::debug!("uploaded {} to bucket {}", key, bucket);
        Ok(())
    }

    async fn retrieve_object(&self, bucket: &str, key: &str) -> Result<(Vec<u8>, String)> {
        let object = match self.get_object().bucket(bucket).key(key).send().await {
            Ok(object) => object,
            Err(err) => {
                if err.as_service_error().map(|se| se.is_no_such_key()) == Some(true) {
                    return Err(not_found("ERR-IMG-003"));
                }
                return Err(storage_error(err));
            }
        };
        let content_type = object
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = object.body.collect().await.map_err(storage_error)?.into_bytes().to_vec();
        Ok((data, content_type))
    }

    async fn remove_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}
