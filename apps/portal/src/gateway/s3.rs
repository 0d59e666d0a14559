//! S3-compatible object storage gateway (MinIO locally, AWS in production).

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::{error, info};

use crate::gateway::{BucketConfig, GatewayError, StorageGateway, StoredObject};

/// Maps an SDK error to a storage error, naming a missing bucket explicitly
/// so callers can recognise it.
fn storage_error<E>(bucket: &str, action: &str, err: E) -> GatewayError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    match err.code() {
        Some("NoSuchBucket") => GatewayError::Storage(format!("Bucket not found: {bucket}")),
        Some("NoSuchKey") => GatewayError::NotFound(format!("object in bucket {bucket}")),
        _ => {
            error!("S3 {action} failed: {}", DisplayErrorContext(&err));
            GatewayError::Storage(format!("{action} failed: {err}"))
        }
    }
}

#[derive(Clone)]
pub struct S3StorageGateway {
    client: S3Client,
    bucket: BucketConfig,
    public_base_url: String,
}

impl S3StorageGateway {
    pub fn new(client: S3Client, bucket: BucketConfig, public_base_url: &str) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StorageGateway for S3StorageGateway {
    async fn list_buckets(&self) -> Result<Vec<String>, GatewayError> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| storage_error(&self.bucket.name, "list buckets", e))?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect())
    }

    async fn create_bucket(&self, config: &BucketConfig) -> Result<(), GatewayError> {
        let created = self.client.create_bucket().bucket(&config.name).send().await;
        match created {
            Ok(_) => {
                info!("Created bucket {}", config.name);
                Ok(())
            }
            Err(err)
                if err
                    .as_service_error()
                    .map(|se| se.is_bucket_already_exists() || se.is_bucket_already_owned_by_you())
                    == Some(true) =>
            {
                Ok(())
            }
            Err(err) => Err(storage_error(&config.name, "create bucket", err)),
        }
    }

    async fn upload(
        &self,
        path: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String, GatewayError> {
        self.bucket.check_upload(content_type, bytes.len() as u64)?;

        self.client
            .put_object()
            .bucket(&self.bucket.name)
            .key(path)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| storage_error(&self.bucket.name, "upload", e))?;

        info!("Uploaded s3://{}/{}", self.bucket.name, path);
        Ok(path.to_string())
    }

    async fn download(&self, path: &str) -> Result<StoredObject, GatewayError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket.name)
            .key(path)
            .send()
            .await
            .map_err(|e| storage_error(&self.bucket.name, "download", e))?;

        let content_type = output
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| GatewayError::Storage(format!("download failed: {e}")))?
            .into_bytes();

        Ok(StoredObject {
            bytes,
            content_type,
        })
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.bucket.name, path)
    }

    async fn delete(&self, path: &str) -> Result<(), GatewayError> {
        self.client
            .delete_object()
            .bucket(&self.bucket.name)
            .key(path)
            .send()
            .await
            .map_err(|e| storage_error(&self.bucket.name, "delete", e))?;
        info!("Deleted s3://{}/{}", self.bucket.name, path);
        Ok(())
    }
}
