//! AWS S3 client wrapper
//!
//! Thin [`ObjectStore`] implementation over the AWS SDK. Requests are
//! sent with retries disabled; failures are logged and surfaced as
//! [`Error::BackendUnavailable`], except a get of a missing key which
//! maps to [`Error::NotFound`].

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client;
use bytes::Bytes;

use crate::config::S3Section;
use crate::{Error, Result};

use super::ObjectStore;

/// S3 repository backed by the AWS SDK client.
pub struct S3Repository {
    client: Client,
}

impl S3Repository {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from configuration.
    ///
    /// Credential sources are tried in order: named profile, static
    /// key pair, then the SDK default provider chain.
    pub async fn from_config(config: &S3Section) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .retry_config(RetryConfig::disabled());

        let profile = config.profile.as_deref().filter(|p| !p.is_empty());
        let access_key_id = config.access_key_id.as_deref().filter(|k| !k.is_empty());
        let secret_access_key = config
            .secret_access_key
            .as_deref()
            .filter(|k| !k.is_empty());

        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        } else if let (Some(key), Some(secret)) = (access_key_id, secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key,
                secret,
                None,
                None,
                "filegate-config",
            ));
        }

        let shared_config = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);

        if let Some(endpoint_url) = &config.endpoint {
            builder = builder.endpoint_url(endpoint_url).force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Repository {
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let response = match self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let e = e.into_service_error();
                if e.is_no_such_key() {
                    return Err(Error::not_found(format!("s3://{}/{}", bucket, key)));
                }
                tracing::error!("S3 get failed for {}/{}: {}", bucket, key, e);
                return Err(Error::backend(format!("S3 get failed: {}", e)));
            }
        };

        let data = response.body.collect().await.map_err(|e| {
            tracing::error!("S3 body read failed for {}/{}: {}", bucket, key, e);
            Error::backend(format!("S3 body read failed: {}", e))
        })?;

        let data = data.into_bytes();
        tracing::debug!("Fetched s3://{}/{} ({} bytes)", bucket, key, data.len());
        Ok(data)
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<()> {
        let size = data.len();
        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data));

        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        request.send().await.map_err(|e| {
            tracing::error!("S3 put failed for {}/{}: {}", bucket, key, e);
            Error::backend(format!("S3 put failed: {}", e))
        })?;

        tracing::debug!("Stored s3://{}/{} ({} bytes)", bucket, key, size);
        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("S3 list failed for {}/{}: {}", bucket, prefix, e);
                Error::backend(format!("S3 list failed: {}", e))
            })?;

        let keys: Vec<String> = response
            .contents()
            .iter()
            .filter_map(|obj| obj.key().map(|k| k.to_string()))
            .collect();

        tracing::debug!("Listed {} objects under s3://{}/{}", keys.len(), bucket, prefix);
        Ok(keys)
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("S3 delete failed for {}/{}: {}", bucket, key, e);
                Error::backend(format!("S3 delete failed: {}", e))
            })?;

        tracing::debug!("Deleted s3://{}/{}", bucket, key);
        Ok(())
    }

    async fn delete_many(&self, bucket: &str, keys: &[String]) -> Result<()> {
        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key.as_str()).build())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::backend(format!("S3 delete request invalid: {}", e)))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| Error::backend(format!("S3 delete request invalid: {}", e)))?;

        self.client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("S3 bulk delete failed in {}: {}", bucket, e);
                Error::backend(format!("S3 bulk delete failed: {}", e))
            })?;

        tracing::debug!("Deleted {} objects from s3://{}", keys.len(), bucket);
        Ok(())
    }
}
