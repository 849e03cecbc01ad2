use std::env;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::{primitives::ByteStream as AwsByteStream, Client};
use futures::StreamExt;

use crate::store::url_path;
use crate::{BlobError, BlobResult, BlobStore, ByteStream, GetResult, ObjectHead, PutResult};

/// Connection settings for an S3-compatible bucket
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint_url: Option<String>,
    /// When set, download URLs are `<public_base_url>/<key>` instead of
    /// presigned GET URLs
    pub public_base_url: Option<String>,
    pub presign_expiry_secs: u64,
}

impl S3Config {
    /// Read `PANTRY_S3_*` environment variables.
    ///
    /// `BUCKET`, `REGION`, `ACCESS_KEY_ID` and `SECRET_ACCESS_KEY` are
    /// required; `ENDPOINT_URL`, `PUBLIC_BASE_URL` and
    /// `PRESIGN_EXPIRY_SECS` are optional.
    pub fn from_env() -> BlobResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> BlobResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .ok_or_else(|| BlobError::config(format!("{} environment variable required", key)))
        };

        Ok(Self {
            bucket: required("PANTRY_S3_BUCKET")?,
            region: required("PANTRY_S3_REGION")?,
            access_key_id: required("PANTRY_S3_ACCESS_KEY_ID")?,
            secret_access_key: required("PANTRY_S3_SECRET_ACCESS_KEY")?,
            endpoint_url: lookup("PANTRY_S3_ENDPOINT_URL"),
            public_base_url: lookup("PANTRY_S3_PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            presign_expiry_secs: lookup("PANTRY_S3_PRESIGN_EXPIRY_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(7 * 24 * 3600),
        })
    }
}

/// Blob store backed by an S3-compatible bucket (AWS, MinIO, RustFS, ...)
#[derive(Clone)]
pub struct S3CompatibleStore {
    client: Client,
    bucket: String,
    public_base_url: Option<String>,
    presign_expiry: Duration,
}

impl S3CompatibleStore {
    pub async fn from_env() -> BlobResult<Self> {
        Ok(Self::connect(S3Config::from_env()?).await)
    }

    pub async fn connect(config: S3Config) -> Self {
        let credentials = Credentials::new(
            config.access_key_id,
            config.secret_access_key,
            None,
            None,
            "pantry",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region))
            .credentials_provider(credentials);
        let path_style = config.endpoint_url.is_some();
        if let Some(endpoint) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let client = Client::from_conf(
            aws_sdk_s3::config::Builder::from(&shared)
                .force_path_style(path_style) // custom endpoints are usually path-style
                .build(),
        );

        Self {
            client,
            bucket: config.bucket,
            public_base_url: config.public_base_url,
            presign_expiry: Duration::from_secs(config.presign_expiry_secs),
        }
    }

    async fn collect_stream(stream: &mut ByteStream) -> BlobResult<Vec<u8>> {
        let mut data = Vec::new();
        while let Some(chunk) = stream.next().await {
            data.extend_from_slice(&chunk?);
        }
        Ok(data)
    }

    fn map_aws_error(err: impl std::error::Error + Send + Sync + 'static) -> BlobError {
        BlobError::backend(err)
    }

    fn map_head_error<R>(key: &str, err: SdkError<HeadObjectError, R>) -> BlobError
    where
        R: std::fmt::Debug + Send + Sync + 'static,
    {
        match err.as_service_error() {
            Some(e) if e.is_not_found() => BlobError::not_found(key),
            _ => Self::map_aws_error(err),
        }
    }

    fn map_get_error<R>(key: &str, err: SdkError<GetObjectError, R>) -> BlobError
    where
        R: std::fmt::Debug + Send + Sync + 'static,
    {
        match err.as_service_error() {
            Some(e) if e.is_no_such_key() => BlobError::not_found(key),
            _ => Self::map_aws_error(err),
        }
    }
}

#[async_trait]
impl BlobStore for S3CompatibleStore {
    async fn put(
        &self,
        key: &str,
        content_type: Option<&str>,
        mut stream: ByteStream,
    ) -> BlobResult<PutResult> {
        let data = Self::collect_stream(&mut stream).await?;
        let size_bytes = data.len() as u64;

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(AwsByteStream::from(data));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        let result = request.send().await.map_err(Self::map_aws_error)?;

        Ok(PutResult {
            etag: result.e_tag,
            size_bytes,
        })
    }

    async fn get(&self, key: &str) -> BlobResult<GetResult> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Self::map_get_error(key, e))?;
        let content_length = result.content_length.unwrap_or(0) as u64;

        let body = result.body.collect().await.map_err(Self::map_aws_error)?;
        let stream = futures::stream::once(async move { Ok(body.into_bytes()) });

        Ok(GetResult {
            stream: Box::pin(stream),
            size_bytes: content_length,
            content_type: result.content_type,
            etag: result.e_tag,
        })
    }

    async fn head(&self, key: &str) -> BlobResult<ObjectHead> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Self::map_head_error(key, e))?;

        Ok(ObjectHead {
            size_bytes: result.content_length.unwrap_or(0) as u64,
            content_type: result.content_type,
            etag: result.e_tag,
            last_modified: result.last_modified.map(|dt| dt.secs()),
        })
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(Self::map_aws_error)?;
        Ok(())
    }

    async fn download_url(&self, key: &str) -> BlobResult<String> {
        self.head(key).await?;

        if let Some(base) = &self.public_base_url {
            return Ok(format!("{}/{}", base, url_path(key)));
        }

        let presigning =
            PresigningConfig::expires_in(self.presign_expiry).map_err(Self::map_aws_error)?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(Self::map_aws_error)?;
        Ok(request.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn config_requires_bucket_and_credentials() {
        let err = S3Config::from_lookup(lookup(&[("PANTRY_S3_BUCKET", "pantry")])).unwrap_err();
        assert!(err.to_string().contains("PANTRY_S3_REGION"));
    }

    #[test]
    fn config_reads_optional_settings() {
        let config = S3Config::from_lookup(lookup(&[
            ("PANTRY_S3_BUCKET", "pantry"),
            ("PANTRY_S3_REGION", "us-east-1"),
            ("PANTRY_S3_ACCESS_KEY_ID", "key"),
            ("PANTRY_S3_SECRET_ACCESS_KEY", "secret"),
            ("PANTRY_S3_ENDPOINT_URL", "http://localhost:9000"),
            ("PANTRY_S3_PUBLIC_BASE_URL", "https://img.example/pantry/"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.public_base_url.as_deref(), Some("https://img.example/pantry"));
        assert_eq!(config.presign_expiry_secs, 7 * 24 * 3600);
    }

    #[test]
    fn missing_objects_map_to_not_found() {
        use aws_sdk_s3::types::error::{NoSuchKey, NotFound};

        let head: SdkError<HeadObjectError, ()> =
            SdkError::service_error(HeadObjectError::NotFound(NotFound::builder().build()), ());
        assert!(matches!(
            S3CompatibleStore::map_head_error("inventory-images/Onion", head),
            BlobError::NotFound { key } if key == "inventory-images/Onion"
        ));

        let get: SdkError<GetObjectError, ()> =
            SdkError::service_error(GetObjectError::NoSuchKey(NoSuchKey::builder().build()), ());
        assert!(matches!(
            S3CompatibleStore::map_get_error("inventory-images/Onion", get),
            BlobError::NotFound { .. }
        ));
    }

    #[test]
    fn other_failures_stay_backend_errors() {
        let head: SdkError<HeadObjectError, ()> = SdkError::timeout_error("head timed out");
        assert!(matches!(
            S3CompatibleStore::map_head_error("k", head),
            BlobError::Backend { .. }
        ));
    }
}
