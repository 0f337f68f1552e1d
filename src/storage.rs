use anyhow::Context;
use aws_config::SdkConfig;
use aws_credential_types::Credentials;
use aws_sdk_s3::{config::Builder as S3ConfigBuilder, Client};
use aws_smithy_types::byte_stream::ByteStream;
use axum::async_trait;
use bytes::Bytes;

use crate::config::S3Config;

#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;
    async fn delete_object(&self, key: &str) -> anyhow::Result<()>;
    /// Public URL of an object, as written to the user record.
    fn object_url(&self, key: &str) -> String;
}

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
    url_base: String,
}

impl Storage {
    pub fn new(shared: &SdkConfig, cfg: &S3Config, region: &str) -> Self {
        let mut builder = S3ConfigBuilder::from(shared);
        if let Some(endpoint) = &cfg.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        if let (Some(access), Some(secret)) = (&cfg.access_key, &cfg.secret_key) {
            builder = builder.credentials_provider(Credentials::new(
                access.as_str(),
                secret.as_str(),
                None,
                None,
                "static",
            ));
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: cfg.bucket.clone(),
            url_base: url_base(cfg, region),
        }
    }
}

/// Prefix that object keys are appended to when building public URLs.
pub fn url_base(cfg: &S3Config, region: &str) -> String {
    if let Some(base) = &cfg.public_base_url {
        return base.trim_end_matches('/').to_string();
    }
    match &cfg.endpoint {
        Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), cfg.bucket),
        None => format!("https://{}.s3.{}.amazonaws.com", cfg.bucket, region),
    }
}

#[async_trait]
impl StorageClient for Storage {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .with_context(|| format!("s3 put_object {key}"))?;
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("s3 delete_object {key}"))?;
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.url_base, key)
    }
}
