use crate::domain::ports::ArtifactStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStore {
    base_path: String,
}

impl LocalStore {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

#[async_trait]
impl ArtifactStore for LocalStore {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        Ok(full_path.display().to_string())
    }
}

#[cfg(feature = "lambda")]
pub use s3::S3Store;

#[cfg(feature = "lambda")]
mod s3 {
    use crate::domain::ports::ArtifactStore;
    use crate::utils::error::{ClaimError, Result};
    use async_trait::async_trait;
    use aws_sdk_s3::error::DisplayErrorContext;
    use aws_sdk_s3::Client as S3Client;

    #[derive(Debug, Clone)]
    pub struct S3Store {
        client: S3Client,
        bucket: String,
        prefix: String,
    }

    impl S3Store {
        pub fn new(client: S3Client, bucket: String, prefix: String) -> Self {
            Self {
                client,
                bucket,
                prefix,
            }
        }

        fn key_for(&self, path: &str) -> String {
            let name = path.trim_start_matches("./").trim_start_matches('/');
            format!("{}/{}", self.prefix.trim_end_matches('/'), name)
        }
    }

    #[async_trait]
    impl ArtifactStore for S3Store {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            let key = self.key_for(path);

            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(&key)
                .content_type("image/png")
                .body(data.to_vec().into())
                .send()
                .await
                .map_err(|e| ClaimError::Storage {
                    message: format!("Failed to write to S3: {}", DisplayErrorContext(&e)),
                })?;

            Ok(format!("s3://{}/{}", self.bucket, key))
        }
    }
}
