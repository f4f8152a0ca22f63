//! Object storage (S3)
//!
//! Objects are addressed by `path/filename` keys inside a single bucket.

use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;
use futures::future::join_all;
use thiserror::Error;

use shared::error::{AppError, ErrorCode};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload of {key} failed: {message}")]
    Upload { key: String, message: String },

    #[error("delete of {key} failed: {message}")]
    Delete { key: String, message: String },
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        tracing::error!(error = %e, "Object storage error");
        AppError::with_message(ErrorCode::FileStorageFailed, "No se pudo guardar el archivo")
    }
}

/// One object of an upload batch
#[derive(Debug, Clone)]
pub struct UploadObject {
    pub key: String,
    pub body: Vec<u8>,
    /// Guessed from the key when `None`
    pub content_type: Option<String>,
}

/// Build a `path/filename` key
pub fn object_key(path: &str, filename: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        filename.to_string()
    } else {
        format!("{path}/{filename}")
    }
}

fn content_type_for(key: &str) -> String {
    mime_guess::from_path(key)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[derive(Clone, Debug)]
pub struct ObjectStorage {
    pub client: S3Client,
    pub bucket: String,
}

impl ObjectStorage {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub async fn upload(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        let content_type = content_type
            .map(str::to_string)
            .unwrap_or_else(|| content_type_for(key));

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        tracing::info!(key = %key, bucket = %self.bucket, "Object uploaded");
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        tracing::info!(key = %key, bucket = %self.bucket, "Object deleted");
        Ok(())
    }

    /// Upload a batch concurrently
    ///
    /// Results come back in input order. Objects that were stored stay
    /// stored when others fail; nothing is rolled back.
    pub async fn upload_all(&self, objects: Vec<UploadObject>) -> Vec<Result<String, StorageError>> {
        join_all(objects.into_iter().map(|obj| async move {
            self.upload(&obj.key, obj.body, obj.content_type.as_deref())
                .await
                .map(|_| obj.key)
        }))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key() {
        assert_eq!(object_key("products/7", "a.jpg"), "products/7/a.jpg");
        assert_eq!(object_key("/products/7/", "a.jpg"), "products/7/a.jpg");
        assert_eq!(object_key("", "a.jpg"), "a.jpg");
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(content_type_for("products/1/x.jpg"), "image/jpeg");
        assert_eq!(content_type_for("docs/terms.pdf"), "application/pdf");
        assert_eq!(content_type_for("blob"), "application/octet-stream");
    }
}
