use crate::api::{CredentialSource, ImageStore, LocalFile};
use crate::error::{EditorError, UploadError};
use crate::models::MAX_GALLERY_IMAGES;
use chrono::Utc;
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where a batch of uploaded images lands in the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    /// Single slot; the first URL to settle wins
    Thumbnail,
    /// Appended to the gallery in settlement order
    Gallery,
}

/// Outcome of one batch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// Hosted URLs in the order their attempts settled
    pub uploaded: Vec<String>,
    pub failed: Vec<UploadError>,
}

/// Turns locally selected files into hosted URLs, tolerating partial failure
pub struct ImageUploader {
    credentials: Arc<dyn CredentialSource>,
    store: Arc<dyn ImageStore>,
}

impl ImageUploader {
    pub fn new(credentials: Arc<dyn CredentialSource>, store: Arc<dyn ImageStore>) -> Self {
        Self { credentials, store }
    }

    /// Reject a gallery batch that would push the gallery past its capacity
    pub fn check_capacity(current: usize, incoming: usize) -> Result<(), EditorError> {
        if current + incoming > MAX_GALLERY_IMAGES {
            return Err(EditorError::CountLimit { current, max: MAX_GALLERY_IMAGES });
        }
        Ok(())
    }

    /// Upload every file concurrently and wait for all of them to settle.
    /// One file failing never cancels or blocks the others.
    pub async fn upload_batch(&self, files: &[LocalFile]) -> UploadReport {
        info!("Uploading {} file(s)", files.len());

        let mut pending: FuturesUnordered<_> = files.iter().map(|file| self.upload_one(file)).collect();
        let mut report = UploadReport::default();

        while let Some(outcome) = pending.next().await {
            match outcome {
                Ok(url) => {
                    debug!("Settled: {}", url);
                    report.uploaded.push(url);
                }
                Err(err) => {
                    warn!(file = err.file(), "{}", err);
                    report.failed.push(err);
                }
            }
        }

        info!(
            "Upload batch done: {} uploaded, {} failed",
            report.uploaded.len(),
            report.failed.len()
        );
        report
    }

    async fn upload_one(&self, file: &LocalFile) -> Result<String, UploadError> {
        let credential = self
            .credentials
            .fetch_credential()
            .await
            .map_err(|e| UploadError::CredentialFetch {
                file: file.name.clone(),
                reason: format!("{:#}", e),
            })?;

        if credential.is_expired(Utc::now()) {
            return Err(UploadError::CredentialFetch {
                file: file.name.clone(),
                reason: "credential already expired".to_string(),
            });
        }

        self.store
            .upload(file, &credential)
            .await
            .map_err(|e| UploadError::Transport {
                file: file.name.clone(),
                reason: format!("{:#}", e),
            })
    }
}
