use crate::models::{Details, Draft, Metrics};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Body of `PUT /api/listings/{id}`: the full draft with a numeric price and
/// the owning user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub price: f64,
    pub thumbnail: &'a str,
    pub images: &'a [String],
    pub metrics: &'a Metrics,
    pub details: &'a Details,
    pub user_id: &'a str,
}

impl<'a> ListingUpdate<'a> {
    pub fn new(draft: &'a Draft, price: f64, user_id: &'a str) -> Self {
        Self {
            title: &draft.title,
            description: &draft.description,
            category: &draft.category,
            price,
            thumbnail: &draft.thumbnail,
            images: &draft.images,
            metrics: &draft.metrics,
            details: &draft.details,
            user_id,
        }
    }
}

/// Generic `{success, message}` reply
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Signed upload credential from `GET /api/imagekit/auth`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCredential {
    pub token: String,
    /// Unix seconds
    pub expire: i64,
    pub signature: String,
    pub public_key: String,
}

impl UploadCredential {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expire, 0)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map_or(true, |at| at <= now)
    }
}

/// Reply from the image hosting upload endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OtpRequest {
    pub email: String,
    pub otp: String,
}

/// Reply from the signup and OTP endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    /// Follow-up step requested by the server, e.g. `verify-otp`
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A file selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    pub async fn read(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, bytes))
    }
}
