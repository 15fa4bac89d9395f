use crate::api::traits::{AuthApi, CredentialSource, ImageStore, ListingApi};
use crate::api::types::{
    ApiMessage, AuthResponse, ListingUpdate, LocalFile, OtpRequest, SignupRequest, UploadCredential,
    UploadResponse,
};
use crate::config::Settings;
use crate::models::ListingRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for the marketplace backend and the image host
pub struct HttpClient {
    client: Client,
    base_url: String,
    upload_endpoint: String,
}

impl HttpClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(concat!("assethub/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            upload_endpoint: settings.upload_endpoint.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body to an auth endpoint. The reply body carries the
    /// outcome even on error statuses, so it is decoded regardless.
    async fn post_auth<T: serde::Serialize + Sync>(&self, path: &str, body: &T) -> Result<AuthResponse> {
        let url = self.url(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", path))?;

        let status = response.status();
        let reply = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read reply from {}", path))?;

        auth_reply(path, status, &reply)
    }
}

/// Decode a signup/verify-otp reply. Error statuses still carry
/// `{success, message}`, so the body is decoded whatever the status.
fn auth_reply(path: &str, status: StatusCode, body: &[u8]) -> Result<AuthResponse> {
    if !status.is_success() {
        warn!("{} returned status: {}", path, status);
    }

    serde_json::from_slice(body).with_context(|| format!("Failed to decode reply from {} ({})", path, status))
}

/// Decide one upload's outcome from the image host's reply. A body that does
/// not parse is treated as empty.
fn upload_outcome(status: StatusCode, body: &[u8], name: &str) -> Result<String> {
    let body: UploadResponse = serde_json::from_slice(body).unwrap_or_default();

    if !status.is_success() {
        let message = body.message.unwrap_or_else(|| format!("Failed to upload {}", name));
        anyhow::bail!("{} ({})", message, status);
    }

    body.url
        .filter(|url| !url.is_empty())
        .with_context(|| format!("No URL returned for {}", name))
}

#[async_trait]
impl ListingApi for HttpClient {
    async fn fetch_listing(&self, id: &str) -> Result<ListingRecord> {
        let url = self.url(&format!("/api/listings/{}", id));
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch listing")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch listing {}: {}", id, response.status());
        }

        response.json().await.context("Failed to decode listing")
    }

    async fn update_listing(&self, id: &str, update: &ListingUpdate<'_>) -> Result<ApiMessage> {
        let url = self.url(&format!("/api/listings/{}", id));
        debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .json(update)
            .send()
            .await
            .context("Failed to send listing update")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to update listing {}: {}", id, response.status());
        }

        response.json().await.context("Failed to decode update reply")
    }
}

#[async_trait]
impl CredentialSource for HttpClient {
    async fn fetch_credential(&self) -> Result<UploadCredential> {
        let url = self.url("/api/imagekit/auth");
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to request upload credential")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to get upload auth: {}", response.status());
        }

        response.json().await.context("Failed to decode upload credential")
    }
}

#[async_trait]
impl ImageStore for HttpClient {
    async fn upload(&self, file: &LocalFile, credential: &UploadCredential) -> Result<String> {
        debug!("Uploading {} ({} bytes)", file.name, file.bytes.len());

        let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        let form = Form::new()
            .part("file", part)
            .text("fileName", file.name.clone())
            .text("publicKey", credential.public_key.clone())
            .text("signature", credential.signature.clone())
            .text("expire", credential.expire.to_string())
            .text("token", credential.token.clone())
            .text("useUniqueFileName", "true");

        let response = self
            .client
            .post(&self.upload_endpoint)
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Failed to upload {}", file.name))?;

        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();
        upload_outcome(status, &body, &file.name)
    }
}

#[async_trait]
impl AuthApi for HttpClient {
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        self.post_auth("/api/auth/signup", request).await
    }

    async fn verify_otp(&self, request: &OtpRequest) -> Result<AuthResponse> {
        self.post_auth("/api/auth/verify-otp", request).await
    }
}
