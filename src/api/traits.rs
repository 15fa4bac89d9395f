use crate::api::types::{
    ApiMessage, AuthResponse, ListingUpdate, LocalFile, OtpRequest, SignupRequest, UploadCredential,
};
use crate::models::ListingRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Listing persistence on the marketplace backend
#[async_trait]
pub trait ListingApi: Send + Sync {
    async fn fetch_listing(&self, id: &str) -> Result<ListingRecord>;

    async fn update_listing(&self, id: &str, update: &ListingUpdate<'_>) -> Result<ApiMessage>;
}

/// Issues short-lived, single-use signed upload credentials
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn fetch_credential(&self) -> Result<UploadCredential>;
}

/// Remote image storage; returns the hosted URL of the uploaded file
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, file: &LocalFile, credential: &UploadCredential) -> Result<String>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse>;

    async fn verify_otp(&self, request: &OtpRequest) -> Result<AuthResponse>;
}
