use super::redirect_later;
use crate::api::types::OtpRequest;
use crate::api::AuthApi;
use crate::context::{Navigator, Route};
use crate::error::AuthError;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const OTP_LENGTH: usize = 6;

const VERIFIED_MESSAGE: &str = "Your email was verified! You may now log in.";
const REJECTED_FALLBACK: &str = "Verification failed.";
const TRANSPORT_FALLBACK: &str = "Verification failed. Try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpStatus {
    Idle,
    Verifying,
    Verified,
    /// Message shown to the user; resubmitting is allowed
    Failed(String),
}

/// Whether `code` is exactly six ASCII digits
pub fn is_well_formed(code: &str) -> bool {
    code.len() == OTP_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// Email verification with a one-time code
pub struct OtpVerifier {
    api: Arc<dyn AuthApi>,
    navigator: Arc<dyn Navigator>,
    status: OtpStatus,
    redirect: Option<JoinHandle<()>>,
}

impl OtpVerifier {
    pub fn new(api: Arc<dyn AuthApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            navigator,
            status: OtpStatus::Idle,
            redirect: None,
        }
    }

    pub fn status(&self) -> &OtpStatus {
        &self.status
    }

    /// Text to show under the form, if any
    pub fn message(&self) -> Option<&str> {
        match &self.status {
            OtpStatus::Verified => Some(VERIFIED_MESSAGE),
            OtpStatus::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// The submit control is enabled only for a well-formed code while no
    /// request is in flight and the email is not yet verified.
    pub fn is_submit_enabled(&self, code: &str) -> bool {
        matches!(self.status, OtpStatus::Idle | OtpStatus::Failed(_)) && is_well_formed(code)
    }

    pub async fn submit_code(&mut self, email: &str, code: &str) -> Result<(), AuthError> {
        if !self.is_submit_enabled(code) {
            return Err(AuthError::SubmitDisabled);
        }

        self.status = OtpStatus::Verifying;
        info!("Verifying code for {}", email);

        let request = OtpRequest {
            email: email.to_string(),
            otp: code.trim().to_string(),
        };

        match self.api.verify_otp(&request).await {
            Ok(reply) if reply.success => {
                info!("Email {} verified", email);
                self.status = OtpStatus::Verified;
                self.redirect = Some(redirect_later(self.navigator.clone(), Route::Login));
                Ok(())
            }
            Ok(reply) => {
                let message = reply.message.unwrap_or_else(|| REJECTED_FALLBACK.to_string());
                warn!("Verification rejected: {}", message);
                self.status = OtpStatus::Failed(message.clone());
                Err(AuthError::Rejected(message))
            }
            Err(e) => {
                warn!("Verification request failed: {:#}", e);
                self.status = OtpStatus::Failed(TRANSPORT_FALLBACK.to_string());
                Err(AuthError::Transport(TRANSPORT_FALLBACK.to_string()))
            }
        }
    }

    /// Wait for the post-verification redirect, if one was scheduled
    pub async fn wait_for_redirect(&mut self) {
        if let Some(handle) = self.redirect.take() {
            if let Err(e) = handle.await {
                warn!("Redirect task failed: {}", e);
            }
        }
    }
}
