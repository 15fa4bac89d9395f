use super::redirect_later;
use crate::api::types::SignupRequest;
use crate::api::AuthApi;
use crate::context::{Navigator, Notification, Notifier, Route};
use crate::error::AuthError;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Reply value of `next` asking the client to verify the email first
const NEXT_VERIFY_OTP: &str = "verify-otp";

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    /// International format with country code
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    fn validate(&self) -> Result<(), AuthError> {
        if self.password != self.confirm_password {
            return Err(AuthError::Validation("Passwords do not match".to_string()));
        }
        if self.phone.trim().is_empty() {
            return Err(AuthError::Validation(
                "Please enter a valid phone number with country code".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum SignupOutcome {
    /// Account created; the user was sent to the code entry screen
    AwaitingOtp,
    /// Account created and usable; login follows after a short pause
    Registered { redirect: JoinHandle<()> },
}

pub struct SignupFlow {
    api: Arc<dyn AuthApi>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl SignupFlow {
    pub fn new(api: Arc<dyn AuthApi>, navigator: Arc<dyn Navigator>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, navigator, notifier }
    }

    pub async fn submit(&self, form: &SignupForm) -> Result<SignupOutcome, AuthError> {
        form.validate()?;

        info!("Signing up {}", form.email);
        let request = SignupRequest {
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            password: form.password.clone(),
        };

        let reply = match self.api.signup(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Signup request failed: {:#}", e);
                return Err(AuthError::Transport("Something went wrong!".to_string()));
            }
        };

        if !reply.success {
            let message = reply.message.unwrap_or_else(|| "Signup failed".to_string());
            warn!("Signup rejected: {}", message);
            return Err(AuthError::Rejected(message));
        }

        if reply.next.as_deref() == Some(NEXT_VERIFY_OTP) {
            self.notifier
                .notify(Notification::success("Check your email for the verification code."));
            self.navigator.push(Route::VerifyOtp { email: form.email.clone() });
            return Ok(SignupOutcome::AwaitingOtp);
        }

        let message = reply.message.unwrap_or_else(|| "Signup successful".to_string());
        self.notifier.notify(Notification::success(message));
        Ok(SignupOutcome::Registered {
            redirect: redirect_later(self.navigator.clone(), Route::Login),
        })
    }
}
