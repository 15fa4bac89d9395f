//! Capabilities the flows receive from their host: the signed-in session,
//! navigation, and user-facing notifications.

use crate::models::User;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Mutex;
use tracing::{error, info, warn};

/// Navigation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    VerifyOtp { email: String },
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "/login"),
            Self::Dashboard => write!(f, "/dashboard"),
            Self::VerifyOtp { email } => {
                let email: String = url::form_urlencoded::byte_serialize(email.as_bytes()).collect();
                write!(f, "/verify-otp?email={}", email)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// A user-facing message (a toast in the web client)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Error, message: message.into() }
    }
}

/// Current user and sign-out, passed explicitly to the operations that need them
#[async_trait]
pub trait Session: Send + Sync {
    fn current_user(&self) -> Option<User>;

    async fn sign_out(&self) -> Result<()>;
}

pub trait Navigator: Send + Sync {
    /// Leave the current screen for whatever came before it
    fn back(&self);

    fn push(&self, route: Route);
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Session holding a fixed user until signed out
pub struct StaticSession {
    user: Mutex<Option<User>>,
}

impl StaticSession {
    pub fn new(user: Option<User>) -> Self {
        Self { user: Mutex::new(user) }
    }
}

#[async_trait]
impl Session for StaticSession {
    fn current_user(&self) -> Option<User> {
        self.user.lock().ok().and_then(|u| u.clone())
    }

    async fn sign_out(&self) -> Result<()> {
        if let Ok(mut user) = self.user.lock() {
            if let Some(u) = user.take() {
                info!("Signed out {}", u.id);
            }
        }
        Ok(())
    }
}

/// Navigator for the command line: there is nowhere to go, so it logs
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn back(&self) {
        info!("↩ Navigating back");
    }

    fn push(&self, route: Route) {
        info!("➡ Navigating to {}", route);
    }
}

/// Notifier that reports through tracing
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!("✅ {}", notification.message),
            NotificationLevel::Warning => warn!("⚠️ {}", notification.message),
            NotificationLevel::Error => error!("❌ {}", notification.message),
        }
    }
}
