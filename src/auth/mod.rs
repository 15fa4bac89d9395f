pub mod otp;
pub mod signup;

use crate::context::{Navigator, Route};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

pub use otp::OtpVerifier;
pub use signup::{SignupFlow, SignupForm, SignupOutcome};

/// Pause before leaving a screen that just showed a success message
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1200);

/// Push `route` once `REDIRECT_DELAY` has passed
fn redirect_later(navigator: Arc<dyn Navigator>, route: Route) -> JoinHandle<()> {
    debug!("Redirecting to {} in {:?}", route, REDIRECT_DELAY);
    tokio::spawn(async move {
        tokio::time::sleep(REDIRECT_DELAY).await;
        navigator.push(route);
    })
}
