use thiserror::Error;

/// Failure of a single file within an upload batch. Never fatal to the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("could not get upload credential for {file}: {reason}")]
    CredentialFetch { file: String, reason: String },
    #[error("upload of {file} failed: {reason}")]
    Transport { file: String, reason: String },
}

impl UploadError {
    pub fn file(&self) -> &str {
        match self {
            Self::CredentialFetch { file, .. } | Self::Transport { file, .. } => file,
        }
    }
}

/// Errors surfaced by the listing editor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// Step gate failed; no network call was made
    #[error("{0}")]
    Validation(String),
    /// Gallery would exceed its capacity; checked before any upload
    #[error("Maximum {max} images allowed. You already have {current} images.")]
    CountLimit { current: usize, max: usize },
    /// Every file in the batch failed; the draft is untouched
    #[error("No images were uploaded successfully. Please try again.")]
    AllUploadsFailed { failures: Vec<UploadError> },
    #[error("{0}")]
    Persistence(String),
    #[error("{0}")]
    Auth(String),
}

/// Errors surfaced by the signup and OTP flows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    /// Submission control is disabled for the current input or state
    #[error("submission is disabled")]
    SubmitDisabled,
    /// Server answered with `success: false`
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Transport(String),
}
