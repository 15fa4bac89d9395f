//! Five-step listing editor.
//!
//! The editor owns one mutable [`Draft`] hydrated from the backend and walks
//! it through Category → Details → Images → Metrics → Pricing. Steps 1 and 2
//! gate forward movement; everything else is checked when the draft is
//! submitted from the last step.

pub mod upload;

use crate::api::types::ListingUpdate;
use crate::api::{CredentialSource, ImageStore, ListingApi, LocalFile};
use crate::context::{Navigator, Notification, Notifier, Route, Session};
use crate::error::EditorError;
use crate::models::{category, DetailField, Draft, DraftField, MetricField};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use upload::{ImageUploader, UploadMode, UploadReport};

/// Wizard stage, numbered 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Category = 1,
    Details,
    Images,
    Metrics,
    Pricing,
}

impl WizardStep {
    pub const LAST: WizardStep = WizardStep::Pricing;

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Details => "Details",
            Self::Images => "Images",
            Self::Metrics => "Metrics",
            Self::Pricing => "Pricing",
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Category => Some(Self::Details),
            Self::Details => Some(Self::Images),
            Self::Images => Some(Self::Metrics),
            Self::Metrics => Some(Self::Pricing),
            Self::Pricing => None,
        }
    }

    pub fn prev(self) -> Option<Self> {
        match self {
            Self::Category => None,
            Self::Details => Some(Self::Category),
            Self::Images => Some(Self::Details),
            Self::Metrics => Some(Self::Images),
            Self::Pricing => Some(Self::Metrics),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.number(), Self::LAST.number(), self.name())
    }
}

/// What `handle_primary_action` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    Advanced(WizardStep),
    Submitted,
}

/// Collaborators the editor talks to
#[derive(Clone)]
pub struct EditorServices {
    pub listings: Arc<dyn ListingApi>,
    pub credentials: Arc<dyn CredentialSource>,
    pub store: Arc<dyn ImageStore>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

pub struct ListingEditor {
    listing_id: String,
    draft: Draft,
    step: WizardStep,
    listings: Arc<dyn ListingApi>,
    uploader: ImageUploader,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl ListingEditor {
    /// Editor over an already hydrated draft, starting at step 1
    pub fn new(listing_id: impl Into<String>, draft: Draft, services: EditorServices) -> Self {
        Self {
            listing_id: listing_id.into(),
            draft,
            step: WizardStep::Category,
            listings: services.listings,
            uploader: ImageUploader::new(services.credentials, services.store),
            navigator: services.navigator,
            notifier: services.notifier,
        }
    }

    /// Fetch the stored listing and open an editor over it
    pub async fn load(listing_id: &str, services: EditorServices) -> Result<Self, EditorError> {
        info!("Loading listing {}", listing_id);

        let fetched = services.listings.fetch_listing(listing_id).await;
        match fetched {
            Ok(record) => Ok(Self::new(listing_id, Draft::from(record), services)),
            Err(e) => {
                warn!("Failed to fetch listing {}: {:#}", listing_id, e);
                let err = EditorError::Persistence("Failed to load listing. Please try again.".to_string());
                services.notifier.notify(Notification::error(err.to_string()));
                Err(err)
            }
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn listing_id(&self) -> &str {
        &self.listing_id
    }

    fn fail(&self, err: EditorError) -> EditorError {
        self.notifier.notify(Notification::error(err.to_string()));
        err
    }

    /// Move forward one step if the current step's gate passes.
    /// At the last step this is a no-op.
    pub fn advance(&mut self) -> Result<WizardStep, EditorError> {
        match self.step {
            WizardStep::Category if self.draft.category.is_empty() => {
                return Err(self.fail(EditorError::Validation("Please select a category".to_string())));
            }
            WizardStep::Details if self.draft.title.is_empty() || self.draft.description.is_empty() => {
                return Err(self.fail(EditorError::Validation(
                    "Please fill in all required fields".to_string(),
                )));
            }
            _ => {}
        }

        if let Some(next) = self.step.next() {
            debug!("Step {} -> {}", self.step, next);
            self.step = next;
        }
        Ok(self.step)
    }

    /// Move back one step; from step 1 hand control back to the navigator.
    /// Returns the new step, or `None` when navigation took over.
    pub fn retreat(&mut self) -> Option<WizardStep> {
        match self.step.prev() {
            Some(prev) => {
                debug!("Step {} -> {}", self.step, prev);
                self.step = prev;
                Some(prev)
            }
            None => {
                self.navigator.back();
                None
            }
        }
    }

    /// Pick a category by id and move straight on to the next step.
    /// Returns `Ok(false)` without touching anything for an unknown id.
    pub fn select_category(&mut self, id: &str) -> Result<bool, EditorError> {
        let Some(category) = category::find_by_id(id) else {
            debug!("Ignoring unknown category id '{}'", id);
            return Ok(false);
        };

        self.draft.category = category.label.to_string();
        self.advance()?;
        Ok(true)
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        *field.slot(&mut self.draft) = value.into();
    }

    pub fn set_metric(&mut self, field: MetricField, value: impl Into<String>) {
        *field.slot(&mut self.draft.metrics) = value.into();
    }

    pub fn set_detail(&mut self, field: DetailField, value: impl Into<String>) {
        *field.slot(&mut self.draft.details) = value.into();
    }

    /// Drop the gallery image at `index`; out-of-range is a no-op
    pub fn remove_image(&mut self, index: usize) {
        if index < self.draft.images.len() {
            self.draft.images.remove(index);
        }
    }

    pub fn remove_thumbnail(&mut self) {
        self.draft.thumbnail.clear();
    }

    /// Upload a file selection into the thumbnail slot or the gallery.
    ///
    /// The selection is consumed whatever the outcome. Successes are kept even
    /// when some files fail; only a batch where nothing succeeded is an error,
    /// and then the draft is left as it was.
    pub async fn upload_images(
        &mut self,
        files: Vec<LocalFile>,
        mode: UploadMode,
    ) -> Result<UploadReport, EditorError> {
        if files.is_empty() {
            return Ok(UploadReport::default());
        }

        if mode == UploadMode::Gallery {
            ImageUploader::check_capacity(self.draft.images.len(), files.len()).map_err(|e| self.fail(e))?;
        }

        let report = self.uploader.upload_batch(&files).await;
        drop(files);

        if report.uploaded.is_empty() {
            return Err(self.fail(EditorError::AllUploadsFailed { failures: report.failed }));
        }

        if !report.failed.is_empty() {
            self.notifier.notify(Notification::warning(format!(
                "{} uploaded, {} failed",
                report.uploaded.len(),
                report.failed.len()
            )));
        }

        match mode {
            UploadMode::Thumbnail => {
                // Single slot: anything after the first settled URL is discarded.
                self.draft.thumbnail = report.uploaded[0].clone();
                self.notifier
                    .notify(Notification::success("Thumbnail updated successfully!"));
            }
            UploadMode::Gallery => {
                self.draft.images.extend(report.uploaded.iter().cloned());
                self.notifier.notify(Notification::success(format!(
                    "{} image(s) uploaded successfully!",
                    report.uploaded.len()
                )));
            }
        }

        Ok(report)
    }

    /// The form's single submit control: before the last step it only moves
    /// forward, on the last step it persists the draft.
    pub async fn handle_primary_action(&mut self, session: &dyn Session) -> Result<PrimaryAction, EditorError> {
        if self.step < WizardStep::LAST {
            return self.advance().map(PrimaryAction::Advanced);
        }
        self.submit_draft(session).await?;
        Ok(PrimaryAction::Submitted)
    }

    /// Persist the draft for the signed-in user and leave for the dashboard
    pub async fn submit_draft(&mut self, session: &dyn Session) -> Result<(), EditorError> {
        let Some(user) = session.current_user() else {
            return Err(self.fail(EditorError::Auth("User not found!".to_string())));
        };

        if self.draft.title.is_empty() || self.draft.description.is_empty() {
            return Err(self.fail(EditorError::Validation(
                "Please fill in all required fields".to_string(),
            )));
        }

        let price = match self.draft.price.trim().parse::<f64>() {
            Ok(p) if p.is_finite() => p,
            _ => {
                return Err(self.fail(EditorError::Validation(format!(
                    "Price must be a number, got '{}'",
                    self.draft.price
                ))));
            }
        };

        info!("Saving listing {} for user {}", self.listing_id, user.id);
        let update = ListingUpdate::new(&self.draft, price, &user.id);

        match self.listings.update_listing(&self.listing_id, &update).await {
            Ok(reply) if reply.success => {
                let message = reply
                    .message
                    .unwrap_or_else(|| "Listing updated successfully!".to_string());
                self.notifier.notify(Notification::success(message));
                self.navigator.push(Route::Dashboard);
                Ok(())
            }
            Ok(reply) => {
                warn!(
                    "Listing update rejected: {}",
                    reply.message.as_deref().unwrap_or("no message")
                );
                Err(self.fail(EditorError::Persistence(
                    "Failed to update listing. Please try again.".to_string(),
                )))
            }
            Err(e) => {
                warn!("Failed to update listing {}: {:#}", self.listing_id, e);
                Err(self.fail(EditorError::Persistence(
                    "Failed to update listing. Please try again.".to_string(),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests;
