use super::upload::fakes::{files, FakeCredentials, FakeStore};
use super::*;
use crate::api::types::ApiMessage;
use crate::context::testing::{RecordingNavigator, RecordingNotifier};
use crate::context::{NotificationLevel, StaticSession};
use crate::error::UploadError;
use crate::models::{ListingRecord, User};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct FakeListings {
    stored: Option<Value>,
    reply: Option<ApiMessage>,
    updates: Mutex<Vec<(String, Value)>>,
}

impl FakeListings {
    fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl ListingApi for FakeListings {
    async fn fetch_listing(&self, id: &str) -> Result<ListingRecord> {
        match &self.stored {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => anyhow::bail!("Failed to fetch listing {}: 404 Not Found", id),
        }
    }

    async fn update_listing(&self, id: &str, update: &ListingUpdate<'_>) -> Result<ApiMessage> {
        self.updates
            .lock()
            .unwrap()
            .push((id.to_string(), serde_json::to_value(update)?));
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => anyhow::bail!("Failed to update listing {}: 500 Internal Server Error", id),
        }
    }
}

struct Harness {
    listings: Arc<FakeListings>,
    credentials: Arc<FakeCredentials>,
    store: Arc<FakeStore>,
    navigator: Arc<RecordingNavigator>,
    notifier: Arc<RecordingNotifier>,
}

impl Harness {
    fn new() -> Self {
        Self::with(FakeListings::default(), FakeCredentials::default(), FakeStore::default())
    }

    fn with(listings: FakeListings, credentials: FakeCredentials, store: FakeStore) -> Self {
        Self {
            listings: Arc::new(listings),
            credentials: Arc::new(credentials),
            store: Arc::new(store),
            navigator: Arc::new(RecordingNavigator::default()),
            notifier: Arc::new(RecordingNotifier::default()),
        }
    }

    fn services(&self) -> EditorServices {
        EditorServices {
            listings: self.listings.clone(),
            credentials: self.credentials.clone(),
            store: self.store.clone(),
            navigator: self.navigator.clone(),
            notifier: self.notifier.clone(),
        }
    }

    fn editor(&self, draft: Draft) -> ListingEditor {
        ListingEditor::new("listing-1", draft, self.services())
    }
}

fn complete_draft() -> Draft {
    Draft {
        title: "Cooking channel".to_string(),
        description: "120k subscribers".to_string(),
        category: "YouTube Channel".to_string(),
        price: "2500".to_string(),
        ..Draft::default()
    }
}

fn signed_in() -> StaticSession {
    StaticSession::new(Some(User {
        id: "user-7".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
    }))
}

fn editor_at(harness: &Harness, draft: Draft, step: WizardStep) -> ListingEditor {
    let mut editor = harness.editor(draft);
    while editor.step() < step {
        editor.advance().unwrap();
    }
    editor
}

#[test]
fn step_numbering() {
    assert_eq!(WizardStep::Category.number(), 1);
    assert_eq!(WizardStep::Pricing.number(), 5);
    assert_eq!(WizardStep::Images.to_string(), "3/5 Images");
    assert_eq!(WizardStep::Pricing.next(), None);
    assert_eq!(WizardStep::Category.prev(), None);
}

#[test]
fn advance_without_category_stays_on_step_one() {
    let harness = Harness::new();
    let mut editor = harness.editor(Draft::default());

    let err = editor.advance().unwrap_err();
    assert!(matches!(err, EditorError::Validation(_)));
    assert_eq!(editor.step(), WizardStep::Category);
    assert_eq!(
        harness.notifier.with_level(NotificationLevel::Error),
        vec!["Please select a category".to_string()]
    );
}

#[test]
fn advance_from_details_requires_title_and_description() {
    let harness = Harness::new();
    for (title, description) in [("", ""), ("Title", ""), ("", "Description")] {
        let mut editor = harness.editor(Draft {
            category: "Website".to_string(),
            ..Draft::default()
        });
        editor.advance().unwrap();
        editor.set_field(DraftField::Title, title);
        editor.set_field(DraftField::Description, description);

        assert!(matches!(editor.advance(), Err(EditorError::Validation(_))));
        assert_eq!(editor.step(), WizardStep::Details);
    }
}

#[test]
fn later_steps_advance_freely_and_stop_at_pricing() {
    let harness = Harness::new();
    let mut editor = editor_at(&harness, complete_draft(), WizardStep::Images);

    // Nothing on steps 3-5 is checked until submission
    editor.set_field(DraftField::Price, "");
    assert_eq!(editor.advance(), Ok(WizardStep::Metrics));
    assert_eq!(editor.advance(), Ok(WizardStep::Pricing));
    assert_eq!(editor.advance(), Ok(WizardStep::Pricing));
}

#[test]
fn select_category_sets_label_and_advances() {
    let harness = Harness::new();
    let mut editor = harness.editor(Draft::default());

    assert_eq!(editor.select_category("youtube"), Ok(true));
    assert_eq!(editor.draft().category, "YouTube Channel");
    assert_eq!(editor.step(), WizardStep::Details);
}

#[test]
fn select_unknown_category_is_a_noop() {
    let harness = Harness::new();
    let mut editor = harness.editor(Draft::default());

    assert_eq!(editor.select_category("bogus"), Ok(false));
    assert_eq!(editor.draft().category, "");
    assert_eq!(editor.step(), WizardStep::Category);
    assert!(harness.notifier.all().is_empty());
}

#[test]
fn retreat_walks_back_then_delegates() {
    let harness = Harness::new();
    let mut editor = editor_at(&harness, complete_draft(), WizardStep::Images);

    assert_eq!(editor.retreat(), Some(WizardStep::Details));
    assert_eq!(editor.retreat(), Some(WizardStep::Category));
    assert_eq!(harness.navigator.back_count(), 0);

    assert_eq!(editor.retreat(), None);
    assert_eq!(editor.step(), WizardStep::Category);
    assert_eq!(harness.navigator.back_count(), 1);
}

#[test]
fn field_mutations_write_named_attributes() {
    let harness = Harness::new();
    let mut editor = harness.editor(Draft::default());

    editor.set_field(DraftField::Title, "Shop");
    editor.set_metric(MetricField::MonthlyRevenue, "1200");
    editor.set_detail(DetailField::TrafficSource, "organic");

    assert_eq!(editor.draft().title, "Shop");
    assert_eq!(editor.draft().metrics.monthly_revenue, "1200");
    assert_eq!(editor.draft().details.traffic_source, "organic");
}

#[test]
fn remove_image_and_thumbnail() {
    let harness = Harness::new();
    let mut editor = harness.editor(Draft {
        thumbnail: "t".to_string(),
        images: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        ..Draft::default()
    });

    editor.remove_image(1);
    editor.remove_image(10);
    editor.remove_thumbnail();

    assert_eq!(editor.draft().images, vec!["a", "c"]);
    assert_eq!(editor.draft().thumbnail, "");
}

#[tokio::test]
async fn load_hydrates_draft() {
    let listings = FakeListings {
        stored: Some(json!({
            "title": "Blog",
            "description": "Tech blog",
            "category": "Website",
            "price": 900,
            "metrics": { "monthlyTraffic": 40000 }
        })),
        ..FakeListings::default()
    };
    let harness = Harness::with(listings, FakeCredentials::default(), FakeStore::default());

    let editor = ListingEditor::load("listing-1", harness.services()).await.unwrap();
    assert_eq!(editor.step(), WizardStep::Category);
    assert_eq!(editor.draft().price, "900");
    assert_eq!(editor.draft().metrics.monthly_traffic, "40000");
}

#[tokio::test]
async fn load_failure_is_a_persistence_error() {
    let harness = Harness::new();

    let result = ListingEditor::load("missing", harness.services()).await;
    assert!(matches!(result, Err(EditorError::Persistence(_))));
    assert_eq!(
        harness.notifier.with_level(NotificationLevel::Error),
        vec!["Failed to load listing. Please try again.".to_string()]
    );
}

#[tokio::test]
async fn gallery_over_capacity_is_rejected_before_any_network_call() {
    let harness = Harness::new();
    let mut editor = harness.editor(Draft {
        images: vec!["a".to_string(), "b".to_string()],
        ..Draft::default()
    });

    let result = editor
        .upload_images(files(&["1", "2", "3", "4", "5"]), UploadMode::Gallery)
        .await;

    assert_eq!(result, Err(EditorError::CountLimit { current: 2, max: 6 }));
    assert_eq!(harness.credentials.call_count(), 0);
    assert_eq!(harness.store.call_count(), 0);
    assert_eq!(editor.draft().images.len(), 2);
    assert_eq!(
        harness.notifier.last().map(|n| n.message),
        Some("Maximum 6 images allowed. You already have 2 images.".to_string())
    );
}

#[tokio::test]
async fn partial_failure_keeps_successes_and_warns() {
    let harness = Harness::with(
        FakeListings::default(),
        FakeCredentials::failing_call(2),
        FakeStore::default(),
    );
    let mut editor = harness.editor(Draft::default());

    let report = editor
        .upload_images(files(&["1.png", "2.png", "3.png"]), UploadMode::Gallery)
        .await
        .unwrap();

    // Attempts start in selection order, so the second credential is 2.png's.
    assert!(matches!(
        report.failed.as_slice(),
        [UploadError::CredentialFetch { file, .. }] if file == "2.png"
    ));

    let mut images = editor.draft().images.clone();
    images.sort();
    assert_eq!(images, vec!["https://cdn.test/1.png", "https://cdn.test/3.png"]);

    let warnings = harness.notifier.with_level(NotificationLevel::Warning);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("1 failed"));
    assert_eq!(
        harness.notifier.with_level(NotificationLevel::Success),
        vec!["2 image(s) uploaded successfully!".to_string()]
    );
}

#[tokio::test]
async fn gallery_appends_after_existing_images() {
    let harness = Harness::new();
    let mut editor = harness.editor(Draft {
        images: vec!["https://cdn.test/old.png".to_string()],
        ..Draft::default()
    });

    editor
        .upload_images(files(&["new.png"]), UploadMode::Gallery)
        .await
        .unwrap();

    assert_eq!(
        editor.draft().images,
        vec!["https://cdn.test/old.png", "https://cdn.test/new.png"]
    );
}

#[tokio::test]
async fn all_failed_leaves_draft_untouched() {
    let credentials = FakeCredentials { fail_all: true, ..FakeCredentials::default() };
    let harness = Harness::with(FakeListings::default(), credentials, FakeStore::default());
    let draft = Draft {
        thumbnail: "https://cdn.test/keep.png".to_string(),
        images: vec!["https://cdn.test/a.png".to_string()],
        ..Draft::default()
    };
    let mut editor = harness.editor(draft.clone());

    for mode in [UploadMode::Gallery, UploadMode::Thumbnail] {
        let result = editor.upload_images(files(&["x.png", "y.png"]), mode).await;
        match result {
            Err(EditorError::AllUploadsFailed { failures }) => assert_eq!(failures.len(), 2),
            other => panic!("expected AllUploadsFailed, got {:?}", other),
        }
        assert_eq!(editor.draft(), &draft);
    }

    assert_eq!(
        harness.notifier.last().map(|n| n.message),
        Some("No images were uploaded successfully. Please try again.".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn thumbnail_takes_first_settled_url() {
    let store = FakeStore {
        delays: HashMap::from([
            ("first.png".to_string(), Duration::from_millis(400)),
            ("second.png".to_string(), Duration::from_millis(50)),
        ]),
        ..FakeStore::default()
    };
    let harness = Harness::with(FakeListings::default(), FakeCredentials::default(), store);
    let mut editor = harness.editor(Draft::default());

    let report = editor
        .upload_images(files(&["first.png", "second.png"]), UploadMode::Thumbnail)
        .await
        .unwrap();

    assert_eq!(report.uploaded.len(), 2);
    assert_eq!(editor.draft().thumbnail, "https://cdn.test/second.png");
    assert!(editor.draft().images.is_empty());
    assert_eq!(
        harness.notifier.with_level(NotificationLevel::Success),
        vec!["Thumbnail updated successfully!".to_string()]
    );
}

#[tokio::test]
async fn thumbnail_mode_ignores_gallery_capacity() {
    let harness = Harness::new();
    let mut editor = harness.editor(Draft {
        images: (0..6).map(|i| format!("https://cdn.test/{}.png", i)).collect(),
        ..Draft::default()
    });

    editor
        .upload_images(files(&["t.png"]), UploadMode::Thumbnail)
        .await
        .unwrap();

    assert_eq!(editor.draft().thumbnail, "https://cdn.test/t.png");
    assert_eq!(editor.draft().images.len(), 6);
}

#[tokio::test]
async fn empty_selection_is_a_noop() {
    let harness = Harness::new();
    let mut editor = harness.editor(Draft::default());

    let report = editor.upload_images(Vec::new(), UploadMode::Gallery).await.unwrap();
    assert_eq!(report, UploadReport::default());
    assert_eq!(harness.credentials.call_count(), 0);
    assert!(harness.notifier.all().is_empty());
}

#[tokio::test]
async fn primary_action_before_last_step_only_advances() {
    let reply = ApiMessage { success: true, message: None };
    let harness = Harness::with(
        FakeListings { reply: Some(reply), ..FakeListings::default() },
        FakeCredentials::default(),
        FakeStore::default(),
    );
    let session = signed_in();
    let mut editor = harness.editor(complete_draft());

    for expected in [
        WizardStep::Details,
        WizardStep::Images,
        WizardStep::Metrics,
        WizardStep::Pricing,
    ] {
        assert_eq!(
            editor.handle_primary_action(&session).await,
            Ok(PrimaryAction::Advanced(expected))
        );
        assert_eq!(harness.listings.update_count(), 0);
    }

    assert_eq!(editor.handle_primary_action(&session).await, Ok(PrimaryAction::Submitted));
    assert_eq!(harness.listings.update_count(), 1);
}

#[tokio::test]
async fn submit_sends_numeric_price_and_user() {
    let reply = ApiMessage { success: true, message: Some("Listing saved".to_string()) };
    let harness = Harness::with(
        FakeListings { reply: Some(reply), ..FakeListings::default() },
        FakeCredentials::default(),
        FakeStore::default(),
    );
    let mut editor = editor_at(&harness, complete_draft(), WizardStep::Pricing);
    editor.set_field(DraftField::Price, "2500.75");

    editor.submit_draft(&signed_in()).await.unwrap();

    let updates = harness.listings.updates.lock().unwrap().clone();
    let (id, body) = &updates[0];
    assert_eq!(id, "listing-1");
    assert_eq!(body["price"], json!(2500.75));
    assert_eq!(body["userId"], "user-7");
    assert_eq!(body["category"], "YouTube Channel");
    assert_eq!(harness.navigator.routes(), vec![Route::Dashboard]);
    assert_eq!(
        harness.notifier.with_level(NotificationLevel::Success),
        vec!["Listing saved".to_string()]
    );
}

#[tokio::test]
async fn submit_without_user_makes_no_call() {
    let harness = Harness::new();
    let mut editor = editor_at(&harness, complete_draft(), WizardStep::Pricing);

    let result = editor.submit_draft(&StaticSession::new(None)).await;
    assert_eq!(result, Err(EditorError::Auth("User not found!".to_string())));
    assert_eq!(harness.listings.update_count(), 0);
}

#[tokio::test]
async fn submit_rejects_unparseable_price() {
    let harness = Harness::new();
    let mut editor = editor_at(&harness, complete_draft(), WizardStep::Pricing);
    editor.set_field(DraftField::Price, "a lot");

    let result = editor.submit_draft(&signed_in()).await;
    assert!(matches!(result, Err(EditorError::Validation(_))));
    assert_eq!(harness.listings.update_count(), 0);
}

#[tokio::test]
async fn submit_failure_is_a_persistence_error() {
    let harness = Harness::new();
    let mut editor = editor_at(&harness, complete_draft(), WizardStep::Pricing);

    let result = editor.submit_draft(&signed_in()).await;
    assert!(matches!(result, Err(EditorError::Persistence(_))));
    assert!(harness.navigator.routes().is_empty());
    // Draft survives for a manual retry
    assert_eq!(editor.draft().title, "Cooking channel");
}

#[tokio::test]
async fn rejected_update_is_a_persistence_error() {
    let reply = ApiMessage { success: false, message: Some("Not your listing".to_string()) };
    let harness = Harness::with(
        FakeListings { reply: Some(reply), ..FakeListings::default() },
        FakeCredentials::default(),
        FakeStore::default(),
    );
    let mut editor = editor_at(&harness, complete_draft(), WizardStep::Pricing);

    let result = editor.submit_draft(&signed_in()).await;
    assert!(matches!(result, Err(EditorError::Persistence(_))));
    assert!(harness.navigator.routes().is_empty());
}
