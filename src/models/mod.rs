pub mod category;
pub mod fields;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

pub use category::CATEGORIES;
pub use fields::{DetailField, DraftField, MetricField};

/// Maximum number of gallery images on a listing
pub const MAX_GALLERY_IMAGES: usize = 6;

/// Performance metrics of a listed asset. Numbers are kept as strings for
/// form binding; the backend coerces them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub monthly_revenue: String,
    pub monthly_traffic: String,
    pub followers: String,
    pub subscribers: String,
    pub engagement: String,
    pub age: String,
    pub asset_link: String,
    pub country: String,
}

/// Free-form descriptive details of a listed asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    pub niche: String,
    pub monetization: String,
    pub traffic_source: String,
    pub growth_potential: String,
    pub payment_received: String,
    pub ad_manager: String,
    pub domain_provider: String,
    pub domain_expiry: String,
    pub platform: String,
    pub issue: String,
}

/// In-memory listing being edited, not yet persisted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub title: String,
    pub description: String,
    /// Empty or one of the category labels
    pub category: String,
    /// Numeric string, parsed at submit time
    pub price: String,
    pub thumbnail: String,
    /// Display order, at most `MAX_GALLERY_IMAGES`
    pub images: Vec<String>,
    pub metrics: Metrics,
    pub details: Details,
}

/// Listing record as returned by `GET /api/listings/{id}`.
///
/// Price and metrics may come back as numbers or strings depending on how the
/// listing was created, so they are kept as raw JSON until hydration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default)]
    pub metrics: Option<Map<String, Value>>,
    #[serde(default)]
    pub details: Option<Map<String, Value>>,
}

/// Stored listings may carry explicit `null`s; read them as absent
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Signed-in user as exposed by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Render a JSON scalar the way a form field would show it
fn value_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn field(map: Option<&Map<String, Value>>, key: &str) -> String {
    value_to_string(map.and_then(|m| m.get(key)))
}

impl From<ListingRecord> for Draft {
    fn from(record: ListingRecord) -> Self {
        let metrics = record.metrics.as_ref();
        let details = record.details.as_ref();

        let category = if record.category.is_empty() || category::is_known_label(&record.category) {
            record.category
        } else {
            warn!("Dropping unknown stored category '{}'", record.category);
            String::new()
        };

        let mut images = record.images;
        if images.len() > MAX_GALLERY_IMAGES {
            warn!(
                "Stored listing has {} images, keeping the first {}",
                images.len(),
                MAX_GALLERY_IMAGES
            );
            images.truncate(MAX_GALLERY_IMAGES);
        }

        Self {
            title: record.title,
            description: record.description,
            category,
            price: value_to_string(Some(&record.price)),
            thumbnail: record.thumbnail.unwrap_or_default(),
            images,
            metrics: Metrics {
                monthly_revenue: field(metrics, "monthlyRevenue"),
                monthly_traffic: field(metrics, "monthlyTraffic"),
                followers: field(metrics, "followers"),
                subscribers: field(metrics, "subscribers"),
                engagement: field(metrics, "engagement"),
                age: field(metrics, "age"),
                asset_link: field(metrics, "assetLink"),
                country: field(metrics, "country"),
            },
            details: Details {
                niche: field(details, "niche"),
                monetization: field(details, "monetization"),
                traffic_source: field(details, "trafficSource"),
                growth_potential: field(details, "growthPotential"),
                payment_received: field(details, "paymentReceived"),
                ad_manager: field(details, "adManager"),
                domain_provider: field(details, "domainProvider"),
                domain_expiry: field(details, "domainExpiry"),
                platform: field(details, "platform"),
                issue: field(details, "issue"),
            },
        }
    }
}
