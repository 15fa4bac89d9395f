use super::{Details, Draft, Metrics};
use std::str::FromStr;

/// Error for a field name that does not exist on the target record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

/// Top-level draft fields editable as free text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Description,
    Price,
}

impl DraftField {
    pub fn slot(self, draft: &mut Draft) -> &mut String {
        match self {
            Self::Title => &mut draft.title,
            Self::Description => &mut draft.description,
            Self::Price => &mut draft.price,
        }
    }
}

impl FromStr for DraftField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "price" => Ok(Self::Price),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricField {
    MonthlyRevenue,
    MonthlyTraffic,
    Followers,
    Subscribers,
    Engagement,
    Age,
    AssetLink,
    Country,
}

impl MetricField {
    pub fn slot(self, metrics: &mut Metrics) -> &mut String {
        match self {
            Self::MonthlyRevenue => &mut metrics.monthly_revenue,
            Self::MonthlyTraffic => &mut metrics.monthly_traffic,
            Self::Followers => &mut metrics.followers,
            Self::Subscribers => &mut metrics.subscribers,
            Self::Engagement => &mut metrics.engagement,
            Self::Age => &mut metrics.age,
            Self::AssetLink => &mut metrics.asset_link,
            Self::Country => &mut metrics.country,
        }
    }
}

impl FromStr for MetricField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthlyRevenue" => Ok(Self::MonthlyRevenue),
            "monthlyTraffic" => Ok(Self::MonthlyTraffic),
            "followers" => Ok(Self::Followers),
            "subscribers" => Ok(Self::Subscribers),
            "engagement" => Ok(Self::Engagement),
            "age" => Ok(Self::Age),
            "assetLink" => Ok(Self::AssetLink),
            "country" => Ok(Self::Country),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    Niche,
    Monetization,
    TrafficSource,
    GrowthPotential,
    PaymentReceived,
    AdManager,
    DomainProvider,
    DomainExpiry,
    Platform,
    Issue,
}

impl DetailField {
    pub fn slot(self, details: &mut Details) -> &mut String {
        match self {
            Self::Niche => &mut details.niche,
            Self::Monetization => &mut details.monetization,
            Self::TrafficSource => &mut details.traffic_source,
            Self::GrowthPotential => &mut details.growth_potential,
            Self::PaymentReceived => &mut details.payment_received,
            Self::AdManager => &mut details.ad_manager,
            Self::DomainProvider => &mut details.domain_provider,
            Self::DomainExpiry => &mut details.domain_expiry,
            Self::Platform => &mut details.platform,
            Self::Issue => &mut details.issue,
        }
    }
}

impl FromStr for DetailField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "niche" => Ok(Self::Niche),
            "monetization" => Ok(Self::Monetization),
            "trafficSource" => Ok(Self::TrafficSource),
            "growthPotential" => Ok(Self::GrowthPotential),
            "paymentReceived" => Ok(Self::PaymentReceived),
            "adManager" => Ok(Self::AdManager),
            "domainProvider" => Ok(Self::DomainProvider),
            "domainExpiry" => Ok(Self::DomainExpiry),
            "platform" => Ok(Self::Platform),
            "issue" => Ok(Self::Issue),
            other => Err(UnknownField(other.to_string())),
        }
    }
}
