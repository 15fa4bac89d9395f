/// A selectable asset category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub label: &'static str,
}

/// Fixed category table, in display order
pub const CATEGORIES: [Category; 13] = [
    Category { id: "website", label: "Website" },
    Category { id: "youtube", label: "YouTube Channel" },
    Category { id: "facebook", label: "Facebook Page" },
    Category { id: "instagram", label: "Instagram Page" },
    Category { id: "tiktok", label: "TikTok Account" },
    Category { id: "twitter", label: "Twitter Account" },
    Category { id: "play-console", label: "Play Console" },
    Category { id: "adsense", label: "AdSense Dashboard" },
    Category { id: "shopify", label: "Shopify Store" },
    Category { id: "dropshipping", label: "Dropshipping Store" },
    Category { id: "saas", label: "SaaS" },
    Category { id: "mobile-app", label: "Mobile App" },
    Category { id: "other", label: "Other" },
];

/// Look up a category by its id
pub fn find_by_id(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Whether `label` is one of the stored category labels
pub fn is_known_label(label: &str) -> bool {
    CATEGORIES.iter().any(|c| c.label == label)
}
