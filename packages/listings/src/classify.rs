//! Service-type classification.
//!
//! Raw listings carry free-form category labels ("Plumber", "Drainage
//! service", "Auto repair shop"). The classifier maps them onto the fixed
//! [`ServiceType`] taxonomy with ordered keyword rules: the first rule with a
//! keyword contained in any lowercased category wins. Rule order is the only
//! tie-break, so overlapping keywords resolve to the earlier rule.

use crate::types::{RawListing, ServiceType};

/// A service type and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub service_type: ServiceType,
    keywords: Vec<String>,
}

impl Rule {
    pub fn new<I, S>(service_type: ServiceType, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            service_type,
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    fn matches(&self, category: &str) -> bool {
        self.keywords.iter().any(|k| category.contains(k.as_str()))
    }
}

const DEFAULT_RULES: &[(ServiceType, &[&str])] = &[
    (
        ServiceType::Auto,
        &[
            "car", "auto", "mechanic", "garage", "tyre", "tire", "vehicle", "mot", "brake",
            "battery", "transmission", "exhaust", "wheel", "alignment", "oil change",
        ],
    ),
    (
        ServiceType::Handyman,
        &["handyman", "odd job", "property maintenance"],
    ),
    (
        ServiceType::HomeImprovement,
        &[
            "builder", "construction", "renovation", "remodel", "contractor", "carpentry",
            "painter", "painting", "decorator", "flooring", "tiling", "roofing", "roofer",
            "kitchen", "bathroom", "cabinet", "drywall", "insulation",
        ],
    ),
    (
        ServiceType::Plumber,
        &["plumb", "drain", "pipe", "toilet", "faucet", "sink", "water heater"],
    ),
    (
        ServiceType::Electrician,
        &["electric", "wiring", "lighting", "power"],
    ),
    (
        ServiceType::Gardener,
        &[
            "garden", "landscape", "lawn", "tree", "shrub", "mow", "yard", "outdoor", "plant",
            "grass", "hedge", "weed",
        ],
    ),
    (
        ServiceType::Cleaner,
        &["clean", "maid", "janitorial", "housekeeping", "pressure washing"],
    ),
    (
        ServiceType::Hvac,
        &[
            "hvac", "heating", "cooling", "air conditioning", "furnace", "boiler",
            "ventilation", "heat pump",
        ],
    ),
    (ServiceType::Locksmith, &["lock", "key", "security", "door"]),
];

/// Ordered keyword classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_RULES
                .iter()
                .map(|(service_type, keywords)| Rule::new(*service_type, keywords.iter())),
        )
    }
}

impl Classifier {
    /// Build a classifier from rules in priority order.
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Classify a set of category labels. Never fails: no match is `Other`.
    pub fn classify<'a, I>(&self, categories: I) -> ServiceType
    where
        I: IntoIterator<Item = &'a str>,
    {
        let categories: Vec<String> = categories.into_iter().map(str::to_lowercase).collect();

        self.rules
            .iter()
            .find(|rule| categories.iter().any(|c| rule.matches(c)))
            .map(|rule| rule.service_type)
            .unwrap_or(ServiceType::Other)
    }

    /// Classify a raw listing by its primary and secondary categories.
    pub fn classify_listing(&self, listing: &RawListing) -> ServiceType {
        self.classify(listing.category_strings())
    }
}
