use serde::{Deserialize, Serialize};

/// Trade a provider is listed under.
///
/// The stored column is plain text, so rows written by other tools may carry
/// values outside this enum; the classifier only ever produces these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Auto,
    Handyman,
    HomeImprovement,
    Plumber,
    Electrician,
    Gardener,
    Cleaner,
    Hvac,
    Locksmith,
    Other,
}

impl ServiceType {
    pub const ALL: [ServiceType; 10] = [
        ServiceType::Auto,
        ServiceType::Handyman,
        ServiceType::HomeImprovement,
        ServiceType::Plumber,
        ServiceType::Electrician,
        ServiceType::Gardener,
        ServiceType::Cleaner,
        ServiceType::Hvac,
        ServiceType::Locksmith,
        ServiceType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Auto => "auto",
            ServiceType::Handyman => "handyman",
            ServiceType::HomeImprovement => "home_improvement",
            ServiceType::Plumber => "plumber",
            ServiceType::Electrician => "electrician",
            ServiceType::Gardener => "gardener",
            ServiceType::Cleaner => "cleaner",
            ServiceType::Hvac => "hvac",
            ServiceType::Locksmith => "locksmith",
            ServiceType::Other => "other",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ServiceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown service type: {}", s))
    }
}
