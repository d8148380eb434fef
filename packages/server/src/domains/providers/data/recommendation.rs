use serde::{Deserialize, Serialize};

use super::provider::ProviderData;

/// Coarse label derived from a provider's rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationStrength {
    #[serde(rename = "Highly Recommended")]
    Highly,
    #[serde(rename = "Strongly Recommended")]
    Strongly,
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Somewhat Recommended")]
    Somewhat,
}

impl RecommendationStrength {
    /// Unrated providers get the weakest label.
    pub fn for_rating(rating: Option<f64>) -> Self {
        match rating {
            Some(r) if r >= 4.8 => Self::Highly,
            Some(r) if r >= 4.5 => Self::Strongly,
            Some(r) if r >= 4.0 => Self::Recommended,
            _ => Self::Somewhat,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Highly => "Highly Recommended",
            Self::Strongly => "Strongly Recommended",
            Self::Recommended => "Recommended",
            Self::Somewhat => "Somewhat Recommended",
        }
    }
}

impl std::fmt::Display for RecommendationStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider annotated with its position in a recommendation list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationData {
    #[serde(flatten)]
    pub provider: ProviderData,
    /// 1-based position in the list.
    pub rank: usize,
    pub recommendation_strength: RecommendationStrength,
}

impl RecommendationData {
    pub fn new(rank: usize, provider: ProviderData) -> Self {
        Self {
            recommendation_strength: RecommendationStrength::for_rating(provider.rating),
            provider,
            rank,
        }
    }
}
