//! Providers domain - service provider directory

pub mod actions;
pub mod data;

// Re-export commonly used types
pub use actions::{get_options, get_recommendations};
pub use data::{OptionsData, ProviderData, RecommendationData, RecommendationStrength};
