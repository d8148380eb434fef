use listings::{Provider, ReviewDistribution};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Provider data type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderData {
    pub id: i64,

    // Profile
    pub name: String,
    pub service_type: String,
    pub neighborhood: String,
    pub contact: Option<String>,
    pub rating: Option<f64>,

    // Location
    pub address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,

    // Contact details
    pub website: Option<String>,
    pub full_phone: Option<String>,
    pub email: Option<String>,

    // Reviews
    pub reviews_count: Option<i64>,
    pub review_distribution: Option<ReviewDistribution>,
    pub reviews: Vec<Value>,
}

impl From<Provider> for ProviderData {
    fn from(provider: Provider) -> Self {
        let review_distribution = provider.review_distribution();
        let reviews = parse_reviews(provider.id, provider.reviews.as_deref());

        Self {
            id: provider.id,
            name: provider.name,
            service_type: provider.service_type,
            neighborhood: provider.neighborhood,
            contact: provider.contact,
            rating: provider.rating,
            address: provider.address,
            street: provider.street,
            city: provider.city,
            postal_code: provider.postal_code,
            website: provider.website,
            full_phone: provider.full_phone,
            email: provider.email,
            reviews_count: provider.reviews_count,
            review_distribution,
            reviews,
        }
    }
}

/// Stored reviews are JSON text; anything unreadable becomes an empty list.
fn parse_reviews(id: i64, reviews: Option<&str>) -> Vec<Value> {
    let Some(text) = reviews.filter(|text| !text.trim().is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str(text) {
        Ok(Value::Array(reviews)) => reviews,
        Ok(_) => {
            warn!(provider_id = id, "Stored reviews are not a JSON array");
            Vec::new()
        }
        Err(e) => {
            warn!(provider_id = id, error = %e, "Failed to parse stored reviews");
            Vec::new()
        }
    }
}

/// Distinct values offered in the search form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsData {
    pub service_types: Vec<String>,
    pub neighbourhoods: Vec<String>,
}
