use serde::{Deserialize, Serialize};

/// Star-rating histogram as published by the listing source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDistribution {
    #[serde(default)]
    pub one_star: i64,
    #[serde(default)]
    pub two_star: i64,
    #[serde(default)]
    pub three_star: i64,
    #[serde(default)]
    pub four_star: i64,
    #[serde(default)]
    pub five_star: i64,
}

/// A stored provider row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(
    any(feature = "sqlite", feature = "postgres"),
    derive(sqlx::FromRow)
)]
pub struct Provider {
    pub id: i64,

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
    pub one_star: Option<i64>,
    pub two_star: Option<i64>,
    pub three_star: Option<i64>,
    pub four_star: Option<i64>,
    pub five_star: Option<i64>,
    /// Individual reviews as serialized JSON text.
    pub reviews: Option<String>,
}

impl Provider {
    /// Review histogram, if the row carries any bucket.
    pub fn review_distribution(&self) -> Option<ReviewDistribution> {
        let buckets = [
            self.one_star,
            self.two_star,
            self.three_star,
            self.four_star,
            self.five_star,
        ];
        if buckets.iter().all(Option::is_none) {
            return None;
        }
        Some(ReviewDistribution {
            one_star: self.one_star.unwrap_or(0),
            two_star: self.two_star.unwrap_or(0),
            three_star: self.three_star.unwrap_or(0),
            four_star: self.four_star.unwrap_or(0),
            five_star: self.five_star.unwrap_or(0),
        })
    }

    pub(crate) fn from_new(id: i64, input: &NewProvider) -> Self {
        let dist = input.review_distribution;
        Self {
            id,
            name: input.name.clone(),
            service_type: input.service_type.clone(),
            neighborhood: input.neighborhood.clone(),
            contact: input.contact.clone(),
            rating: input.rating,
            address: input.address.clone(),
            street: input.street.clone(),
            city: input.city.clone(),
            postal_code: input.postal_code.clone(),
            website: input.website.clone(),
            full_phone: input.full_phone.clone(),
            email: input.email.clone(),
            reviews_count: input.reviews_count,
            one_star: dist.map(|d| d.one_star),
            two_star: dist.map(|d| d.two_star),
            three_star: dist.map(|d| d.three_star),
            four_star: dist.map(|d| d.four_star),
            five_star: dist.map(|d| d.five_star),
            reviews: input.reviews.clone(),
        }
    }
}

/// Input for inserting a provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProvider {
    pub name: String,
    pub service_type: String,
    pub neighborhood: String,
    pub contact: Option<String>,
    pub rating: Option<f64>,
    pub address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub website: Option<String>,
    pub full_phone: Option<String>,
    pub email: Option<String>,
    pub reviews_count: Option<i64>,
    pub review_distribution: Option<ReviewDistribution>,
    pub reviews: Option<String>,
}

impl NewProvider {
    pub fn new(
        name: impl Into<String>,
        service_type: impl Into<String>,
        neighborhood: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            service_type: service_type.into(),
            neighborhood: neighborhood.into(),
            ..Default::default()
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }
}
