use serde::{Deserialize, Serialize};

use super::provider::ReviewDistribution;

/// One business record from a scraped listings dataset.
///
/// Every field is optional; scraped data is routinely incomplete and
/// `null` is treated the same as a missing key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawListing {
    pub title: Option<String>,
    pub category_name: Option<String>,
    pub categories: Option<Vec<String>>,

    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,

    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,

    pub total_score: Option<f64>,
    pub reviews_count: Option<i64>,
    pub reviews_distribution: Option<ReviewDistribution>,
    pub reviews: Option<Vec<serde_json::Value>>,

    pub permanently_closed: Option<bool>,
}

impl RawListing {
    /// Primary category followed by the secondary ones.
    pub fn category_strings(&self) -> impl Iterator<Item = &str> {
        self.category_name
            .as_deref()
            .into_iter()
            .chain(self.categories.iter().flatten().map(String::as_str))
    }

    pub fn is_closed(&self) -> bool {
        self.permanently_closed.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_scraper_record() {
        let raw: RawListing = serde_json::from_str(
            r#"{
                "title": "Pipe Masters",
                "categoryName": "Plumber",
                "categories": ["Plumber", "Drainage service"],
                "city": "Leeds",
                "phone": "+44 113 496 0000",
                "totalScore": 4.7,
                "reviewsCount": 12,
                "reviewsDistribution": {"oneStar": 1, "twoStar": 0, "threeStar": 0, "fourStar": 2, "fiveStar": 9},
                "permanentlyClosed": false,
                "unrelatedField": {"ignored": true}
            }"#,
        )
        .unwrap();

        assert_eq!(raw.title.as_deref(), Some("Pipe Masters"));
        assert_eq!(
            raw.category_strings().collect::<Vec<_>>(),
            vec!["Plumber", "Plumber", "Drainage service"]
        );
        assert_eq!(raw.reviews_distribution.unwrap().five_star, 9);
        assert!(!raw.is_closed());
    }

    #[test]
    fn test_null_fields_are_tolerated() {
        let raw: RawListing = serde_json::from_str(
            r#"{"title": "X", "categories": null, "reviews": null, "permanentlyClosed": null}"#,
        )
        .unwrap();

        assert_eq!(raw.category_strings().count(), 0);
        assert!(!raw.is_closed());
    }
}
