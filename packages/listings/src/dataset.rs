//! Incoming datasets.
//!
//! A [`Dataset`] is the prepared form of whatever the loader is asked to
//! merge: classified raw listings, the built-in fixtures, or both.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::classify::Classifier;
use crate::error::{ListingsError, Result};
use crate::fixtures::sample_providers;
use crate::neighborhood::extract_neighborhood;
use crate::phone::format_phone;
use crate::types::{NewProvider, RawListing};

/// Providers ready to be merged into a store.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    providers: Vec<NewProvider>,
    closed: usize,
}

impl Dataset {
    pub fn new(providers: Vec<NewProvider>) -> Self {
        Self {
            providers,
            closed: 0,
        }
    }

    /// The built-in sample providers.
    pub fn fixtures() -> Self {
        Self::new(sample_providers())
    }

    /// Classify raw listings, dropping the ones marked permanently closed.
    pub fn from_listings(listings: &[RawListing], classifier: &Classifier) -> Self {
        let mut dataset = Self::default();
        for listing in listings {
            if listing.is_closed() {
                dataset.closed += 1;
                continue;
            }
            dataset.providers.push(prepare(listing, classifier));
        }
        debug!(
            prepared = dataset.providers.len(),
            closed = dataset.closed,
            "Prepared raw listings"
        );
        dataset
    }

    /// Read a JSON array of raw listings from disk.
    pub fn from_file(path: impl AsRef<Path>, classifier: &Classifier) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ListingsError::DatasetIo {
            path: path.display().to_string(),
            source,
        })?;
        let listings: Vec<RawListing> = serde_json::from_str(&json)?;
        Ok(Self::from_listings(&listings, classifier))
    }

    /// Append another dataset after this one.
    pub fn extend(&mut self, other: Dataset) {
        self.providers.extend(other.providers);
        self.closed += other.closed;
    }

    pub fn providers(&self) -> &[NewProvider] {
        &self.providers
    }

    pub fn into_providers(self) -> Vec<NewProvider> {
        self.providers
    }

    /// Raw listings skipped because they are permanently closed.
    pub fn closed(&self) -> usize {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary::of(&self.providers)
    }
}

fn prepare(listing: &RawListing, classifier: &Classifier) -> NewProvider {
    let reviews = listing
        .reviews
        .as_ref()
        .filter(|reviews| !reviews.is_empty())
        .and_then(|reviews| serde_json::to_string(reviews).ok());

    NewProvider {
        name: listing.title.clone().unwrap_or_default(),
        service_type: classifier.classify_listing(listing).to_string(),
        neighborhood: extract_neighborhood(listing),
        contact: Some(format_phone(listing.phone.as_deref().unwrap_or_default())),
        rating: listing.total_score,
        address: listing.address.clone(),
        street: listing.street.clone(),
        city: listing.city.clone(),
        postal_code: listing.postal_code.clone(),
        website: listing.website.clone(),
        full_phone: listing.phone.clone(),
        email: listing.email.clone(),
        reviews_count: listing.reviews_count,
        review_distribution: listing.reviews_distribution,
        reviews,
    }
}

/// Provider counts per service type and neighborhood, largest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub service_types: Vec<(String, usize)>,
    pub neighborhoods: Vec<(String, usize)>,
}

impl DatasetSummary {
    pub fn of(providers: &[NewProvider]) -> Self {
        Self {
            service_types: tally(providers.iter().map(|p| p.service_type.as_str())),
            neighborhoods: tally(providers.iter().map(|p| p.neighborhood.as_str())),
        }
    }
}

fn tally<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listings() -> Vec<RawListing> {
        serde_json::from_str(
            r#"[
                {
                    "title": "Hill Top Plumbing",
                    "categoryName": "Plumber",
                    "city": "North Hills",
                    "phone": "+1 (555) 753-1000",
                    "totalScore": 4.9,
                    "reviews": [{"name": "A", "stars": 5}]
                },
                {
                    "title": "Closed Sparks",
                    "categoryName": "Electrician",
                    "city": "Downtown",
                    "permanentlyClosed": true
                },
                {
                    "title": "Corner Bakery",
                    "categoryName": "Bakery",
                    "address": "1 Main St, West Side, Springfield"
                }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_from_listings_classifies_and_drops_closed() {
        let dataset = Dataset::from_listings(&listings(), &Classifier::default());

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.closed(), 1);

        let plumber = &dataset.providers()[0];
        assert_eq!(plumber.name, "Hill Top Plumbing");
        assert_eq!(plumber.service_type, "plumber");
        assert_eq!(plumber.neighborhood, "north hills");
        assert_eq!(plumber.contact.as_deref(), Some("753-1000"));
        assert_eq!(plumber.full_phone.as_deref(), Some("+1 (555) 753-1000"));
        assert_eq!(plumber.rating, Some(4.9));
        assert_eq!(plumber.reviews.as_deref(), Some(r#"[{"name":"A","stars":5}]"#));

        let bakery = &dataset.providers()[1];
        assert_eq!(bakery.service_type, "other");
        assert_eq!(bakery.neighborhood, "west side");
        assert_eq!(bakery.contact.as_deref(), Some(""));
        assert_eq!(bakery.reviews, None);
    }

    #[test]
    fn test_summary_sorts_by_count() {
        let dataset = Dataset::new(vec![
            NewProvider::new("A", "plumber", "downtown"),
            NewProvider::new("B", "plumber", "west side"),
            NewProvider::new("C", "gardener", "downtown"),
        ]);

        let summary = dataset.summary();
        assert_eq!(
            summary.service_types,
            vec![("plumber".to_string(), 2), ("gardener".to_string(), 1)]
        );
        assert_eq!(
            summary.neighborhoods,
            vec![("downtown".to_string(), 2), ("west side".to_string(), 1)]
        );
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Dataset::from_file("does/not/exist.json", &Classifier::default()).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
