//! Built-in sample providers.
//!
//! Seeded alongside any scraped dataset so a fresh install has something to
//! show for the three demo neighborhoods.

use crate::types::NewProvider;

const SAMPLE_PROVIDERS: &[(&str, &str, &str, &str, f64)] = &[
    // Downtown
    ("Joe's Plumbing", "plumber", "downtown", "555-1234", 4.8),
    ("Downtown Plumbing Solutions", "plumber", "downtown", "555-5678", 4.5),
    ("Downtown Electric Co", "electrician", "downtown", "555-9876", 4.7),
    ("Spark Electricians", "electrician", "downtown", "555-4321", 4.6),
    ("Green Thumb Gardens", "gardener", "downtown", "555-2468", 4.9),
    ("Urban Oasis Landscaping", "gardener", "downtown", "555-1357", 4.4),
    // West Side
    ("West Side Plumbing", "plumber", "west side", "555-3698", 4.3),
    ("Pipe Masters", "plumber", "west side", "555-7412", 4.7),
    ("Westend Electrical Services", "electrician", "west side", "555-9632", 4.8),
    ("Reliable Electric", "electrician", "west side", "555-8521", 4.2),
    ("Westside Garden Pros", "gardener", "west side", "555-7539", 4.6),
    ("Sunset Landscaping", "gardener", "west side", "555-9517", 4.5),
    // North Hills
    ("Northside Plumbers", "plumber", "north hills", "555-1593", 4.4),
    ("Hill Top Plumbing", "plumber", "north hills", "555-7531", 4.9),
    ("North Hills Electric", "electrician", "north hills", "555-3579", 4.7),
    ("Highland Electrical", "electrician", "north hills", "555-9517", 4.5),
    ("Hilltop Gardens", "gardener", "north hills", "555-7539", 4.8),
    ("Northern Landscape Design", "gardener", "north hills", "555-1472", 4.6),
];

pub fn sample_providers() -> Vec<NewProvider> {
    SAMPLE_PROVIDERS
        .iter()
        .map(|&(name, service_type, neighborhood, contact, rating)| {
            NewProvider::new(name, service_type, neighborhood)
                .with_contact(contact)
                .with_rating(rating)
        })
        .collect()
}
