//! Locality extraction for raw listings.

use crate::types::RawListing;

/// Sentinel returned when a listing carries no usable locality.
pub const UNKNOWN_NEIGHBORHOOD: &str = "unknown";

/// Derive the lowercase neighborhood token for a listing.
///
/// Priority: explicit `neighborhood`, then `city`, then the second
/// comma-separated segment of `address`, then [`UNKNOWN_NEIGHBORHOOD`].
pub fn extract_neighborhood(listing: &RawListing) -> String {
    non_empty(listing.neighborhood.as_deref())
        .or_else(|| non_empty(listing.city.as_deref()))
        .or_else(|| {
            listing
                .address
                .as_deref()
                .and_then(|address| non_empty(address.split(',').nth(1)))
        })
        .map(str::to_lowercase)
        .unwrap_or_else(|| UNKNOWN_NEIGHBORHOOD.to_string())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(neighborhood: Option<&str>, city: Option<&str>, address: Option<&str>) -> RawListing {
        RawListing {
            neighborhood: neighborhood.map(String::from),
            city: city.map(String::from),
            address: address.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_explicit_neighborhood_wins_over_city() {
        let raw = listing(Some("Hyde Park"), Some("Leeds"), Some("1 Main St, Headingley"));
        assert_eq!(extract_neighborhood(&raw), "hyde park");
    }

    #[test]
    fn test_city_fallback() {
        let raw = listing(None, Some("Leeds"), Some("1 Main St, Headingley"));
        assert_eq!(extract_neighborhood(&raw), "leeds");

        let raw = listing(Some(""), Some("Leeds"), None);
        assert_eq!(extract_neighborhood(&raw), "leeds");
    }

    #[test]
    fn test_address_second_segment() {
        let raw = listing(None, None, Some("12 Otley Rd,  Headingley , Leeds LS6"));
        assert_eq!(extract_neighborhood(&raw), "headingley");
    }

    #[test]
    fn test_unknown_when_nothing_usable() {
        assert_eq!(extract_neighborhood(&listing(None, None, None)), UNKNOWN_NEIGHBORHOOD);
        assert_eq!(
            extract_neighborhood(&listing(None, Some("  "), Some("No commas here"))),
            UNKNOWN_NEIGHBORHOOD
        );
        assert_eq!(
            extract_neighborhood(&listing(None, None, Some("12 Otley Rd, "))),
            UNKNOWN_NEIGHBORHOOD
        );
    }
}
