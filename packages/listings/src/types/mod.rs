//! Domain types.

pub mod provider;
pub mod raw;
pub mod service_type;

pub use provider::{NewProvider, Provider, ReviewDistribution};
pub use raw::RawListing;
pub use service_type::ServiceType;
