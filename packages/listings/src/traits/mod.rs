//! Core traits.

pub mod store;

pub use store::{ProviderBatch, ProviderStore};
