//! Provider actions - business logic behind the HTTP routes
//!
//! Actions take the store handle explicitly and return API data types.

pub mod queries;

pub use queries::*;
