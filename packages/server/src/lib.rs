// Neighbourhood Pro Finder - API Core
//
// HTTP API answering "who should I call for this job in my neighborhood".
// Provider storage, classification and loading live in the `listings` crate;
// this crate wires them to configuration, startup seeding and axum routes.

pub mod config;
pub mod domains;
pub mod seed;
pub mod server;

pub use config::*;
