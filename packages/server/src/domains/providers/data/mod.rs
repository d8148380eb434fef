pub mod provider;
pub mod recommendation;

pub use provider::*;
pub use recommendation::*;
