// HTTP routes
pub mod health;
pub mod index;
pub mod options;
pub mod recommendations;

pub use health::*;
pub use index::*;
pub use options::*;
pub use recommendations::*;
