//! Encore Core - shared types and infrastructure
//!
//! Defines the data model, error handling, logging and configuration used
//! by every other crate in the Encore workspace.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
