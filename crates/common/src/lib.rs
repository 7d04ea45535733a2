//! Shared types, config, and error definitions for the movie aggregation
//! service.

pub mod config;
pub mod error;
pub mod provider;
pub mod resilience;
pub mod types;

pub use config::AppConfig;
pub use error::Error;
pub use provider::MovieProvider;
pub use resilience::RetryPolicy;
pub use types::*;

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
