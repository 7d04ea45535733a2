//! Movie aggregation core.
//!
//! Fans a logical query out to every configured provider, merges batches
//! as they complete, and de-duplicates concurrent upstream calls through
//! a single-flight TTL cache.

pub mod cache;
pub mod service;

pub use cache::{CacheKey, Operation, ResultCache};
pub use service::MovieService;
