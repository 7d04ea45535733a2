//! The contract every upstream catalog provider adapter implements.

use async_trait::async_trait;

use crate::error::Error;
use crate::types::{MovieDetails, MovieListing, Vendor};

/// An upstream movie-catalog provider.
///
/// Implementations are pure adapters: they translate the two logical
/// queries into upstream calls and map payloads into the shared shapes.
/// Retry and timeout behavior is owned by the adapter's transport; from
/// the aggregator's point of view a call either returns or fails within
/// a bounded time.
#[async_trait]
pub trait MovieProvider: Send + Sync {
    /// The identity stamped on this provider's results and cache keys.
    fn vendor(&self) -> Vendor;

    /// Fetch the provider's full catalog listing.
    async fn list_movies(&self) -> Result<Vec<MovieListing>, Error>;

    /// Fetch full details for one provider-scoped id.
    ///
    /// `Ok(None)` is the provider's not-found signal, a first-class
    /// outcome distinct from failure.
    async fn movie_details(&self, id: &str) -> Result<Option<MovieDetails>, Error>;
}
