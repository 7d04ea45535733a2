//! The aggregation service: one logical query fanned out to every
//! configured provider, merged in completion order.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, FuturesUnordered, Stream, StreamExt};
use tracing::warn;

use common::{Error, MovieDetails, MovieItem, MovieProvider, Vendor};

use crate::cache::{CacheKey, ResultCache};

/// Type tag upstream catalogs use for movie listings; everything else
/// (series, episodes) is dropped from search results.
const MOVIE_KIND: &str = "movie";

/// Aggregates catalog data across providers behind a single query surface.
///
/// Cheap to clone; all clones share the same caches, so the single-flight
/// guarantee holds process-wide.
#[derive(Clone)]
pub struct MovieService {
    providers: Vec<Arc<dyn MovieProvider>>,
    listings: ResultCache<Vec<MovieItem>>,
    details: ResultCache<Option<MovieDetails>>,
}

impl MovieService {
    pub fn new(providers: Vec<Arc<dyn MovieProvider>>, cache_ttl: Duration) -> Self {
        Self {
            providers,
            listings: ResultCache::new(cache_ttl),
            details: ResultCache::new(cache_ttl),
        }
    }

    /// Search every provider for movies matching `partial_title`
    /// (case-insensitive substring; empty matches everything).
    ///
    /// Batches are yielded in provider-completion order, so one slow or
    /// dead provider never stalls the others' results. A provider that
    /// ultimately fails contributes nothing and is only visible in the
    /// logs.
    pub fn search(&self, partial_title: &str) -> impl Stream<Item = MovieItem> + Send + 'static {
        let batches: FuturesUnordered<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let cache = self.listings.clone();
                let term = partial_title.to_string();
                async move {
                    let vendor = provider.vendor();
                    let key = CacheKey::list(vendor, &term);
                    match cache
                        .get_or_compute(key, move || list_matching(provider, term))
                        .await
                    {
                        Ok(items) => items,
                        Err(err) => {
                            warn!("Dropping {vendor} from search results: {err}");
                            Vec::new()
                        }
                    }
                }
            })
            .collect();

        batches.flat_map(stream::iter)
    }

    /// Look up full details for one movie on one provider.
    ///
    /// `Ok(None)` means the provider reported not-found; that outcome is
    /// cached like any other value. Provider failure is not swallowed
    /// here — a detail lookup is an addressable request the caller can
    /// retry.
    pub async fn movie_details(
        &self,
        vendor: Vendor,
        id: &str,
    ) -> Result<Option<MovieDetails>, Error> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.vendor() == vendor)
            .cloned()
            .ok_or_else(|| Error::UnknownVendor(vendor.to_string()))?;

        let key = CacheKey::detail(vendor, id);
        let id = id.to_string();
        self.details
            .get_or_compute(key, move || async move {
                provider.movie_details(&id).await
            })
            .await
            .map_err(|shared| (*shared).clone())
    }
}

/// The cached listing computation: fetch, keep movies, match the title,
/// stamp the vendor. Runs at most once per (provider, term) per TTL.
async fn list_matching(
    provider: Arc<dyn MovieProvider>,
    partial_title: String,
) -> Result<Vec<MovieItem>, Error> {
    let vendor = provider.vendor();
    let listings = provider.list_movies().await?;
    let needle = partial_title.to_lowercase();

    Ok(listings
        .into_iter()
        .filter(|listing| listing.kind == MOVIE_KIND)
        .filter(|listing| needle.is_empty() || listing.title.to_lowercase().contains(&needle))
        .map(|listing| MovieItem {
            title: listing.title,
            year: listing.year,
            external_id: listing.id,
            poster: listing.poster,
            vendor,
        })
        .collect())
}
