//! Single-flight, time-bounded cache for per-provider query results.
//!
//! Concurrent callers of the same key collapse into one upstream
//! computation: the first caller installs a shared future in the slot,
//! late arrivals clone and await it. A successful value is kept for the
//! configured TTL; a failure is delivered to every current waiter and the
//! slot is cleared so the next caller gets a fresh attempt.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;

use common::{Error, Vendor};

/// Which aggregator operation a cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Detail,
}

/// Composite key: operation kind, provider, and the normalized query term
/// (partial title for listings, provider-scoped id for details).
///
/// Terms are compared exactly; two spellings of the same search are two
/// keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub op: Operation,
    pub vendor: Vendor,
    pub term: String,
}

impl CacheKey {
    pub fn list(vendor: Vendor, partial_title: &str) -> Self {
        Self {
            op: Operation::List,
            vendor,
            term: partial_title.to_string(),
        }
    }

    pub fn detail(vendor: Vendor, id: &str) -> Self {
        Self {
            op: Operation::Detail,
            vendor,
            term: id.to_string(),
        }
    }
}

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, Arc<Error>>>>;

enum Slot<V> {
    Ready { value: V, expires_at: Instant },
    Pending { epoch: u64, task: SharedFetch<V> },
}

enum Claim<V> {
    Fresh(V),
    InFlight(u64, SharedFetch<V>),
    Expired,
}

struct CacheInner<V> {
    ttl: Duration,
    epochs: AtomicU64,
    slots: DashMap<CacheKey, Slot<V>>,
}

/// Cheaply cloneable handle over the shared slot map.
pub struct ResultCache<V> {
    inner: Arc<CacheInner<V>>,
}

impl<V> Clone for ResultCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                ttl,
                epochs: AtomicU64::new(0),
                slots: DashMap::new(),
            }),
        }
    }

    /// Return the cached value for `key`, or run `compute` to produce it.
    ///
    /// `compute` is invoked at most once per key however many callers
    /// arrive concurrently; every waiter observes the one result. Errors
    /// are shared as `Arc` because a single failure fans out to all of
    /// them.
    pub async fn get_or_compute<F, Fut>(&self, key: CacheKey, compute: F) -> Result<V, Arc<Error>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, Error>> + Send + 'static,
    {
        let now = Instant::now();

        // Claim the slot without holding the shard lock across any await.
        let (epoch, task) = match self.inner.slots.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                let claim = match occupied.get() {
                    Slot::Ready { value, expires_at } if *expires_at > now => {
                        Claim::Fresh(value.clone())
                    }
                    Slot::Ready { .. } => Claim::Expired,
                    Slot::Pending { epoch, task } => Claim::InFlight(*epoch, task.clone()),
                };
                match claim {
                    Claim::Fresh(value) => return Ok(value),
                    Claim::InFlight(epoch, task) => (epoch, task),
                    Claim::Expired => {
                        let (epoch, task) = self.inner.begin_fetch(compute);
                        occupied.insert(Slot::Pending {
                            epoch,
                            task: task.clone(),
                        });
                        (epoch, task)
                    }
                }
            }
            Entry::Vacant(vacant) => {
                let (epoch, task) = self.inner.begin_fetch(compute);
                vacant.insert(Slot::Pending {
                    epoch,
                    task: task.clone(),
                });
                (epoch, task)
            }
        };

        let result = task.await;
        self.inner.settle(&key, epoch, &result);
        result
    }
}

impl<V> CacheInner<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Wrap a computation into a shared future tagged with a fresh epoch.
    /// The future is not polled here; the slot map never blocks on it.
    fn begin_fetch<F, Fut>(&self, compute: F) -> (u64, SharedFetch<V>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, Error>> + Send + 'static,
    {
        let epoch = self.epochs.fetch_add(1, Ordering::Relaxed);
        let fut = compute();
        let task = async move { fut.await.map_err(Arc::new) }.boxed().shared();
        (epoch, task)
    }

    /// Transition a pending slot to its final state. Every waiter calls
    /// this; the epoch guard makes it idempotent and keeps a waiter from a
    /// previous flight from clobbering a newer one.
    fn settle(&self, key: &CacheKey, epoch: u64, result: &Result<V, Arc<Error>>) {
        if let Entry::Occupied(mut occupied) = self.slots.entry(key.clone()) {
            let ours = matches!(occupied.get(), Slot::Pending { epoch: e, .. } if *e == epoch);
            if !ours {
                return;
            }
            match result {
                Ok(value) => {
                    occupied.insert(Slot::Ready {
                        value: value.clone(),
                        expires_at: Instant::now() + self.ttl,
                    });
                }
                Err(_) => {
                    occupied.remove();
                }
            }
        }
    }
}
