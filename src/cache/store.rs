//! Client-side synchronization cache.
//!
//! Each logical resource moves through `Uninitialized -> Loading ->
//! Ready | Failed`. Reads return the cached value when it is fresh, join an
//! in-flight request for the same key instead of issuing a duplicate call,
//! and are suppressed entirely for caller-scoped resources when no identity
//! is present. Writes never touch their own read state; they mark dependent
//! keys stale so the next read refetches. Switching identities drops the
//! whole cache.
//!
//! Failed loads keep any previously cached value so views can keep showing
//! data alongside the error flag. Nothing here retries automatically.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::key::{ResourceKey, Scope};
use crate::auth::Principal;

/// Lifecycle state of a cached resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStatus {
    /// No session yet, or never read.
    Uninitialized,
    /// A request is in flight.
    Loading,
    /// The cached value is current.
    Ready,
    /// The last load failed; any earlier value is still cached.
    Failed,
}

/// Snapshot of a resource as surfaced to a view.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub status: ResourceStatus,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ResourceState<T> {
    pub fn uninitialized() -> Self {
        Self {
            status: ResourceStatus::Uninitialized,
            data: None,
            error: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ResourceStatus::Ready
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Cache slot identity: the resource plus the caller it was fetched for.
/// Public resources use `caller: None` regardless of session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SlotKey {
    caller: Option<Principal>,
    resource: ResourceKey,
}

struct Slot {
    status: ResourceStatus,
    value: Option<Value>,
    error: Option<String>,
    stale: bool,
    /// Bumped whenever a load settles; joiners of an in-flight request
    /// wait on this.
    settled: watch::Sender<u64>,
}

impl Slot {
    fn new() -> Self {
        let (settled, _) = watch::channel(0);
        Self {
            status: ResourceStatus::Uninitialized,
            value: None,
            error: None,
            stale: false,
            settled,
        }
    }

    fn snapshot<T: DeserializeOwned>(&self) -> ResourceState<T> {
        let data = self.value.as_ref().and_then(|value| {
            match serde_json::from_value(value.clone()) {
                Ok(data) => Some(data),
                Err(e) => {
                    warn!(error = %e, "Cached value failed to decode");
                    None
                }
            }
        });
        ResourceState {
            status: self.status,
            data,
            error: self.error.clone(),
        }
    }
}

/// Process-wide cache keyed by `(caller, resource)`.
pub struct SyncCache {
    slots: Mutex<HashMap<SlotKey, Slot>>,
    last_caller: Mutex<Option<Principal>>,
}

impl Default for SyncCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncCache {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            last_caller: Mutex::new(None),
        }
    }

    /// Drop every cached record.
    pub async fn clear_all(&self) {
        self.slots.lock().await.clear();
    }

    /// Mark the given keys stale so their next read refetches. Keys with
    /// no cached slot are ignored.
    pub async fn invalidate<I>(&self, keys: I)
    where
        I: IntoIterator<Item = ResourceKey>,
    {
        let caller = self.last_caller.lock().await.clone();
        let mut slots = self.slots.lock().await;
        for resource in keys {
            let key = SlotKey {
                caller: match resource.scope() {
                    Scope::Caller => caller.clone(),
                    Scope::Public => None,
                },
                resource,
            };
            if let Some(slot) = slots.get_mut(&key) {
                slot.stale = true;
                debug!(key = %key.resource, "Marked stale");
            }
        }
    }

    /// Track the caller the next reads run as. Switching identities drops
    /// the whole cache so one caller's records can never leak into another
    /// caller's session.
    async fn sync_identity(&self, caller: &Option<Principal>) {
        let mut last = self.last_caller.lock().await;
        if *last != *caller {
            info!("Identity changed, clearing cache");
            self.slots.lock().await.clear();
            *last = caller.clone();
        }
    }

    /// Read a resource through the cache.
    ///
    /// `load` is called at most once per settled request across all
    /// concurrent readers of the same key. Caller-scoped keys with no
    /// identity return `Uninitialized` without calling `load`.
    pub async fn fetch<T, E, F, Fut>(
        &self,
        caller: Option<Principal>,
        resource: ResourceKey,
        load: F,
    ) -> ResourceState<T>
    where
        T: Serialize + DeserializeOwned,
        E: fmt::Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.sync_identity(&caller).await;

        let slot_caller = match resource.scope() {
            Scope::Caller => match caller {
                Some(principal) => Some(principal),
                None => {
                    debug!(key = %resource, "No identity, read suppressed");
                    return ResourceState::uninitialized();
                }
            },
            Scope::Public => None,
        };
        let key = SlotKey {
            caller: slot_caller,
            resource,
        };

        // Decide whether this reader loads, joins, or hits the cache.
        loop {
            let mut settled_rx = {
                let mut slots = self.slots.lock().await;
                let slot = slots.entry(key.clone()).or_insert_with(Slot::new);
                match slot.status {
                    ResourceStatus::Loading => slot.settled.subscribe(),
                    ResourceStatus::Ready if !slot.stale => {
                        debug!(key = %key.resource, "Cache hit");
                        return slot.snapshot();
                    }
                    _ => {
                        slot.status = ResourceStatus::Loading;
                        break;
                    }
                }
            };

            debug!(key = %key.resource, "Joining in-flight request");
            if settled_rx.changed().await.is_ok() {
                let slots = self.slots.lock().await;
                if let Some(slot) = slots.get(&key) {
                    if matches!(slot.status, ResourceStatus::Ready | ResourceStatus::Failed) {
                        return slot.snapshot();
                    }
                }
            }
            // Sender dropped (cache cleared) or the slot restarted; take
            // another pass.
        }

        debug!(key = %key.resource, "Fetching");
        let outcome = load().await;

        let mut slots = self.slots.lock().await;
        match slots.get_mut(&key) {
            Some(slot) if slot.status == ResourceStatus::Loading => {
                match outcome {
                    Ok(data) => match serde_json::to_value(&data) {
                        Ok(value) => {
                            slot.status = ResourceStatus::Ready;
                            slot.value = Some(value);
                            slot.stale = false;
                            slot.error = None;
                        }
                        Err(e) => {
                            warn!(key = %key.resource, error = %e, "Response failed to encode for caching");
                            slot.status = ResourceStatus::Failed;
                            slot.error = Some(e.to_string());
                        }
                    },
                    Err(e) => {
                        // Keep any previously cached value for display.
                        slot.status = ResourceStatus::Failed;
                        slot.error = Some(e.to_string());
                    }
                }
                let next = *slot.settled.borrow() + 1;
                let _ = slot.settled.send(next);
                slot.snapshot()
            }
            _ => {
                // The cache was cleared while the request was in flight
                // (identity switch). Drop the late response silently.
                debug!(key = %key.resource, "Late response after cache clear, dropped");
                ResourceState::uninitialized()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn alice() -> Option<Principal> {
        Some(Principal::new("alice"))
    }

    #[tokio::test]
    async fn test_caller_scoped_read_without_identity_is_suppressed() {
        let cache = SyncCache::new();
        let calls = AtomicUsize::new(0);

        let state: ResourceState<Vec<u32>> = cache
            .fetch(None, ResourceKey::AncVisits, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, String>(vec![1]) }
            })
            .await;

        assert_eq!(state.status, ResourceStatus::Uninitialized);
        assert_eq!(state.data, None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_public_read_without_identity_proceeds() {
        let cache = SyncCache::new();
        let state: ResourceState<u64> = cache
            .fetch(None, ResourceKey::TotalVisitors, || async {
                Ok::<_, String>(42)
            })
            .await;
        assert!(state.is_ready());
        assert_eq!(state.data, Some(42));
    }

    #[tokio::test]
    async fn test_second_read_hits_cache() {
        let cache = SyncCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let state: ResourceState<Vec<u32>> = cache
                .fetch(alice(), ResourceKey::AncVisits, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok::<_, String>(vec![1, 2]) }
                })
                .await;
            assert!(state.is_ready());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_overlapping_reads_deduplicate() {
        let cache = Arc::new(SyncCache::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());

        let load = |calls: Arc<AtomicUsize>, gate: Arc<Notify>| {
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                gate.notified().await;
                Ok::<_, String>(vec![7u32])
            }
        };

        let first = cache.fetch(
            alice(),
            ResourceKey::AncVisits,
            load(calls.clone(), gate.clone()),
        );
        let second = cache.fetch(
            alice(),
            ResourceKey::AncVisits,
            load(calls.clone(), gate.clone()),
        );
        let release = async {
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            gate.notify_one();
        };

        let (first, second, _) = tokio::join!(first, second, release);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.data, Some(vec![7u32]));
        assert_eq!(second.data, Some(vec![7u32]));
        assert!(first.is_ready() && second.is_ready());
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache = SyncCache::new();
        let calls = AtomicUsize::new(0);

        let state: ResourceState<Vec<u32>> = cache
            .fetch(alice(), ResourceKey::AncVisits, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, String>(vec![0]) }
            })
            .await;
        assert_eq!(state.data, Some(vec![0]));

        cache.invalidate([ResourceKey::AncVisits]).await;

        let state: ResourceState<Vec<u32>> = cache
            .fetch(alice(), ResourceKey::AncVisits, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, String>(vec![1]) }
            })
            .await;
        assert_eq!(state.data, Some(vec![1]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_preserves_cached_value() {
        let cache = SyncCache::new();

        let state: ResourceState<Vec<u32>> = cache
            .fetch(alice(), ResourceKey::Measurements, || async {
                Ok::<_, String>(vec![3])
            })
            .await;
        assert_eq!(state.data, Some(vec![3]));

        cache.invalidate([ResourceKey::Measurements]).await;

        let state: ResourceState<Vec<u32>> = cache
            .fetch(alice(), ResourceKey::Measurements, || async {
                Err::<Vec<u32>, _>("connection reset".to_string())
            })
            .await;

        assert_eq!(state.status, ResourceStatus::Failed);
        assert_eq!(state.data, Some(vec![3]));
        assert_eq!(state.error.as_deref(), Some("connection reset"));
    }

    #[tokio::test]
    async fn test_failed_slot_refetches_on_next_read() {
        let cache = SyncCache::new();
        let calls = AtomicUsize::new(0);

        let state: ResourceState<u64> = cache
            .fetch(alice(), ResourceKey::CallerRole, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<u64, _>("boom".to_string()) }
            })
            .await;
        assert_eq!(state.status, ResourceStatus::Failed);

        let state: ResourceState<u64> = cache
            .fetch(alice(), ResourceKey::CallerRole, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, String>(9) }
            })
            .await;
        assert!(state.is_ready());
        assert_eq!(state.error, None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_identity_switch_clears_cache() {
        let cache = SyncCache::new();

        let state: ResourceState<u32> = cache
            .fetch(alice(), ResourceKey::Profile, || async {
                Ok::<_, String>(1)
            })
            .await;
        assert_eq!(state.data, Some(1));

        // Bob must not see Alice's cached profile.
        let state: ResourceState<u32> = cache
            .fetch(Some(Principal::new("bob")), ResourceKey::Profile, || async {
                Ok::<_, String>(2)
            })
            .await;
        assert_eq!(state.data, Some(2));

        // Logging out suppresses the read and drops Bob's cache.
        let anonymous: ResourceState<u32> = cache
            .fetch(None, ResourceKey::Profile, || async { Ok::<_, String>(99) })
            .await;
        assert_eq!(anonymous.status, ResourceStatus::Uninitialized);

        // Back in as Bob: cold start, the load runs again.
        let state: ResourceState<u32> = cache
            .fetch(Some(Principal::new("bob")), ResourceKey::Profile, || async {
                Ok::<_, String>(3)
            })
            .await;
        assert_eq!(state.data, Some(3));
    }
}
