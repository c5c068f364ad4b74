//! The TTL cache engine.
//!
//! [`TtlCache`] wraps an [`OrderedIndex`] with per-entry expiration stamps,
//! capacity limits, an injected clock, a throttled expiration scan, an
//! eviction policy, and an optional removal notification hook.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                        TtlCache<V>                           │
//!   │                                                              │
//!   │   clock: Box<dyn Clock>        policy: Box<dyn Policy>       │
//!   │   on_remove hook               weigher                       │
//!   │   max_items / max_bytes        scan throttle                 │
//!   │                                                              │
//!   │   ┌──────────────────────────────────────────────────────┐   │
//!   │   │          OrderedIndex<Envelope<V>>                   │   │
//!   │   │                                                      │   │
//!   │   │   key ──► Envelope { value, expires_at_ms }          │   │
//!   │   │   head ──► oldest ◄──► ... ◄──► newest ◄── tail      │   │
//!   │   └──────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Removal causes
//!
//! Explicit [`remove`](TtlCache::remove), TTL expiration (lazy on
//! [`get`](TtlCache::get), eager on [`scan_and_evict`](TtlCache::scan_and_evict)),
//! capacity eviction, and [`clear`](TtlCache::clear)/drop all route through
//! one internal path: the notification hook observes the entry while it is
//! still live, then the node is unlinked (counters update there), then the
//! entry's storage is released. The hook therefore fires exactly once per
//! removed entry, before release.
//!
//! The hook cannot re-enter the cache: `&mut self` is held across the call,
//! so a hook that captured the cache would not compile.
//!
//! ## Threading
//!
//! Strictly single-threaded. No operation suspends or blocks; callers sharing
//! a cache across execution contexts must serialize externally.

use tracing::{debug, trace};

use crate::builder::CacheBuilder;
use crate::ds::{NodeId, OrderedIndex};
use crate::error::InsertError;
use crate::expiry::{is_expired, Expiry};
use crate::policy::EvictionPolicy;
use crate::time::Clock;

/// Notification hook invoked exactly once per removed entry, before the
/// entry's key and value are released. Receives key bytes, value, and size
/// contribution.
pub type RemovalHook<V> = Box<dyn FnMut(&[u8], &V, u64)>;

/// Computes an entry's size contribution from its value, for
/// [`TtlCache::insert_weighed`].
pub type Weigher<V> = Box<dyn Fn(&V) -> u64>;

/// Per-entry wrapper carrying the user value and its absolute expiration
/// stamp (`0` = never expires).
pub(crate) struct Envelope<V> {
    pub(crate) value: V,
    pub(crate) expires_at_ms: u64,
}

/// Single-threaded key-value cache with TTL expiration, dual capacity limits,
/// and a pluggable eviction policy.
///
/// ```
/// use ttlkit::cache::TtlCache;
/// use ttlkit::expiry::Expiry;
///
/// let mut cache: TtlCache<&str> = TtlCache::builder().max_items(2).build();
/// cache.insert(b"a", "alpha", 1, Expiry::Never).unwrap();
/// cache.insert(b"b", "beta", 1, Expiry::Never).unwrap();
///
/// assert_eq!(cache.get(b"a"), Some(&"alpha"));
/// assert_eq!(cache.len(), 2);
/// ```
pub struct TtlCache<V> {
    index: OrderedIndex<Envelope<V>>,
    clock: Box<dyn Clock>,
    policy: Box<dyn EvictionPolicy<Envelope<V>>>,
    on_remove: Option<RemovalHook<V>>,
    weigher: Weigher<V>,
    max_items: usize,
    max_bytes: u64,
    scan_interval_ms: u64,
    last_scan_ms: u64,
}

impl<V> TtlCache<V> {
    /// Starts configuring a cache. Defaults: LRU policy, no capacity limits,
    /// scan throttle disabled (every `maybe_scan_and_evict` call scans).
    pub fn builder() -> CacheBuilder<V> {
        CacheBuilder::new()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        clock: Box<dyn Clock>,
        policy: Box<dyn EvictionPolicy<Envelope<V>>>,
        on_remove: Option<RemovalHook<V>>,
        weigher: Weigher<V>,
        max_items: usize,
        max_bytes: u64,
        scan_interval_ms: u64,
    ) -> Self {
        Self {
            index: OrderedIndex::new(),
            clock,
            policy,
            on_remove,
            weigher,
            max_items,
            max_bytes,
            scan_interval_ms,
            last_scan_ms: 0,
        }
    }

    /// Inserts a new entry.
    ///
    /// `size` is the entry's contribution to the byte counter; its unit is
    /// caller-defined (bytes, credits, 1 per entry). Rejects empty keys and
    /// duplicate keys without changing any state; a duplicate insert is not
    /// an update.
    ///
    /// After a successful insert, capacity enforcement runs and may evict
    /// entries — including the one just inserted, if the policy picks it.
    pub fn insert(
        &mut self,
        key: &[u8],
        value: V,
        size: u64,
        expiry: Expiry,
    ) -> Result<(), InsertError> {
        let now = self.clock.now_ms();
        let expires_at_ms = expiry.resolve(now);
        self.index.insert(
            key,
            Envelope {
                value,
                expires_at_ms,
            },
            size,
        )?;
        self.enforce_capacity();
        Ok(())
    }

    /// Inserts a new entry whose size is computed by the configured weigher
    /// (default: 1 per entry).
    pub fn insert_weighed(
        &mut self,
        key: &[u8],
        value: V,
        expiry: Expiry,
    ) -> Result<(), InsertError> {
        let size = (self.weigher)(&value);
        self.insert(key, value, size, expiry)
    }

    /// Returns the value for `key` if present and not expired.
    ///
    /// An expired entry found here is removed inline (the notification hook
    /// fires) before `None` is returned. A live hit runs the policy's touch
    /// action.
    pub fn get(&mut self, key: &[u8]) -> Option<&V> {
        let id = self.index.lookup(key)?;
        let now = self.clock.now_ms();
        let expired = self
            .index
            .value(id)
            .map_or(false, |env| is_expired(env.expires_at_ms, now));
        if expired {
            trace!(now_ms = now, "entry expired on lookup");
            self.remove_entry(id);
            return None;
        }

        self.policy.on_hit(&mut self.index, id);
        self.index.value(id).map(|env| &env.value)
    }

    /// Removes the entry for `key`. Returns `true` if an entry was removed,
    /// `false` if the key was absent (a normal outcome, not an error).
    pub fn remove(&mut self, key: &[u8]) -> bool {
        match self.index.lookup(key) {
            Some(id) => self.remove_entry(id),
            None => false,
        }
    }

    /// Removes every expired entry, then enforces capacity until satisfied or
    /// the policy yields no victim.
    pub fn scan_and_evict(&mut self) {
        let now = self.clock.now_ms();
        self.remove_expired(now);
        self.enforce_capacity();
    }

    /// Runs [`scan_and_evict`](Self::scan_and_evict) if the scan throttle
    /// permits: always when the interval is zero or no scan has run yet,
    /// otherwise once the interval has elapsed since the last throttled scan.
    ///
    /// The last-scan stamp is updated on every throttled scan regardless of
    /// how many entries expired. Explicit `scan_and_evict` calls do not touch
    /// the stamp.
    pub fn maybe_scan_and_evict(&mut self) {
        let now = self.clock.now_ms();
        let due = self.scan_interval_ms == 0
            || self.last_scan_ms == 0
            || now.saturating_sub(self.last_scan_ms) >= self.scan_interval_ms;
        if due {
            self.last_scan_ms = now;
            self.remove_expired(now);
            self.enforce_capacity();
        }
    }

    /// Removes all entries. The notification hook fires once for each.
    pub fn clear(&mut self) {
        while let Some(id) = self.index.front_id() {
            self.remove_entry(id);
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the sum of all entry size contributions.
    pub fn total_size(&self) -> u64 {
        self.index.total_size()
    }

    /// Iterates entries in list order (oldest first) as `(key, value)` pairs.
    /// Does not consult expiration stamps and does not touch list order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &V)> + '_ {
        self.index.iter().map(|(key, env)| (key, &env.value))
    }

    /// Unified removal path. The hook observes the entry while it is still
    /// linked; the unlink updates the counters; the entry's storage is
    /// released last, when the removed node drops.
    fn remove_entry(&mut self, id: NodeId) -> bool {
        if let (Some(hook), Some(key), Some(env), Some(size)) = (
            self.on_remove.as_mut(),
            self.index.key(id),
            self.index.value(id),
            self.index.size(id),
        ) {
            hook(key, &env.value, size);
        }
        self.index.remove(id).is_some()
    }

    /// Walks the list from the head removing expired entries. The successor
    /// is captured before each removal, so unlinking the current node cannot
    /// derail the traversal.
    fn remove_expired(&mut self, now: u64) {
        let mut expired = 0usize;
        let mut cur = self.index.front_id();
        while let Some(id) = cur {
            let next = self.index.next_id(id);
            let is_dead = self
                .index
                .value(id)
                .map_or(false, |env| is_expired(env.expires_at_ms, now));
            if is_dead {
                self.remove_entry(id);
                expired += 1;
            }
            cur = next;
        }
        if expired > 0 {
            debug!(expired, now_ms = now, "expiration scan removed entries");
        }
    }

    fn over_limits(&self) -> bool {
        (self.max_items != 0 && self.index.len() > self.max_items)
            || (self.max_bytes != 0 && self.index.total_size() > self.max_bytes)
    }

    /// Evicts policy-chosen victims until both limits hold or the policy
    /// yields no victim. Bounded by the current entry count.
    fn enforce_capacity(&mut self) {
        while self.over_limits() {
            let Some(victim) = self.policy.pick_victim(&self.index) else {
                break;
            };
            trace!(
                len = self.index.len(),
                total_size = self.index.total_size(),
                "evicting for capacity"
            );
            if !self.remove_entry(victim) {
                break;
            }
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.index.debug_validate_invariants();
    }
}

impl<V> Drop for TtlCache<V> {
    /// Remaining entries run through the unified removal path, so the
    /// notification hook fires for each before its storage is released.
    fn drop(&mut self) {
        self.clear();
    }
}
