//! Unified cache builder.
//!
//! Collects the cache's collaborators and limits, then assembles a
//! [`TtlCache`]. Policy selection goes through [`PolicyKind`] — either
//! directly or by name via [`CacheBuilder::policy_name`], which rejects
//! unrecognized names with a [`ConfigError`].
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use ttlkit::builder::CacheBuilder;
//! use ttlkit::expiry::Expiry;
//!
//! let mut cache = CacheBuilder::<String>::new()
//!     .policy_name("lru")
//!     .unwrap()
//!     .max_items(1_000)
//!     .max_bytes(1 << 20)
//!     .scan_interval(Duration::from_secs(1))
//!     .build();
//!
//! cache
//!     .insert(b"greeting", "hello".to_string(), 5, Expiry::Never)
//!     .unwrap();
//! assert_eq!(cache.len(), 1);
//! ```

use std::time::Duration;

use crate::cache::{Envelope, RemovalHook, TtlCache, Weigher};
use crate::error::ConfigError;
use crate::policy::{EvictionPolicy, FifoPolicy, LruPolicy, PolicyKind, RandomPolicy};
use crate::time::{Clock, SystemClock};

/// Builder for [`TtlCache`] instances.
///
/// Defaults: LRU policy, no capacity limits (`0` disables each), scan
/// throttle disabled, [`SystemClock`], no removal hook, weigher of 1 per
/// entry.
pub struct CacheBuilder<V> {
    policy: PolicyKind,
    rng: Option<Box<dyn FnMut() -> u32>>,
    max_items: usize,
    max_bytes: u64,
    scan_interval_ms: u64,
    clock: Option<Box<dyn Clock>>,
    on_remove: Option<RemovalHook<V>>,
    weigher: Option<Weigher<V>>,
}

impl<V> CacheBuilder<V> {
    /// Creates a builder with the defaults described above.
    pub fn new() -> Self {
        Self {
            policy: PolicyKind::Lru,
            rng: None,
            max_items: 0,
            max_bytes: 0,
            scan_interval_ms: 0,
            clock: None,
            on_remove: None,
            weigher: None,
        }
    }

    /// Selects the eviction policy.
    pub fn policy(mut self, kind: PolicyKind) -> Self {
        self.policy = kind;
        self
    }

    /// Selects the eviction policy by configuration name
    /// (`"lru"`, `"fifo"`, `"random"`).
    pub fn policy_name(self, name: &str) -> Result<Self, ConfigError> {
        Ok(self.policy(name.parse()?))
    }

    /// Caps the entry count. `0` disables the limit.
    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Caps the total accounted size. `0` disables the limit.
    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Minimum time between two scans triggered through
    /// [`maybe_scan_and_evict`](TtlCache::maybe_scan_and_evict).
    /// Zero means every call scans.
    pub fn scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval_ms = interval.as_millis().min(u128::from(u64::MAX)) as u64;
        self
    }

    /// Injects the time source. Readings must be non-decreasing over the
    /// cache's lifetime.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Injects the 32-bit uniform source used by the Random policy. Ignored
    /// by the other policies.
    pub fn rng(mut self, rng: impl FnMut() -> u32 + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Registers the removal notification hook, invoked exactly once per
    /// removed entry (any cause) before the entry is released.
    pub fn on_remove(mut self, hook: impl FnMut(&[u8], &V, u64) + 'static) -> Self {
        self.on_remove = Some(Box::new(hook));
        self
    }

    /// Registers the size function used by
    /// [`insert_weighed`](TtlCache::insert_weighed).
    pub fn weigher(mut self, weigher: impl Fn(&V) -> u64 + 'static) -> Self {
        self.weigher = Some(Box::new(weigher));
        self
    }

    /// Assembles the cache.
    pub fn build(self) -> TtlCache<V> {
        let policy: Box<dyn EvictionPolicy<Envelope<V>>> = match self.policy {
            PolicyKind::Lru => Box::new(LruPolicy),
            PolicyKind::Fifo => Box::new(FifoPolicy),
            PolicyKind::Random => Box::new(match self.rng {
                Some(rng) => RandomPolicy::from_boxed(rng),
                None => RandomPolicy::new(),
            }),
        };
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(SystemClock::new()) as Box<dyn Clock>);
        let weigher = self.weigher.unwrap_or_else(|| Box::new(|_| 1));

        TtlCache::from_parts(
            clock,
            policy,
            self.on_remove,
            weigher,
            self.max_items,
            self.max_bytes,
            self.scan_interval_ms,
        )
    }
}

impl<V> Default for CacheBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}
