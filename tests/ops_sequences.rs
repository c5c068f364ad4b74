// ==============================================
// RANDOMIZED OPERATION SEQUENCES (integration)
// ==============================================
//
// Drives the cache with arbitrary op sequences and checks the structural
// invariants after every step: counters agree with a reference model,
// capacity limits hold whenever the cache is non-empty, and the removal hook
// fires exactly once per entry that ever left the cache.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use proptest::prelude::*;

use ttlkit::cache::TtlCache;
use ttlkit::expiry::Expiry;
use ttlkit::policy::PolicyKind;
use ttlkit::time::{Clock, ManualClock};

#[derive(Debug, Clone)]
enum Op {
    Insert { key: u8, size: u8, ttl_ms: u16 },
    Get { key: u8 },
    Remove { key: u8 },
    Scan,
    Advance { ms: u16 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..8, any::<u8>(), any::<u16>())
            .prop_map(|(key, size, ttl_ms)| Op::Insert { key, size, ttl_ms }),
        (0u8..8).prop_map(|key| Op::Get { key }),
        (0u8..8).prop_map(|key| Op::Remove { key }),
        Just(Op::Scan),
        (1u16..500).prop_map(|ms| Op::Advance { ms }),
    ]
}

fn key_bytes(key: u8) -> Vec<u8> {
    format!("k{key}").into_bytes()
}

/// Reference entry: value, expiration stamp (0 = never), size.
struct ModelEntry {
    expires_at: u64,
    size: u64,
}

fn model_expired(entry: &ModelEntry, now: u64) -> bool {
    entry.expires_at != 0 && entry.expires_at <= now
}

proptest! {
    /// With no capacity limits, the cache tracks a plain map-with-expiry
    /// model exactly: same membership, same counters, one hook call per
    /// departed entry.
    #[test]
    fn unbounded_cache_matches_reference_model(
        ops in proptest::collection::vec(op_strategy(), 1..80)
    ) {
        let clock = ManualClock::new(1);
        let removed = Rc::new(RefCell::new(0usize));
        let removed_sink = Rc::clone(&removed);
        let mut cache: TtlCache<u8> = TtlCache::builder()
            .clock(clock.clone())
            .on_remove(move |_key: &[u8], _value: &u8, _size| {
                *removed_sink.borrow_mut() += 1;
            })
            .build();

        let mut model: HashMap<Vec<u8>, ModelEntry> = HashMap::new();
        let mut inserted = 0usize;

        for op in ops {
            let now = clock.now_ms();
            match op {
                Op::Insert { key, size, ttl_ms } => {
                    let key = key_bytes(key);
                    let outcome = cache.insert(
                        &key,
                        key[1],
                        u64::from(size),
                        Expiry::from_millis(u64::from(ttl_ms), 0),
                    );
                    if model.contains_key(&key) {
                        prop_assert!(outcome.is_err());
                    } else {
                        prop_assert!(outcome.is_ok());
                        inserted += 1;
                        let expires_at = if ttl_ms == 0 {
                            0
                        } else {
                            now + u64::from(ttl_ms)
                        };
                        model.insert(
                            key,
                            ModelEntry {
                                expires_at,
                                size: u64::from(size),
                            },
                        );
                    }
                }
                Op::Get { key } => {
                    let key = key_bytes(key);
                    let live = match model.get(&key) {
                        Some(entry) if model_expired(entry, now) => {
                            // Lazy expiration: the lookup removes it.
                            model.remove(&key);
                            false
                        }
                        Some(_) => true,
                        None => false,
                    };
                    prop_assert_eq!(cache.get(&key).is_some(), live);
                }
                Op::Remove { key } => {
                    let key = key_bytes(key);
                    let expected = model.remove(&key).is_some();
                    prop_assert_eq!(cache.remove(&key), expected);
                }
                Op::Scan => {
                    cache.scan_and_evict();
                    model.retain(|_, entry| !model_expired(entry, now));
                }
                Op::Advance { ms } => {
                    clock.advance(u64::from(ms));
                }
            }

            cache.debug_validate_invariants();
            prop_assert_eq!(cache.len(), model.len());
            let model_size: u64 = model.values().map(|e| e.size).sum();
            prop_assert_eq!(cache.total_size(), model_size);
            prop_assert_eq!(*removed.borrow(), inserted - model.len());
        }

        // Every key the cache still reports must be in the model.
        for (key, _) in cache.iter() {
            prop_assert!(model.contains_key(key));
        }

        cache.clear();
        prop_assert_eq!(*removed.borrow(), inserted);
    }

    /// Under capacity limits, every public operation leaves the limits
    /// satisfied (built-in policies always produce a victim while entries
    /// remain).
    #[test]
    fn capacity_limits_hold_after_every_operation(
        ops in proptest::collection::vec(op_strategy(), 1..80),
        kind in prop_oneof![
            Just(PolicyKind::Lru),
            Just(PolicyKind::Fifo),
            Just(PolicyKind::Random),
        ],
    ) {
        const MAX_ITEMS: usize = 4;
        const MAX_BYTES: u64 = 400;

        let clock = ManualClock::new(1);
        let mut cache: TtlCache<u8> = TtlCache::builder()
            .policy(kind)
            .max_items(MAX_ITEMS)
            .max_bytes(MAX_BYTES)
            .clock(clock.clone())
            .build();

        for op in ops {
            match op {
                Op::Insert { key, size, ttl_ms } => {
                    let _ = cache.insert(
                        &key_bytes(key),
                        key,
                        u64::from(size),
                        Expiry::from_millis(u64::from(ttl_ms), 0),
                    );
                }
                Op::Get { key } => {
                    let _ = cache.get(&key_bytes(key));
                }
                Op::Remove { key } => {
                    let _ = cache.remove(&key_bytes(key));
                }
                Op::Scan => cache.scan_and_evict(),
                Op::Advance { ms } => clock.advance(u64::from(ms)),
            }

            cache.debug_validate_invariants();
            prop_assert!(cache.len() <= MAX_ITEMS);
            prop_assert!(cache.total_size() <= MAX_BYTES || cache.is_empty());
        }
    }
}
