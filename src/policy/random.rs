//! Uniformly random eviction.
//!
//! The victim is the node at `rng() % len` forward steps from the list head.
//! Hits are a no-op, so the policy carries zero per-access overhead and no
//! access-pattern tracking; the traversal is O(n) but runs only on eviction.
//!
//! The 32-bit random source is injected, which keeps victim selection
//! deterministic under test. [`RandomPolicy::new`] falls back to an internal
//! xorshift generator so no system entropy is required.

use crate::ds::{NodeId, OrderedIndex};
use crate::policy::EvictionPolicy;

/// Injected 32-bit uniform random source.
pub type RngFn = Box<dyn FnMut() -> u32>;

/// Random policy: victims are picked uniformly over the current entries.
pub struct RandomPolicy {
    rng: RngFn,
}

impl RandomPolicy {
    /// Creates a policy backed by the built-in xorshift generator with a
    /// fixed seed.
    pub fn new() -> Self {
        Self::seeded(0x9e37_79b9_7f4a_7c15)
    }

    /// Creates a policy backed by the built-in xorshift generator.
    pub fn seeded(seed: u64) -> Self {
        // Xorshift needs a non-zero state.
        let mut state = seed | 1;
        Self::with_rng(move || {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            state = x;
            (x >> 32) as u32
        })
    }

    /// Creates a policy drawing from a caller-supplied uniform source.
    pub fn with_rng(rng: impl FnMut() -> u32 + 'static) -> Self {
        Self { rng: Box::new(rng) }
    }

    /// Creates a policy from an already boxed source.
    pub fn from_boxed(rng: RngFn) -> Self {
        Self { rng }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RandomPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomPolicy").finish_non_exhaustive()
    }
}

impl<T> EvictionPolicy<T> for RandomPolicy {
    fn on_hit(&mut self, _index: &mut OrderedIndex<T>, _id: NodeId) {}

    fn pick_victim(&mut self, index: &OrderedIndex<T>) -> Option<NodeId> {
        let len = index.len();
        if len == 0 {
            return None;
        }

        let steps = (self.rng)() as usize % len;
        let mut id = index.front_id()?;
        for _ in 0..steps {
            id = index.next_id(id)?;
        }
        Some(id)
    }
}
