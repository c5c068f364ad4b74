//! Least recently used eviction.
//!
//! The order list doubles as the recency list: a hit moves the entry to the
//! tail, so the head is always the least recently used entry and is the
//! victim under capacity pressure.
//!
//! ```text
//!   head ──► [A] ◄──► [B] ◄──► [C] ◄── tail
//!           (LRU)             (MRU)
//!
//!   hit(B):  head ──► [A] ◄──► [C] ◄──► [B] ◄── tail
//!   victim:  A
//! ```
//!
//! The policy is stateless; all recency information lives in the list order
//! itself.

use crate::ds::{NodeId, OrderedIndex};
use crate::policy::EvictionPolicy;

/// LRU policy: hits move entries to the tail, victims come from the head.
#[derive(Debug, Clone, Copy, Default)]
pub struct LruPolicy;

impl<T> EvictionPolicy<T> for LruPolicy {
    fn on_hit(&mut self, index: &mut OrderedIndex<T>, id: NodeId) {
        index.move_to_back(id);
    }

    fn pick_victim(&mut self, index: &OrderedIndex<T>) -> Option<NodeId> {
        index.front_id()
    }
}
