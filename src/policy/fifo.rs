//! First-in, first-out eviction.
//!
//! Hits leave the order list untouched, so the list stays in pure insertion
//! order and the head is always the oldest entry. The victim is the head.
//! Predictable, zero per-hit overhead, no adaptation to access patterns.

use crate::ds::{NodeId, OrderedIndex};
use crate::policy::EvictionPolicy;

/// FIFO policy: insertion order decides eviction; hits are a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoPolicy;

impl<T> EvictionPolicy<T> for FifoPolicy {
    fn on_hit(&mut self, _index: &mut OrderedIndex<T>, _id: NodeId) {}

    fn pick_victim(&mut self, index: &OrderedIndex<T>) -> Option<NodeId> {
        index.front_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(index: &OrderedIndex<u32>) -> Vec<Vec<u8>> {
        index.iter().map(|(k, _)| k.to_vec()).collect()
    }

    #[test]
    fn hit_does_not_reorder() {
        let mut index = OrderedIndex::new();
        let a = index.insert(b"a", 1, 1).unwrap();
        index.insert(b"b", 2, 1).unwrap();
        index.insert(b"c", 3, 1).unwrap();

        let mut policy = FifoPolicy;
        policy.on_hit(&mut index, a);

        assert_eq!(keys(&index), vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn victim_is_oldest_regardless_of_hits() {
        let mut index = OrderedIndex::new();
        let a = index.insert(b"a", 1, 1).unwrap();
        index.insert(b"b", 2, 1).unwrap();

        let mut policy = FifoPolicy;
        policy.on_hit(&mut index, a);
        assert_eq!(policy.pick_victim(&index), Some(a));
    }

    #[test]
    fn empty_index_yields_no_victim() {
        let index: OrderedIndex<u32> = OrderedIndex::new();
        let mut policy = FifoPolicy;
        assert_eq!(policy.pick_victim(&index), None);
    }
}
