pub mod arena;
pub mod ordered_index;

pub use arena::{NodeArena, NodeId};
pub use ordered_index::{OrderedIndex, RemovedEntry};
