pub use crate::builder::CacheBuilder;
pub use crate::cache::TtlCache;
pub use crate::ds::{NodeId, OrderedIndex};
pub use crate::error::{ConfigError, InsertError};
pub use crate::expiry::Expiry;
pub use crate::policy::{EvictionPolicy, FifoPolicy, LruPolicy, PolicyKind, RandomPolicy};
pub use crate::time::{Clock, ManualClock, SystemClock};
