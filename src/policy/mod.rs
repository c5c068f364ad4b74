//! Eviction policies.
//!
//! A policy contributes exactly two decisions to the cache engine: what to do
//! with an entry's list position on a hit, and which entry to sacrifice when
//! capacity is exceeded. Policies act on the
//! [`OrderedIndex`](crate::ds::OrderedIndex) order list only — they never see
//! expiration stamps or touch the aggregate counters, and the entry payload
//! is opaque to them.
//!
//! | Policy           | Touch on hit        | Victim                          |
//! |------------------|---------------------|---------------------------------|
//! | [`LruPolicy`]    | move node to tail   | list head                       |
//! | [`FifoPolicy`]   | no-op               | list head                       |
//! | [`RandomPolicy`] | no-op               | uniformly random list position  |

pub mod fifo;
pub mod lru;
pub mod random;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use random::RandomPolicy;

use std::fmt;
use std::str::FromStr;

use crate::ds::{NodeId, OrderedIndex};
use crate::error::ConfigError;

/// Per-hit reordering and victim selection against the order list.
///
/// `T` is the entry payload type; it is deliberately opaque so that a policy
/// can only manipulate list order, never entry contents.
pub trait EvictionPolicy<T> {
    /// Called after a successful, non-expired lookup.
    fn on_hit(&mut self, index: &mut OrderedIndex<T>, id: NodeId);

    /// Selects the next entry to evict, or `None` when the policy has no
    /// choice to offer (e.g. the list is empty).
    fn pick_victim(&mut self, index: &OrderedIndex<T>) -> Option<NodeId>;
}

/// The built-in eviction policies, by name.
///
/// This is the configuration-recognition step: policy names arriving from
/// config files or embedder settings parse into a `PolicyKind`, and anything
/// unrecognized is a [`ConfigError`].
///
/// ```
/// use ttlkit::policy::PolicyKind;
///
/// let kind: PolicyKind = "fifo".parse().unwrap();
/// assert_eq!(kind, PolicyKind::Fifo);
/// assert!("arc".parse::<PolicyKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Least recently used: hits refresh an entry's position.
    Lru,
    /// First in, first out: hits leave order untouched.
    Fifo,
    /// Uniformly random victim from an injected RNG.
    Random,
}

impl PolicyKind {
    /// Returns the canonical configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Lru => "lru",
            PolicyKind::Fifo => "fifo",
            PolicyKind::Random => "random",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lru" => Ok(PolicyKind::Lru),
            "fifo" => Ok(PolicyKind::Fifo),
            "random" => Ok(PolicyKind::Random),
            other => Err(ConfigError::new(format!(
                "unknown eviction policy {other:?}; expected one of \"lru\", \"fifo\", \"random\""
            ))),
        }
    }
}
