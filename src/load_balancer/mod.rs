//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Caller picks a backend group
//!     → pool.rs (group name → strategy)
//!     → Apply load balancing algorithm:
//!         - round_robin.rs (strict cyclic order, atomic counter)
//!         - random.rs (uniform pick)
//!         - weighted_random.rs (pick proportional to weight, swappable snapshot)
//!         - smooth_round_robin.rs (smoothed weighted cycle)
//!     → Return backend address or None
//! ```
//!
//! # Design Decisions
//! - Strategies own their counters, locks and accumulators; only
//!   `next_server` and `replace` touch them
//! - Bad configuration fails at construction, never per call
//! - `None` means "no backend available right now", callers decide what to do
//! - Pools change by whole-list replacement only

pub mod pool;
pub mod random;
pub mod round_robin;
pub mod smooth_round_robin;
pub mod types;
pub mod weighted_random;

use std::fmt::Debug;
use std::sync::Arc;

pub use pool::BackendManager;
pub use random::Random;
pub use round_robin::RoundRobin;
pub use smooth_round_robin::{Node, SmoothWeightedRoundRobin};
pub use types::{
    BalancerError, BalancerResult, WeightLimits, WeightedBackend, DEFAULT_MAX_TOTAL_WEIGHT,
    DEFAULT_MAX_WEIGHT,
};
pub use weighted_random::WeightedRandom;

/// Common selection contract shared by every strategy.
pub trait LoadBalancer: Send + Sync + Debug {
    /// Select the backend for the next request.
    ///
    /// Returns `None` when no backend can be chosen.
    fn next_server(&self) -> Option<Arc<str>>;

    /// Name of this strategy for logging.
    fn name(&self) -> &'static str;
}

/// Copy caller-supplied addresses into a shared immutable list.
pub(crate) fn collect_servers<I, S>(servers: I) -> Arc<[Arc<str>]>
where
    I: IntoIterator<Item = S>,
    S: Into<Arc<str>>,
{
    servers.into_iter().map(Into::into).collect()
}
