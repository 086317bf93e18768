//! Weighted random load balancing strategy.
//!
//! # Responsibilities
//! - Pick a backend with probability `weight / total`
//! - Serve every call from one immutable pool snapshot
//! - Swap the whole pool atomically on update
//!
//! # Design Decisions
//! - Backends with weight <= 0 stay in the pool but own no share of the
//!   draw range, so they are never picked
//! - An empty pool or a zero total is a valid state: `next_server` returns
//!   `None` until a usable pool is swapped in
//! - Readers never block on `replace`; in-flight calls finish on the
//!   snapshot they loaded

use std::sync::Arc;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::load_balancer::{BalancerResult, LoadBalancer, WeightLimits, WeightedBackend};

/// Immutable point-in-time view of a weighted pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    entries: Vec<WeightedBackend>,
    total: i64,
}

impl Snapshot {
    fn build(entries: Vec<WeightedBackend>, limits: &WeightLimits) -> BalancerResult<Self> {
        let total = limits.check(&entries)?;
        Ok(Self { entries, total })
    }

    /// Backends in draw order.
    pub fn entries(&self) -> &[WeightedBackend] {
        &self.entries
    }

    /// Sum of the positive weights.
    pub fn total_weight(&self) -> i64 {
        self.total
    }

    /// Map a point of `[0, total)` to the backend owning it.
    fn locate(&self, mut point: i64) -> Option<&WeightedBackend> {
        self.entries
            .iter()
            .filter(|entry| entry.weight > 0)
            .find(|entry| {
                point -= entry.weight;
                point < 0
            })
    }
}

/// Weighted random selector.
#[derive(Debug)]
pub struct WeightedRandom {
    pool: ArcSwap<Snapshot>,
    limits: WeightLimits,
    rng: Mutex<StdRng>,
}

impl WeightedRandom {
    /// Build a selector with default weight limits.
    pub fn new(entries: Vec<WeightedBackend>) -> BalancerResult<Self> {
        Self::with_limits(entries, WeightLimits::default())
    }

    /// Build a selector with explicit weight limits, seeded from OS entropy.
    pub fn with_limits(entries: Vec<WeightedBackend>, limits: WeightLimits) -> BalancerResult<Self> {
        Self::with_rng(entries, limits, StdRng::from_entropy())
    }

    /// Build a selector with a fixed seed for reproducible runs.
    pub fn with_seed(
        entries: Vec<WeightedBackend>,
        limits: WeightLimits,
        seed: u64,
    ) -> BalancerResult<Self> {
        Self::with_rng(entries, limits, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        entries: Vec<WeightedBackend>,
        limits: WeightLimits,
        rng: StdRng,
    ) -> BalancerResult<Self> {
        let snapshot = Snapshot::build(entries, &limits).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected weighted random pool");
        })?;
        if snapshot.total <= 0 {
            tracing::warn!(
                backend_count = snapshot.entries.len(),
                "Weighted random pool has no positive weight; selections will be empty"
            );
        }
        tracing::debug!(
            backend_count = snapshot.entries.len(),
            total_weight = snapshot.total,
            "Weighted random pool created"
        );

        Ok(Self {
            pool: ArcSwap::from_pointee(snapshot),
            limits,
            rng: Mutex::new(rng),
        })
    }

    /// Replace the whole pool.
    ///
    /// On error the current pool stays active.
    pub fn replace(&self, entries: Vec<WeightedBackend>) -> BalancerResult<()> {
        let snapshot = Snapshot::build(entries, &self.limits).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected weighted random pool update; keeping current pool");
        })?;
        tracing::info!(
            backend_count = snapshot.entries.len(),
            total_weight = snapshot.total,
            "Weighted random pool replaced"
        );
        self.pool.store(Arc::new(snapshot));
        Ok(())
    }

    /// The pool currently in use.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.pool.load_full()
    }

    /// Limits applied on construction and replace.
    pub fn limits(&self) -> WeightLimits {
        self.limits
    }
}

impl LoadBalancer for WeightedRandom {
    fn next_server(&self) -> Option<Arc<str>> {
        // Every read below goes through this one snapshot.
        let snapshot = self.pool.load();
        if snapshot.total <= 0 {
            tracing::debug!(
                backend_count = snapshot.entries.len(),
                "No positive weight in pool"
            );
            return None;
        }

        let point = self.rng.lock().gen_range(0..snapshot.total);
        snapshot.locate(point).map(|entry| entry.address.clone())
    }

    fn name(&self) -> &'static str {
        "weighted_random"
    }
}
