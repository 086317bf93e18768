//! Smooth weighted round-robin load balancing strategy.
//!
//! Every call adds each backend's weight to its `current` accumulator, picks
//! the backend with the largest accumulator and charges it the pool's total
//! weight. Over any `total` consecutive calls from the zero state each
//! backend is picked exactly `weight` times, and heavy backends are
//! interleaved with light ones instead of served in one burst.
//!
//! Ties go to the backend listed first in the list handed to `new` or
//! `replace`. That order is kept as-is, so a given list always produces the
//! same sequence from a fresh state.

use std::sync::Arc;
use parking_lot::Mutex;
use crate::load_balancer::{
    BalancerError, BalancerResult, LoadBalancer, WeightLimits, WeightedBackend,
};

/// A backend together with its smoothing accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub address: Arc<str>,
    pub weight: i64,
    /// Accumulator after the call that returned this node.
    pub current: i64,
}

impl Node {
    fn fresh(backend: WeightedBackend) -> Self {
        Self {
            address: backend.address,
            weight: backend.weight,
            current: 0,
        }
    }
}

/// Smooth weighted round-robin selector.
#[derive(Debug)]
pub struct SmoothWeightedRoundRobin {
    nodes: Mutex<Vec<Node>>,
    limits: WeightLimits,
}

impl SmoothWeightedRoundRobin {
    /// Build a selector with default weight limits.
    pub fn new(entries: Vec<WeightedBackend>) -> BalancerResult<Self> {
        Self::with_limits(entries, WeightLimits::default())
    }

    /// Build a selector with explicit weight limits.
    pub fn with_limits(entries: Vec<WeightedBackend>, limits: WeightLimits) -> BalancerResult<Self> {
        let nodes = Self::validate(entries, &limits)?;
        tracing::debug!(backend_count = nodes.len(), "Smooth weighted round-robin pool created");
        Ok(Self {
            nodes: Mutex::new(nodes),
            limits,
        })
    }

    fn validate(entries: Vec<WeightedBackend>, limits: &WeightLimits) -> BalancerResult<Vec<Node>> {
        let result = Self::check(&entries, limits);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Rejected smooth weighted round-robin pool");
        }
        result?;
        Ok(entries.into_iter().map(Node::fresh).collect())
    }

    fn check(entries: &[WeightedBackend], limits: &WeightLimits) -> BalancerResult<()> {
        if entries.is_empty() {
            return Err(BalancerError::EmptyPool { strategy: "smooth_weighted_round_robin" });
        }
        if let Some(entry) = entries.iter().find(|e| e.weight <= 0) {
            return Err(BalancerError::NonPositiveWeight {
                address: entry.address.to_string(),
                weight: entry.weight,
            });
        }
        limits.check(entries).map(|_| ())
    }

    /// Select the next node.
    ///
    /// The lock is held for the whole update; accumulators are never
    /// observed half-updated.
    pub fn next_node(&self) -> Node {
        let mut nodes = self.nodes.lock();

        let mut total: i64 = 0;
        let mut best = 0;
        for i in 0..nodes.len() {
            let node = &mut nodes[i];
            node.current += node.weight;
            total += node.weight;
            // Strictly greater: the earliest node keeps a tie.
            if nodes[i].current > nodes[best].current {
                best = i;
            }
        }

        nodes[best].current -= total;
        nodes[best].clone()
    }

    /// Replace the whole pool and restart the cycle from the zero state.
    ///
    /// On error the current pool and its accumulators are kept.
    pub fn replace(&self, entries: Vec<WeightedBackend>) -> BalancerResult<()> {
        let fresh = Self::validate(entries, &self.limits)?;
        tracing::info!(backend_count = fresh.len(), "Smooth weighted round-robin pool replaced");
        *self.nodes.lock() = fresh;
        Ok(())
    }

    /// Copy of every node with its current accumulator.
    pub fn nodes(&self) -> Vec<Node> {
        self.nodes.lock().clone()
    }

    /// Sum of all weights in the pool.
    pub fn total_weight(&self) -> i64 {
        self.nodes.lock().iter().map(|n| n.weight).sum()
    }
}

impl LoadBalancer for SmoothWeightedRoundRobin {
    fn next_server(&self) -> Option<Arc<str>> {
        Some(self.next_node().address)
    }

    fn name(&self) -> &'static str {
        "smooth_weighted_round_robin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(weights: &[(&str, i64)]) -> Vec<WeightedBackend> {
        weights.iter().map(|(a, w)| WeightedBackend::new(*a, *w)).collect()
    }

    fn sequence(lb: &SmoothWeightedRoundRobin, calls: usize) -> Vec<String> {
        (0..calls).map(|_| lb.next_node().address.to_string()).collect()
    }

    #[test]
    fn test_reference_sequence() {
        let lb = SmoothWeightedRoundRobin::new(pool(&[("a", 5), ("b", 1), ("c", 1)])).unwrap();
        assert_eq!(sequence(&lb, 7), ["a", "a", "b", "a", "c", "a", "a"]);

        // Accumulators return to zero at the end of a cycle.
        assert!(lb.nodes().iter().all(|n| n.current == 0));
        assert_eq!(sequence(&lb, 7), ["a", "a", "b", "a", "c", "a", "a"]);
    }

    #[test]
    fn test_returned_node_carries_accumulator() {
        let lb = SmoothWeightedRoundRobin::new(pool(&[("a", 5), ("b", 1), ("c", 1)])).unwrap();
        let node = lb.next_node();
        assert_eq!(&*node.address, "a");
        assert_eq!(node.weight, 5);
        assert_eq!(node.current, 5 - 7);
    }

    #[test]
    fn test_ties_go_to_first_listed() {
        let lb = SmoothWeightedRoundRobin::new(pool(&[("x", 1), ("y", 1), ("z", 1)])).unwrap();
        assert_eq!(sequence(&lb, 6), ["x", "y", "z", "x", "y", "z"]);
    }

    #[test]
    fn test_single_server() {
        let lb = SmoothWeightedRoundRobin::new(pool(&[("only", 10)])).unwrap();
        for _ in 0..100 {
            assert_eq!(lb.next_server().as_deref(), Some("only"));
        }
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            SmoothWeightedRoundRobin::new(Vec::new()).unwrap_err(),
            BalancerError::EmptyPool { strategy: "smooth_weighted_round_robin" }
        );
        assert!(matches!(
            SmoothWeightedRoundRobin::new(pool(&[("a", 0)])),
            Err(BalancerError::NonPositiveWeight { weight: 0, .. })
        ));
        assert!(matches!(
            SmoothWeightedRoundRobin::new(pool(&[("a", 3), ("b", -1)])),
            Err(BalancerError::NonPositiveWeight { weight: -1, .. })
        ));
    }

    #[test]
    fn test_replace_resets_cycle() {
        let lb = SmoothWeightedRoundRobin::new(pool(&[("a", 5), ("b", 1), ("c", 1)])).unwrap();
        sequence(&lb, 3);

        lb.replace(pool(&[("c", 1), ("d", 2)])).unwrap();
        assert!(lb.nodes().iter().all(|n| n.current == 0));
        assert_eq!(lb.total_weight(), 3);
        assert_eq!(sequence(&lb, 3), ["d", "c", "d"]);
    }

    #[test]
    fn test_invalid_replace_keeps_state() {
        let lb = SmoothWeightedRoundRobin::new(pool(&[("a", 5), ("b", 1), ("c", 1)])).unwrap();
        sequence(&lb, 2);
        let before = lb.nodes();

        assert!(lb.replace(pool(&[("a", 0)])).is_err());
        assert_eq!(lb.nodes(), before);
        assert_eq!(sequence(&lb, 5), ["b", "a", "c", "a", "a"]);
    }
}
