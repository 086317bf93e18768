//! Round-robin load balancing strategy.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use crate::load_balancer::{collect_servers, BalancerError, BalancerResult, LoadBalancer};

/// Round-robin selector.
/// Stores an internal counter to rotate through backends in list order.
#[derive(Debug)]
pub struct RoundRobin {
    servers: Arc<[Arc<str>]>,
    counter: AtomicU64,
}

impl RoundRobin {
    /// Build a selector over a fixed, non-empty server list.
    pub fn new<I, S>(servers: I) -> BalancerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let servers = collect_servers(servers);
        if servers.is_empty() {
            tracing::warn!("Rejected round-robin pool with no backends");
            return Err(BalancerError::EmptyPool { strategy: "round_robin" });
        }

        tracing::debug!(backend_count = servers.len(), "Round-robin pool created");
        Ok(Self {
            servers,
            counter: AtomicU64::new(0),
        })
    }

    /// Number of backends in the rotation.
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Always false: construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Backends in rotation order.
    pub fn servers(&self) -> &[Arc<str>] {
        &self.servers
    }

    /// Claim the next counter value. Each value is handed out once until the
    /// counter wraps.
    fn next_ticket(&self) -> u64 {
        // fetch_add returns the previous value and wraps on overflow.
        self.counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Position in the rotation for the given counter value.
    fn index_for(&self, ticket: u64) -> usize {
        // The list length always fits in u64, and the result is below it.
        (ticket % self.servers.len() as u64) as usize
    }
}

impl LoadBalancer for RoundRobin {
    fn next_server(&self) -> Option<Arc<str>> {
        let ticket = self.next_ticket();
        Some(self.servers[self.index_for(ticket)].clone())
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }
}
