//! Uniform random load balancing strategy.

use std::sync::Arc;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::load_balancer::{collect_servers, BalancerError, BalancerResult, LoadBalancer};

/// Random selector.
/// Picks every backend with equal probability, independent of past picks.
#[derive(Debug)]
pub struct Random {
    servers: Arc<[Arc<str>]>,
    rng: Mutex<StdRng>,
}

impl Random {
    /// Build a selector seeded once from OS entropy.
    pub fn new<I, S>(servers: I) -> BalancerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self::with_rng(servers, StdRng::from_entropy())
    }

    /// Build a selector with a fixed seed for reproducible runs.
    pub fn with_seed<I, S>(servers: I, seed: u64) -> BalancerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self::with_rng(servers, StdRng::seed_from_u64(seed))
    }

    fn with_rng<I, S>(servers: I, rng: StdRng) -> BalancerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let servers = collect_servers(servers);
        if servers.is_empty() {
            tracing::warn!("Rejected random pool with no backends");
            return Err(BalancerError::EmptyPool { strategy: "random" });
        }

        tracing::debug!(backend_count = servers.len(), "Random pool created");
        Ok(Self {
            servers,
            rng: Mutex::new(rng),
        })
    }

    /// Number of backends in the pool.
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Always false: construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

impl LoadBalancer for Random {
    fn next_server(&self) -> Option<Arc<str>> {
        // Lock covers the draw only.
        let index = self.rng.lock().gen_range(0..self.servers.len());
        Some(self.servers[index].clone())
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
