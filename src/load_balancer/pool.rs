//! Backend group management.
//!
//! # Responsibilities
//! - Build one strategy per configured backend group
//! - Route a group name to its strategy's next backend

use std::collections::HashMap;
use std::sync::Arc;
use crate::config::{BalancerConfig, GroupConfig, StrategyKind};
use crate::load_balancer::{
    BalancerResult, LoadBalancer, Random, RoundRobin, SmoothWeightedRoundRobin, WeightLimits,
    WeightedRandom,
};

/// Manages backend groups and their strategies.
#[derive(Debug)]
pub struct BackendManager {
    /// Map of group name -> strategy.
    groups: HashMap<String, Arc<dyn LoadBalancer>>,
}

impl BackendManager {
    /// Create a manager from a validated configuration.
    pub fn from_config(config: &BalancerConfig) -> BalancerResult<Self> {
        let mut groups = HashMap::new();
        for group in &config.groups {
            let lb = build_strategy(group, config.limits)?;
            tracing::info!(
                group = %group.name,
                strategy = lb.name(),
                backend_count = group.backends.len(),
                "Backend group ready"
            );
            groups.insert(group.name.clone(), lb);
        }
        Ok(Self { groups })
    }

    /// Select a backend for the given group.
    pub fn get(&self, group_name: &str) -> Option<Arc<str>> {
        let Some(lb) = self.groups.get(group_name) else {
            tracing::debug!(group = %group_name, "Group not found in BackendManager");
            return None;
        };

        let picked = lb.next_server();
        if picked.is_none() {
            tracing::debug!(group = %group_name, strategy = lb.name(), "No backend available in group");
        }
        picked
    }

    /// Shared handle to a group's strategy.
    pub fn strategy(&self, group_name: &str) -> Option<Arc<dyn LoadBalancer>> {
        self.groups.get(group_name).cloned()
    }

    /// Strategy name for a group.
    pub fn strategy_name(&self, group_name: &str) -> Option<&'static str> {
        self.groups.get(group_name).map(|lb| lb.name())
    }

    /// Group names, sorted.
    pub fn groups(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Build the strategy a group asks for.
pub fn build_strategy(
    group: &GroupConfig,
    limits: WeightLimits,
) -> BalancerResult<Arc<dyn LoadBalancer>> {
    let lb: Arc<dyn LoadBalancer> = match group.strategy {
        StrategyKind::RoundRobin => Arc::new(RoundRobin::new(group.addresses())?),
        StrategyKind::Random => Arc::new(Random::new(group.addresses())?),
        StrategyKind::WeightedRandom => {
            Arc::new(WeightedRandom::with_limits(group.weighted(), limits)?)
        }
        StrategyKind::SmoothWeightedRoundRobin => {
            Arc::new(SmoothWeightedRoundRobin::with_limits(group.weighted(), limits)?)
        }
    };
    Ok(lb)
}
