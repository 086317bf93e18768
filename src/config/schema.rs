//! Configuration schema definitions.
//!
//! This module defines the configuration structure for backend groups.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use crate::load_balancer::{WeightLimits, WeightedBackend};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BalancerConfig {
    /// Named backend groups, each with its own strategy.
    pub groups: Vec<GroupConfig>,

    /// Weight ceilings applied to every weighted group.
    pub limits: WeightLimits,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Selection strategy for a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    RoundRobin,
    Random,
    WeightedRandom,
    SmoothWeightedRoundRobin,
}

impl StrategyKind {
    /// Whether the strategy refuses to start with an empty backend list.
    pub fn requires_backends(self) -> bool {
        !matches!(self, StrategyKind::WeightedRandom)
    }

    /// Whether every weight must be positive.
    pub fn requires_positive_weights(self) -> bool {
        matches!(self, StrategyKind::SmoothWeightedRoundRobin)
    }

    /// Whether weights influence selection.
    pub fn is_weighted(self) -> bool {
        matches!(
            self,
            StrategyKind::WeightedRandom | StrategyKind::SmoothWeightedRoundRobin
        )
    }
}

/// A named group of interchangeable backends.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupConfig {
    /// Group identifier used for lookups and logging.
    pub name: String,

    /// Selection strategy.
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Backends in selection order.
    #[serde(default)]
    pub backends: Vec<BackendConfig>,
}

impl GroupConfig {
    /// Backend addresses in list order.
    pub fn addresses(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.address.clone()).collect()
    }

    /// Backends with their weights in list order.
    pub fn weighted(&self) -> Vec<WeightedBackend> {
        self.backends
            .iter()
            .map(|b| WeightedBackend::new(b.address.as_str(), b.weight))
            .collect()
    }
}

/// Backend server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Backend address (e.g., "127.0.0.1:3000").
    pub address: String,

    /// Weight for weighted strategies (default: 1).
    #[serde(default = "default_weight")]
    pub weight: i64,
}

fn default_weight() -> i64 {
    1
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Use ANSI colors in log output.
    pub ansi: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            ansi: true,
        }
    }
}
