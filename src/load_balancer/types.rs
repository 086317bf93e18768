//! Shared backend types and error definitions.

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest weight a single backend may carry.
pub const DEFAULT_MAX_WEIGHT: i64 = 1_000_000;

/// Largest sum of weights a pool may carry.
pub const DEFAULT_MAX_TOTAL_WEIGHT: i64 = 10_000_000;

/// A backend address paired with its static weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedBackend {
    /// Opaque address naming the backend.
    pub address: Arc<str>,
    /// Relative selection frequency.
    pub weight: i64,
}

impl WeightedBackend {
    pub fn new(address: impl Into<Arc<str>>, weight: i64) -> Self {
        Self {
            address: address.into(),
            weight,
        }
    }
}

/// Weight ceilings enforced when a pool is built or replaced.
///
/// They keep the smooth accumulators and the weighted draw range far away
/// from `i64` overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WeightLimits {
    /// Per-backend ceiling.
    pub max_weight: i64,
    /// Ceiling for the sum of all positive weights.
    pub max_total_weight: i64,
}

impl Default for WeightLimits {
    fn default() -> Self {
        Self {
            max_weight: DEFAULT_MAX_WEIGHT,
            max_total_weight: DEFAULT_MAX_TOTAL_WEIGHT,
        }
    }
}

impl WeightLimits {
    /// Check every weight against the ceilings and return the sum of the
    /// positive weights.
    ///
    /// Non-positive weights are accepted here; strategies that forbid them
    /// reject them before calling this.
    pub fn check(&self, backends: &[WeightedBackend]) -> BalancerResult<i64> {
        let mut total: i64 = 0;
        for backend in backends {
            if backend.weight > self.max_weight {
                return Err(BalancerError::WeightTooLarge {
                    address: backend.address.to_string(),
                    weight: backend.weight,
                    max: self.max_weight,
                });
            }
            if backend.weight > 0 {
                // Each term is already bounded by max_weight, so only the
                // running sum can leave the allowed range.
                total = total.saturating_add(backend.weight);
                if total > self.max_total_weight {
                    return Err(BalancerError::TotalWeightTooLarge {
                        total,
                        max: self.max_total_weight,
                    });
                }
            }
        }
        Ok(total)
    }
}

/// Configuration errors raised while building a strategy.
///
/// An `Err` means no strategy instance was created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalancerError {
    /// The strategy needs at least one backend.
    #[error("{strategy}: backend list is empty")]
    EmptyPool { strategy: &'static str },

    /// Weight of zero or less where only positive weights are allowed.
    #[error("backend '{address}' weight must be positive, got {weight}")]
    NonPositiveWeight { address: String, weight: i64 },

    /// A single weight above the per-backend ceiling.
    #[error("backend '{address}' weight {weight} exceeds max {max}")]
    WeightTooLarge { address: String, weight: i64, max: i64 },

    /// Sum of weights above the pool ceiling.
    #[error("total weight {total} exceeds max {max}")]
    TotalWeightTooLarge { total: i64, max: i64 },
}

/// Result type for strategy construction.
pub type BalancerResult<T> = Result<T, BalancerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_sum_positive_weights_only() {
        let limits = WeightLimits::default();
        let backends = vec![
            WeightedBackend::new("a", 10),
            WeightedBackend::new("b", -5),
            WeightedBackend::new("c", 0),
            WeightedBackend::new("d", 20),
        ];
        assert_eq!(limits.check(&backends), Ok(30));
    }

    #[test]
    fn test_limits_reject_large_weight() {
        let limits = WeightLimits { max_weight: 10, max_total_weight: 100 };
        let err = limits.check(&[WeightedBackend::new("a", 11)]).unwrap_err();
        assert_eq!(
            err,
            BalancerError::WeightTooLarge { address: "a".into(), weight: 11, max: 10 }
        );
    }

    #[test]
    fn test_limits_reject_large_total() {
        let limits = WeightLimits { max_weight: 10, max_total_weight: 15 };
        let backends = vec![WeightedBackend::new("a", 10), WeightedBackend::new("b", 10)];
        assert!(matches!(
            limits.check(&backends),
            Err(BalancerError::TotalWeightTooLarge { total: 20, max: 15 })
        ));
    }

    #[test]
    fn test_error_display() {
        let err = BalancerError::EmptyPool { strategy: "round_robin" };
        assert_eq!(err.to_string(), "round_robin: backend list is empty");

        let err = BalancerError::NonPositiveWeight { address: "a".into(), weight: -1 };
        assert!(err.to_string().contains("-1"));
    }
}
