//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check group names are present and unique
//! - Check each group satisfies its strategy's backend and weight rules
//! - Check weight limits are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BalancerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;
use crate::config::schema::BalancerConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no backend groups configured")]
    NoGroups,

    #[error("group #{index} has an empty name")]
    EmptyGroupName { index: usize },

    #[error("group '{0}' is defined more than once")]
    DuplicateGroup(String),

    #[error("group '{0}' has no backends")]
    NoBackends(String),

    #[error("group '{group}' has a backend with an empty address")]
    EmptyAddress { group: String },

    #[error("group '{group}' backend '{address}' needs a positive weight, got {weight}")]
    NonPositiveWeight { group: String, address: String, weight: i64 },

    #[error("group '{group}' backend '{address}' weight {weight} exceeds max {max}")]
    WeightTooLarge { group: String, address: String, weight: i64, max: i64 },

    #[error("group '{group}' total weight {total} exceeds max {max}")]
    TotalWeightTooLarge { group: String, total: i64, max: i64 },

    #[error("weight limits must be positive (max_weight={max_weight}, max_total_weight={max_total_weight})")]
    InvalidLimits { max_weight: i64, max_total_weight: i64 },
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let limits = config.limits;

    if limits.max_weight <= 0 || limits.max_total_weight <= 0 {
        errors.push(ValidationError::InvalidLimits {
            max_weight: limits.max_weight,
            max_total_weight: limits.max_total_weight,
        });
    }

    if config.groups.is_empty() {
        errors.push(ValidationError::NoGroups);
    }

    let mut seen = HashSet::new();
    for (index, group) in config.groups.iter().enumerate() {
        if group.name.trim().is_empty() {
            errors.push(ValidationError::EmptyGroupName { index });
        } else if !seen.insert(group.name.as_str()) {
            errors.push(ValidationError::DuplicateGroup(group.name.clone()));
        }

        if group.backends.is_empty() && group.strategy.requires_backends() {
            errors.push(ValidationError::NoBackends(group.name.clone()));
        }

        let mut total: i64 = 0;
        for backend in &group.backends {
            if backend.address.trim().is_empty() {
                errors.push(ValidationError::EmptyAddress { group: group.name.clone() });
            }
            if !group.strategy.is_weighted() {
                continue;
            }
            if backend.weight <= 0 && group.strategy.requires_positive_weights() {
                errors.push(ValidationError::NonPositiveWeight {
                    group: group.name.clone(),
                    address: backend.address.clone(),
                    weight: backend.weight,
                });
            }
            if backend.weight > limits.max_weight {
                errors.push(ValidationError::WeightTooLarge {
                    group: group.name.clone(),
                    address: backend.address.clone(),
                    weight: backend.weight,
                    max: limits.max_weight,
                });
            }
            if backend.weight > 0 {
                total = total.saturating_add(backend.weight);
            }
        }

        if group.strategy.is_weighted() && total > limits.max_total_weight {
            errors.push(ValidationError::TotalWeightTooLarge {
                group: group.name.clone(),
                total,
                max: limits.max_total_weight,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{BackendConfig, GroupConfig, StrategyKind};

    fn group(name: &str, strategy: StrategyKind, weights: &[i64]) -> GroupConfig {
        GroupConfig {
            name: name.to_string(),
            strategy,
            backends: weights
                .iter()
                .enumerate()
                .map(|(i, w)| BackendConfig { address: format!("10.0.0.{}:80", i + 1), weight: *w })
                .collect(),
        }
    }

    fn config(groups: Vec<GroupConfig>) -> BalancerConfig {
        BalancerConfig { groups, ..Default::default() }
    }

    #[test]
    fn test_valid_config() {
        let cfg = config(vec![
            group("rr", StrategyKind::RoundRobin, &[1, 1]),
            group("wr", StrategyKind::WeightedRandom, &[0, 10]),
            group("swrr", StrategyKind::SmoothWeightedRoundRobin, &[5, 1, 1]),
        ]);
        assert_eq!(validate_config(&cfg), Ok(()));
    }

    #[test]
    fn test_no_groups() {
        assert_eq!(validate_config(&config(vec![])), Err(vec![ValidationError::NoGroups]));
    }

    #[test]
    fn test_collects_all_errors() {
        let cfg = config(vec![
            group("web", StrategyKind::Random, &[]),
            group("web", StrategyKind::SmoothWeightedRoundRobin, &[0, 2_000_000]),
            group("", StrategyKind::RoundRobin, &[1]),
        ]);
        let errors = validate_config(&cfg).unwrap_err();

        assert!(errors.contains(&ValidationError::NoBackends("web".into())));
        assert!(errors.contains(&ValidationError::DuplicateGroup("web".into())));
        assert!(errors.contains(&ValidationError::EmptyGroupName { index: 2 }));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::NonPositiveWeight { weight: 0, .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::WeightTooLarge { .. })));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_empty_weighted_random_group_allowed() {
        let cfg = config(vec![group("drained", StrategyKind::WeightedRandom, &[])]);
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn test_weights_ignored_for_unweighted_strategies() {
        let cfg = config(vec![group("rr", StrategyKind::RoundRobin, &[0, -4, 99_999_999])]);
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn test_total_weight_limit() {
        let mut cfg = config(vec![group("wr", StrategyKind::WeightedRandom, &[60, 60])]);
        cfg.limits.max_total_weight = 100;
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::TotalWeightTooLarge { group: "wr".into(), total: 120, max: 100 }]
        );
    }
}
