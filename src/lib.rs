//! Backend selection strategies.
//!
//! Picks the backend that handles the next request: plain round-robin,
//! uniform random, weighted random and smooth weighted round-robin, all safe
//! to share between threads.

pub mod config;
pub mod load_balancer;
pub mod observability;

pub use config::BalancerConfig;
pub use load_balancer::{BackendManager, BalancerError, LoadBalancer};
