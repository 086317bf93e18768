//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Strategies and the backend manager produce:
//!     → logging.rs (structured log events)
//!
//! Consumers:
//!     → stderr, or whatever subscriber the embedding process installs
//! ```
//!
//! # Design Decisions
//! - The library only emits `tracing` events; installing a subscriber is
//!   left to the binary
//! - Nothing is logged on the per-call hot path except empty results

pub mod logging;
