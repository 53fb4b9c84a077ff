//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Repository operations produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (operation counters by outcome)
//! ```
//!
//! # Design Decisions
//! - Log level configurable via config and RUST_LOG
//! - Metrics go through the `metrics` facade; without an installed
//!   recorder they are no-ops

pub mod logging;
pub mod metrics;
