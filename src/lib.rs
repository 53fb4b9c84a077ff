//! Routing rule administration library.

pub mod config;
pub mod filter;
pub mod observability;
pub mod routing;
pub mod storage;

pub use config::AppConfig;
pub use routing::{RepositoryError, RoutingRepository, RoutingRule};
