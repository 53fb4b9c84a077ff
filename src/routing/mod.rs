//! Routing rule persistence.
//!
//! # Data Flow
//! ```text
//! Raw request data (untyped key/value map)
//!     → types.rs (RuleFields::check_args: whitelist + filter)
//!     → repository.rs (parameterized SQL against `routing` / `channels`)
//!     → Return: RoutingRule rows, ids, counts, or RepositoryError
//! ```
//!
//! # Design Decisions
//! - The pool is injected; the repository holds no other state
//! - `rexp` and `target` are immutable once a rule exists
//! - Deleting a rule removes its target group's channels in the same transaction
//! - Not found, invalid input and storage failures are distinct errors

pub mod error;
pub mod repository;
pub mod types;

pub use error::{RepositoryError, RepositoryResult};
pub use repository::RoutingRepository;
pub use types::{RawInput, RoutingRule, RuleFields, DEFAULT_DESCRIPTION};
