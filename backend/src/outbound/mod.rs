//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **persistence**: JSON-file document store backing the account and
//!   review ports
//! - **mailer**: tracing-backed one-time-code delivery
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod mailer;
pub mod persistence;
