//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers live under [`http`], with future inbound transports
//! expected to sit alongside it.

pub mod http;
