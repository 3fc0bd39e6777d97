//! JSON-file persistence adapters.
//!
//! This module provides concrete implementations of the account and review
//! store ports backed by a single JSON snapshot on disk.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: The store only translates between the serialised
//!   snapshot and domain types. No business logic resides here.
//! - **Whole-state snapshots**: All collections serialise together, so one
//!   atomic rename persists every document written in an operation.
//! - **Strongly typed errors**: All io and serialisation failures are mapped
//!   to the port error types.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::JsonDocumentStore;
//!
//! let store = JsonDocumentStore::open("data/store.json")?;
//! ```

mod json_store;

pub use json_store::JsonDocumentStore;
