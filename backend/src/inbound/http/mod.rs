//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod context;
pub mod error;
pub mod health;
pub mod movies;
pub mod reviews;
pub mod social;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod users;

pub use error::ApiResult;
