//! authgate
//!
//! Token-based authentication service: verifies seeded username/password
//! pairs, issues signed time-limited JWTs, and guards a calculator endpoint
//! behind them.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod middleware;
pub mod server;

pub use config::Config;
