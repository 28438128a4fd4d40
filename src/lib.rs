// ABOUTME: Library root for gangway - exposes public types for testing.
// ABOUTME: The agent binary is in main.rs.

pub mod adapter;
pub mod api;
pub mod blueprint;
pub mod config;
pub mod context;
pub mod deploy;
pub mod error;
pub mod repo;
pub mod types;
