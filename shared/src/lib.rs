//! Shared types for the gym back-office
//!
//! Domain models exchanged between the HTTP API and the database layer,
//! plus small utilities. Row types derive `sqlx::FromRow` behind the
//! `db` feature so the frontend-facing build stays free of sqlx.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
