//! Data models
//!
//! Shared between gym-server and the back-office frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); timestamps are Unix
//! millis; calendar days are `YYYY-MM-DD` strings in the business timezone.

pub mod cash_cut;
pub mod daily_data;
pub mod expense;
pub mod serde_helpers;
pub mod user;

// Re-exports
pub use cash_cut::*;
pub use daily_data::*;
pub use expense::*;
pub use user::*;
