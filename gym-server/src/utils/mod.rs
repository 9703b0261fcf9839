//! Utility module - shared helpers and types
//!
//! - [`AppError`] / [`AppResult`] - application error type and handler result
//! - [`logger`] - tracing setup
//! - [`time`] - business-timezone date helpers
//! - [`validation`] - text/amount validation helpers

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult};
