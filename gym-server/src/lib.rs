//! Gym back-office server
//!
//! HTTP service behind the gym's administrative frontend. The heart of the
//! crate is the cash-cut reconciliation engine; everything else is the
//! surface that feeds it and persists its output.
//!
//! # Module structure
//!
//! ```text
//! gym-server/src/
//! ├── core/        # configuration, state, HTTP server
//! ├── cut_money/   # cash-cut reconciliation engine (pure decimal math)
//! ├── api/         # HTTP routes and handlers
//! ├── db/          # SQLite pool, migrations, repositories
//! └── utils/       # errors, logging, time, validation
//! ```

pub mod api;
pub mod core;
pub mod cut_money;
pub mod db;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: .env, working directory, logging.
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    let log_dir = format!("{}/logs", config.work_dir);
    std::fs::create_dir_all(&log_dir)?;
    init_logger_with_file(None, Some(log_dir.as_str()));

    Ok(())
}
