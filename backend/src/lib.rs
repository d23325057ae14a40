//! Task store and session service backing the task board.
//!
//! Tasks and sessions live behind repository traits so the HTTP layer runs
//! unchanged against Redis in production and an in-memory map in tests.

pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod store;

pub use config::{Config, StorageBackend};
pub use error::{ApiError, ConfigError};
pub use routes::{router, AppState};
