//! Listen Catalog Library
//!
//! Imports CSV listening exports into a normalized SQLite store and computes
//! analytics over it. Exposed as a library for the binary and for testing.

pub mod cli_style;
pub mod config;
pub mod import;
pub mod listen_store;
pub mod sqlite_persistence;
pub mod window;

// Re-export commonly used types for convenience
pub use import::{run_import, ImportError, ImportOptions, ImportReport};
pub use listen_store::{ListenAnalytics, SqliteListenStore};
pub use window::{YearWindow, STUDY_WINDOW, YEAR_MAX, YEAR_MIN};
