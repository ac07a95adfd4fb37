//! CSV listening-data import pipeline.
//!
//! Rows flow through [`row`] (parse and classify), [`resolver`] (artist,
//! album and track find-or-create), [`recorder`] (event with a synthesized
//! timestamp) and are tallied in an [`ImportReport`]. [`run_import`] drives a
//! whole run inside one transaction.

mod error;
pub mod recorder;
mod report;
pub mod resolver;
pub mod row;
mod runner;

pub use error::ImportError;
pub use report::{CreatedCounts, ImportReport};
pub use runner::{import_rows, run_import, ImportOptions, DEMO_USER_ID, LISTEN_EVENT_TYPE};
