//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestWorkspace, SIA_ROW};
//!
//! #[test]
//! fn test_import() {
//!     let mut workspace = TestWorkspace::new().unwrap();
//!     let csv = workspace.write_csv("listens.csv", &[SIA_ROW]).unwrap();
//!     let report = workspace.import(&csv).unwrap();
//!     assert_eq!(report.created.events, 1);
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{csv_content, TestWorkspace};
