//! Test fixture creation for databases and CSV files

use super::constants::*;
use anyhow::Result;
use listen_catalog::import::{import_rows, row::ListenCsvReader};
use listen_catalog::{run_import, ImportError, ImportOptions, ImportReport, SqliteListenStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// CSV text with the standard header followed by `rows`.
pub fn csv_content(rows: &[&str]) -> String {
    let mut content = String::from(CSV_HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    content
}

/// A temporary directory holding a fresh listening database and CSV files.
pub struct TestWorkspace {
    pub dir: TempDir,
    pub store: SqliteListenStore,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let store = SqliteListenStore::new(dir.path().join("listen.db"))?;
        Ok(TestWorkspace { dir, store })
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("listen.db")
    }

    pub fn write_csv(&self, name: &str, rows: &[&str]) -> Result<PathBuf> {
        self.write_raw(name, csv_content(rows).as_bytes())
    }

    pub fn write_raw(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, bytes)?;
        Ok(path)
    }

    pub fn import(&mut self, csv_path: &Path) -> Result<ImportReport, ImportError> {
        self.import_with(ImportOptions::new(csv_path))
    }

    pub fn import_with(&mut self, options: ImportOptions) -> Result<ImportReport, ImportError> {
        let mut rng = StdRng::seed_from_u64(TEST_SEED);
        run_import(&mut self.store, &options, &mut rng)
    }

    /// Import CSV text without going through a file.
    pub fn import_text(&mut self, content: &str) -> Result<ImportReport, ImportError> {
        let mut reader = ListenCsvReader::new(content.as_bytes())?;
        let mut rng = StdRng::seed_from_u64(TEST_SEED);
        import_rows(
            &mut self.store,
            &mut reader,
            &ImportOptions::new("inline.csv"),
            &mut rng,
        )
    }
}
