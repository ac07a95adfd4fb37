//! One import run: header check, optional reset, row loop, single commit.

use super::error::ImportError;
use super::recorder::EventRecorder;
use super::report::ImportReport;
use super::resolver::resolve_row;
use super::row::{ListenCsvReader, RowOutcome};
use crate::listen_store::SqliteListenStore;
use crate::window::STUDY_WINDOW;
use chrono_tz::Tz;
use rand::Rng;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// External id of the user every imported event belongs to.
pub const DEMO_USER_ID: &str = "demo_user";
pub const LISTEN_EVENT_TYPE: &str = "listen";

const PROGRESS_LOG_INTERVAL: u64 = 10_000;

#[derive(Clone, Debug)]
pub struct ImportOptions {
    pub csv_path: PathBuf,
    /// Maximum number of rows to read; `None` or `Some(0)` reads everything.
    pub limit: Option<usize>,
    /// Delete all stored data before importing.
    pub reset: bool,
    pub time_zone: Tz,
}

impl ImportOptions {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        ImportOptions {
            csv_path: csv_path.into(),
            limit: None,
            reset: false,
            time_zone: Tz::UTC,
        }
    }

    fn row_limit(&self) -> Option<usize> {
        self.limit.filter(|n| *n > 0)
    }
}

/// Import the CSV at `options.csv_path`.
///
/// The header is checked before any write. Everything else, reset included,
/// happens in a single transaction that is only committed when every row
/// went through.
pub fn run_import<R: Rng>(
    store: &mut SqliteListenStore,
    options: &ImportOptions,
    rng: &mut R,
) -> Result<ImportReport, ImportError> {
    info!("Importing listening data from {:?}", options.csv_path);
    let mut reader = ListenCsvReader::from_path(&options.csv_path)?;
    import_rows(store, &mut reader, options, rng)
}

/// Same as [`run_import`] for an already opened reader; `options.csv_path` is ignored.
pub fn import_rows<S: Read, R: Rng>(
    store: &mut SqliteListenStore,
    reader: &mut ListenCsvReader<S>,
    options: &ImportOptions,
    rng: &mut R,
) -> Result<ImportReport, ImportError> {
    let window = STUDY_WINDOW;
    let mut report = ImportReport::new(window);

    let session = store.begin_import()?;

    if options.reset {
        let deleted = session.reset()?;
        warn!(
            "Reset: deleted {} events, {} tracks, {} albums, {} artists, {} users, {} event types",
            deleted.events,
            deleted.tracks,
            deleted.albums,
            deleted.artists,
            deleted.users,
            deleted.event_types
        );
        report.record_reset(deleted);
    }

    let (user, _) = session.get_or_create_user(DEMO_USER_ID)?;
    let (event_type, _) = session.get_or_create_event_type(LISTEN_EVENT_TYPE)?;
    let mut recorder = EventRecorder::new(user, event_type, options.time_zone, rng);

    for row in reader.rows(options.row_limit()) {
        let row = row?;
        report.record_processed();

        match row.classify(&window) {
            RowOutcome::SkippedEmpty => {
                debug!("Row {}: empty required field", report.processed);
                report.record_skipped_empty();
            }
            RowOutcome::SkippedYear => {
                debug!("Row {}: release year outside {}", report.processed, window);
                report.record_skipped_year();
            }
            RowOutcome::Valid(valid) => {
                let resolution = resolve_row(&session, &valid)?;
                report.record_resolution(&resolution);
                recorder.record(&session, &resolution.track, &valid)?;
                report.record_event();
            }
        }

        if report.processed % PROGRESS_LOG_INTERVAL == 0 {
            info!(
                "Processed {} rows, {} events so far",
                report.processed, report.created.events
            );
        }
    }

    session.commit()?;
    report.log_summary();
    Ok(report)
}
