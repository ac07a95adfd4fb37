use super::resolver::Resolution;
use crate::listen_store::TableCounts;
use crate::window::YearWindow;
use serde::Serialize;
use std::fmt;
use tracing::info;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CreatedCounts {
    pub artists: u64,
    pub albums: u64,
    pub tracks: u64,
    pub events: u64,
}

/// Counters of one import run. Only fed by the pipeline, never consulted by it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Rows read from the source, skipped ones included
    pub processed: u64,
    pub skipped_empty: u64,
    pub skipped_year: u64,
    pub created: CreatedCounts,
    pub window: YearWindow,
    /// Rows deleted by the reset pre-pass, when one was requested
    pub reset: Option<TableCounts>,
}

impl ImportReport {
    pub fn new(window: YearWindow) -> Self {
        ImportReport {
            processed: 0,
            skipped_empty: 0,
            skipped_year: 0,
            created: CreatedCounts::default(),
            window,
            reset: None,
        }
    }

    pub fn record_processed(&mut self) {
        self.processed += 1;
    }

    pub fn record_skipped_empty(&mut self) {
        self.skipped_empty += 1;
    }

    pub fn record_skipped_year(&mut self) {
        self.skipped_year += 1;
    }

    pub fn record_resolution(&mut self, resolution: &Resolution) {
        self.created.artists += resolution.artist_created as u64;
        self.created.albums += resolution.album_created as u64;
        self.created.tracks += resolution.track_created as u64;
    }

    pub fn record_event(&mut self) {
        self.created.events += 1;
    }

    pub fn record_reset(&mut self, deleted: TableCounts) {
        self.reset = Some(deleted);
    }

    pub fn log_summary(&self) {
        info!(
            "Import finished: processed={}, skipped_empty={}, skipped_year={} (window {}), created artists={} albums={} tracks={} events={}",
            self.processed,
            self.skipped_empty,
            self.skipped_year,
            self.window,
            self.created.artists,
            self.created.albums,
            self.created.tracks,
            self.created.events
        );
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "processed rows:   {}", self.processed)?;
        writeln!(f, "skipped empty:    {}", self.skipped_empty)?;
        writeln!(
            f,
            "skipped by year:  {}  (only {} kept)",
            self.skipped_year, self.window
        )?;
        writeln!(f, "artists created:  {}", self.created.artists)?;
        writeln!(f, "albums created:   {}", self.created.albums)?;
        writeln!(f, "tracks created:   {}", self.created.tracks)?;
        write!(f, "events created:   {}", self.created.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listen_store::{Album, Artist, Track};
    use crate::window::STUDY_WINDOW;

    fn resolution(artist: bool, album: bool, track: bool) -> Resolution {
        Resolution {
            artist: Artist {
                id: 1,
                name: "Sia".to_string(),
            },
            album: Album {
                id: 1,
                artist_id: 1,
                title: "A".to_string(),
                release_year: Some(2014),
            },
            track: Track {
                id: 1,
                album_id: 1,
                title: "Chandelier".to_string(),
                external_track_id: "t1".to_string(),
            },
            artist_created: artist,
            album_created: album,
            track_created: track,
        }
    }

    #[test]
    fn test_counts_only_creations() {
        let mut report = ImportReport::new(STUDY_WINDOW);
        report.record_resolution(&resolution(true, true, true));
        report.record_resolution(&resolution(false, true, false));
        report.record_resolution(&resolution(false, false, false));

        assert_eq!(
            report.created,
            CreatedCounts {
                artists: 1,
                albums: 2,
                tracks: 1,
                events: 0,
            }
        );
    }

    #[test]
    fn test_display_mentions_window() {
        let mut report = ImportReport::new(STUDY_WINDOW);
        report.record_processed();
        report.record_skipped_year();

        let text = report.to_string();
        assert!(text.contains("processed rows:   1"));
        assert!(text.contains("skipped by year:  1  (only 2010–2025 kept)"));
    }

    #[test]
    fn test_serializes_to_json() {
        let report = ImportReport::new(STUDY_WINDOW);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["window"]["min"], 2010);
        assert_eq!(json["created"]["events"], 0);
        assert!(json["reset"].is_null());
    }
}
