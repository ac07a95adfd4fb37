//! CSV row parsing and classification.

use super::error::ImportError;
use crate::window::YearWindow;
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const ARTIST_NAME_COLUMN: &str = "artist_name";
pub const ALBUM_NAME_COLUMN: &str = "album_name";
pub const TRACK_NAME_COLUMN: &str = "track_name";
pub const TRACK_ID_COLUMN: &str = "track_id";
pub const RELEASE_DATE_COLUMN: &str = "album_release_date";
pub const EXPLICIT_COLUMN: &str = "explicit";

pub const REQUIRED_COLUMNS: [&str; 4] = [
    ARTIST_NAME_COLUMN,
    ALBUM_NAME_COLUMN,
    TRACK_NAME_COLUMN,
    TRACK_ID_COLUMN,
];

const EXPLICIT_TOKENS: [&str; 5] = ["1", "true", "t", "yes", "y"];

/// One data row with every field trimmed. Absent optional fields are empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenRow {
    pub artist_name: String,
    pub album_name: String,
    pub track_name: String,
    pub track_id: String,
    pub release_date: String,
    pub explicit: String,
}

/// A row admitted for entity resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidRow {
    pub artist_name: String,
    pub album_name: String,
    pub track_name: String,
    pub track_id: String,
    pub year: i32,
    pub is_explicit: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowOutcome {
    SkippedEmpty,
    SkippedYear,
    Valid(ValidRow),
}

/// Year from the first four characters of a date-like string.
pub fn parse_year(release_date: &str) -> Option<i32> {
    let prefix: String = release_date.chars().take(4).collect();
    prefix.parse().ok()
}

pub fn parse_explicit(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    EXPLICIT_TOKENS.contains(&value.as_str())
}

impl ListenRow {
    /// Empty required fields win over an out-of-window year.
    pub fn classify(self, window: &YearWindow) -> RowOutcome {
        if self.artist_name.is_empty()
            || self.album_name.is_empty()
            || self.track_name.is_empty()
            || self.track_id.is_empty()
        {
            return RowOutcome::SkippedEmpty;
        }

        let year = match parse_year(&self.release_date) {
            Some(year) if window.contains(year) => year,
            _ => return RowOutcome::SkippedYear,
        };

        RowOutcome::Valid(ValidRow {
            is_explicit: parse_explicit(&self.explicit),
            artist_name: self.artist_name,
            album_name: self.album_name,
            track_name: self.track_name,
            track_id: self.track_id,
            year,
        })
    }
}

#[derive(Clone, Copy, Debug)]
struct ColumnIndices {
    artist_name: usize,
    album_name: usize,
    track_name: usize,
    track_id: usize,
    release_date: Option<usize>,
    explicit: Option<usize>,
}

impl ColumnIndices {
    fn from_headers(headers: &StringRecord) -> Result<Self, ImportError> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let mut missing = Vec::new();
        for name in REQUIRED_COLUMNS {
            if position(name).is_none() {
                missing.push(name.to_string());
            }
        }
        if !missing.is_empty() {
            missing.sort();
            return Err(ImportError::MissingColumns { missing });
        }

        // Presence checked above
        let required = |name: &str| position(name).unwrap_or_default();
        Ok(ColumnIndices {
            artist_name: required(ARTIST_NAME_COLUMN),
            album_name: required(ALBUM_NAME_COLUMN),
            track_name: required(TRACK_NAME_COLUMN),
            track_id: required(TRACK_ID_COLUMN),
            release_date: position(RELEASE_DATE_COLUMN),
            explicit: position(EXPLICIT_COLUMN),
        })
    }

    fn extract(&self, record: &StringRecord) -> ListenRow {
        let field = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        ListenRow {
            artist_name: field(Some(self.artist_name)),
            album_name: field(Some(self.album_name)),
            track_name: field(Some(self.track_name)),
            track_id: field(Some(self.track_id)),
            release_date: field(self.release_date),
            explicit: field(self.explicit),
        }
    }
}

/// Reader over a listening CSV export whose header has already been validated.
pub struct ListenCsvReader<R> {
    reader: csv::Reader<R>,
    columns: ColumnIndices,
}

impl ListenCsvReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ImportError> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read> ListenCsvReader<R> {
    /// Read the header row and check the required columns.
    pub fn new(source: R) -> Result<Self, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);
        let columns = ColumnIndices::from_headers(reader.headers()?)?;
        Ok(ListenCsvReader { reader, columns })
    }

    /// Data rows, at most `limit` of them when given.
    pub fn rows(
        &mut self,
        limit: Option<usize>,
    ) -> impl Iterator<Item = Result<ListenRow, ImportError>> + '_ {
        let columns = self.columns;
        self.reader
            .records()
            .take(limit.unwrap_or(usize::MAX))
            .map(move |record| -> Result<ListenRow, ImportError> {
                Ok(columns.extract(&record?))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::STUDY_WINDOW;

    fn row(artist: &str, album: &str, track: &str, id: &str, date: &str) -> ListenRow {
        ListenRow {
            artist_name: artist.to_string(),
            album_name: album.to_string(),
            track_name: track.to_string(),
            track_id: id.to_string(),
            release_date: date.to_string(),
            explicit: String::new(),
        }
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2014-05-01"), Some(2014));
        assert_eq!(parse_year("2014"), Some(2014));
        assert_eq!(parse_year("1999-01-01"), Some(1999));
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("n/a"), None);
        assert_eq!(parse_year("20x4-01-01"), None);
    }

    #[test]
    fn test_parse_explicit() {
        for value in ["True", "YES", "1", "t", "y", " yes "] {
            assert!(parse_explicit(value), "{value:?} should be explicit");
        }
        for value in ["", "0", "no", "false", "explicit", "N"] {
            assert!(!parse_explicit(value), "{value:?} should not be explicit");
        }
    }

    #[test]
    fn test_classify_empty_fields_first() {
        let outcome = row("Sia", "", "Chandelier", "t1", "1999-01-01").classify(&STUDY_WINDOW);
        assert_eq!(outcome, RowOutcome::SkippedEmpty);
    }

    #[test]
    fn test_classify_year_window() {
        for date in ["1999-01-01", "2009-12-31", "2026-01-01", "", "unknown"] {
            let outcome = row("Sia", "A", "Chandelier", "t1", date).classify(&STUDY_WINDOW);
            assert_eq!(outcome, RowOutcome::SkippedYear, "date {date:?}");
        }
        for date in ["2010-01-01", "2025-12-31"] {
            let outcome = row("Sia", "A", "Chandelier", "t1", date).classify(&STUDY_WINDOW);
            assert!(matches!(outcome, RowOutcome::Valid(_)), "date {date:?}");
        }
    }

    #[test]
    fn test_classify_valid_row() {
        let mut listen = row("Sia", "1000 Forms of Fear", "Chandelier", "t1", "2014-05-01");
        listen.explicit = "True".to_string();
        assert_eq!(
            listen.classify(&STUDY_WINDOW),
            RowOutcome::Valid(ValidRow {
                artist_name: "Sia".to_string(),
                album_name: "1000 Forms of Fear".to_string(),
                track_name: "Chandelier".to_string(),
                track_id: "t1".to_string(),
                year: 2014,
                is_explicit: true,
            })
        );
    }

    #[test]
    fn test_reader_reports_every_missing_column() {
        let csv = "artist_name,track_name,explicit\nSia,Chandelier,0\n";
        match ListenCsvReader::new(csv.as_bytes()) {
            Err(ImportError::MissingColumns { missing }) => {
                assert_eq!(missing, vec!["album_name", "track_id"]);
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }

        // Names come out sorted, not in header or declaration order
        let csv = "track_id,explicit\nt1,0\n";
        match ListenCsvReader::new(csv.as_bytes()) {
            Err(ImportError::MissingColumns { missing }) => {
                assert_eq!(missing, vec!["album_name", "artist_name", "track_name"]);
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_reader_trims_and_tolerates_short_rows() {
        let csv = "track_id,artist_name,album_name,track_name,album_release_date\n\
                   \" t1 \",  Sia , 1000 Forms of Fear ,Chandelier,2014-05-01\n\
                   t2,Sia\n";
        let mut reader = ListenCsvReader::new(csv.as_bytes()).unwrap();
        let rows: Vec<ListenRow> = reader.rows(None).map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].track_id, "t1");
        assert_eq!(rows[0].artist_name, "Sia");
        assert_eq!(rows[0].album_name, "1000 Forms of Fear");
        assert_eq!(rows[0].explicit, "");
        assert_eq!(rows[1].track_id, "t2");
        assert_eq!(rows[1].album_name, "");
    }

    #[test]
    fn test_reader_limit() {
        let csv = "artist_name,album_name,track_name,track_id\nA,B,C,1\nA,B,C,2\nA,B,C,3\n";
        let mut reader = ListenCsvReader::new(csv.as_bytes()).unwrap();
        assert_eq!(reader.rows(Some(2)).count(), 2);
    }
}
