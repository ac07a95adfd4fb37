//! SQLite-backed store for the normalized listening data.
//!
//! The store owns a single read-write connection. Writes go exclusively
//! through an [`ImportSession`], which wraps one transaction; reads used by
//! analytics and inspection run directly on the connection.

use super::models::*;
use super::schema::LISTEN_VERSIONED_SCHEMAS;
use super::session::ImportSession;
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct SqliteListenStore {
    conn: Connection,
    db_path: PathBuf,
}

fn migrate_if_needed(conn: &mut Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    let latest_version = LISTEN_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &LISTEN_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating listen db schema at version {}", latest_version);
        let tx = conn.transaction()?;
        latest_schema.create(&tx)?;
        tx.commit()?;
        return Ok(());
    }

    if db_version < BASE_DB_VERSION as i64 {
        bail!(
            "Database has user_version {} and was not created by this tool",
            db_version
        );
    }
    let current_version = (db_version - BASE_DB_VERSION as i64) as usize;
    if current_version != latest_version {
        bail!(
            "Unsupported listen db version {}, expected {}",
            current_version,
            latest_version
        );
    }

    latest_schema
        .validate(conn)
        .context("Listen db schema validation failed")
}

impl SqliteListenStore {
    /// Open (creating if needed) the listening database at `db_path`.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();

        let mut conn = Connection::open_with_flags(
            db_path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open listen database {:?}", db_path))?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrate_if_needed(&mut conn)?;

        let store = SqliteListenStore {
            conn,
            db_path: db_path.to_path_buf(),
        };

        let counts = store.get_counts()?;
        info!(
            "Opened listen db {:?}: {} artists, {} albums, {} tracks, {} events",
            store.db_path, counts.artists, counts.albums, counts.tracks, counts.events
        );

        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub(super) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Start the unit of work for one import run.
    ///
    /// Every write performed through the returned session is rolled back
    /// unless [`ImportSession::commit`] is called.
    pub fn begin_import(&mut self) -> Result<ImportSession<'_>> {
        debug!("Beginning import transaction");
        let tx = self
            .conn
            .transaction()
            .context("Failed to begin import transaction")?;
        Ok(ImportSession::new(tx))
    }

    pub fn get_counts(&self) -> Result<TableCounts> {
        count_tables(&self.conn)
    }

    pub fn get_artist_by_name(&self, name: &str) -> Result<Option<Artist>> {
        find_artist(&self.conn, name)
    }

    pub fn get_album(&self, artist_id: i64, title: &str) -> Result<Option<Album>> {
        find_album(&self.conn, artist_id, title)
    }

    pub fn get_track_by_external_id(&self, external_track_id: &str) -> Result<Option<Track>> {
        find_track(&self.conn, external_track_id)
    }

    pub fn get_user(&self, external_user_id: &str) -> Result<Option<User>> {
        find_user(&self.conn, external_user_id)
    }

    pub fn get_event_type(&self, code: &str) -> Result<Option<EventType>> {
        find_event_type(&self.conn, code)
    }

    /// All events of a track, oldest first.
    pub fn get_track_events(&self, track_id: i64) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, ts, date, user_id, track_id, event_type_id, is_organic
             FROM events WHERE track_id = ?1 ORDER BY ts, id",
        )?;
        let events = stmt
            .query_map(params![track_id], parse_event_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// Every event in insertion order.
    pub fn list_events(&self) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, ts, date, user_id, track_id, event_type_id, is_organic
             FROM events ORDER BY id",
        )?;
        let events = stmt
            .query_map([], parse_event_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }
}

// =========================================================================
// Row lookups shared by the store and the import session
// =========================================================================

fn parse_event_row(row: &rusqlite::Row) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        ts: row.get(1)?,
        date: row.get(2)?,
        user_id: row.get(3)?,
        track_id: row.get(4)?,
        event_type_id: row.get(5)?,
        is_organic: row.get(6)?,
    })
}

pub(super) fn count_tables(conn: &Connection) -> Result<TableCounts> {
    let count = |table: &str| -> Result<u64> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
            r.get(0)
        })?;
        Ok(n as u64)
    };
    Ok(TableCounts {
        artists: count("artists")?,
        albums: count("albums")?,
        tracks: count("tracks")?,
        users: count("users")?,
        event_types: count("event_types")?,
        events: count("events")?,
    })
}

pub(super) fn find_artist(conn: &Connection, name: &str) -> Result<Option<Artist>> {
    let artist = conn
        .prepare_cached("SELECT id, name FROM artists WHERE name = ?1")?
        .query_row(params![name], |r| {
            Ok(Artist {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        })
        .optional()?;
    Ok(artist)
}

pub(super) fn find_album(conn: &Connection, artist_id: i64, title: &str) -> Result<Option<Album>> {
    let album = conn
        .prepare_cached(
            "SELECT id, artist_id, title, release_year FROM albums WHERE artist_id = ?1 AND title = ?2",
        )?
        .query_row(params![artist_id, title], |r| {
            Ok(Album {
                id: r.get(0)?,
                artist_id: r.get(1)?,
                title: r.get(2)?,
                release_year: r.get(3)?,
            })
        })
        .optional()?;
    Ok(album)
}

pub(super) fn find_track(conn: &Connection, external_track_id: &str) -> Result<Option<Track>> {
    let track = conn
        .prepare_cached(
            "SELECT id, album_id, title, external_track_id FROM tracks WHERE external_track_id = ?1",
        )?
        .query_row(params![external_track_id], |r| {
            Ok(Track {
                id: r.get(0)?,
                album_id: r.get(1)?,
                title: r.get(2)?,
                external_track_id: r.get(3)?,
            })
        })
        .optional()?;
    Ok(track)
}

pub(super) fn find_user(conn: &Connection, external_user_id: &str) -> Result<Option<User>> {
    let user = conn
        .prepare_cached("SELECT id, external_user_id FROM users WHERE external_user_id = ?1")?
        .query_row(params![external_user_id], |r| {
            Ok(User {
                id: r.get(0)?,
                external_user_id: r.get(1)?,
            })
        })
        .optional()?;
    Ok(user)
}

pub(super) fn find_event_type(conn: &Connection, code: &str) -> Result<Option<EventType>> {
    let event_type = conn
        .prepare_cached("SELECT id, code FROM event_types WHERE code = ?1")?
        .query_row(params![code], |r| {
            Ok(EventType {
                id: r.get(0)?,
                code: r.get(1)?,
            })
        })
        .optional()?;
    Ok(event_type)
}
