//! Unit of work for one import run.
//!
//! An [`ImportSession`] owns the run's transaction. Resolvers receive it
//! explicitly and use its find-or-create primitives, which always report
//! whether a row was created. Dropping the session without calling
//! [`ImportSession::commit`] rolls back every write.

use super::models::*;
use super::schema::TABLES_CHILD_FIRST;
use super::store::{find_album, find_artist, find_event_type, find_track, find_user};
use anyhow::{Context, Result};
use rusqlite::{params, Transaction};
use tracing::debug;

pub struct ImportSession<'conn> {
    tx: Transaction<'conn>,
}

/// Look up by dedup key, insert on miss, and say which of the two happened.
fn find_or_create<T>(
    find: impl FnOnce() -> Result<Option<T>>,
    create: impl FnOnce() -> Result<T>,
) -> Result<(T, bool)> {
    if let Some(existing) = find()? {
        return Ok((existing, false));
    }
    Ok((create()?, true))
}

impl<'conn> ImportSession<'conn> {
    pub(super) fn new(tx: Transaction<'conn>) -> Self {
        ImportSession { tx }
    }

    /// Delete every row of every table, children before parents.
    /// Returns the number of deleted rows per table.
    pub fn reset(&self) -> Result<TableCounts> {
        let mut deleted = TableCounts::default();
        for table in TABLES_CHILD_FIRST {
            let n = self
                .tx
                .execute(&format!("DELETE FROM {}", table), [])
                .with_context(|| format!("Failed to clear table {}", table))?
                as u64;
            match *table {
                "events" => deleted.events = n,
                "tracks" => deleted.tracks = n,
                "albums" => deleted.albums = n,
                "artists" => deleted.artists = n,
                "users" => deleted.users = n,
                "event_types" => deleted.event_types = n,
                _ => {}
            }
            debug!("Reset: deleted {} rows from {}", n, table);
        }
        Ok(deleted)
    }

    pub fn get_or_create_artist(&self, name: &str) -> Result<(Artist, bool)> {
        find_or_create(
            || find_artist(&self.tx, name),
            || {
                self.tx
                    .prepare_cached("INSERT INTO artists (name) VALUES (?1)")?
                    .execute(params![name])?;
                Ok(Artist {
                    id: self.tx.last_insert_rowid(),
                    name: name.to_string(),
                })
            },
        )
    }

    /// Resolve an album of `artist`. `release_year` is only used when the album is created.
    pub fn get_or_create_album(
        &self,
        artist: &Artist,
        title: &str,
        release_year: Option<i32>,
    ) -> Result<(Album, bool)> {
        find_or_create(
            || find_album(&self.tx, artist.id, title),
            || {
                self.tx
                    .prepare_cached(
                        "INSERT INTO albums (artist_id, title, release_year) VALUES (?1, ?2, ?3)",
                    )?
                    .execute(params![artist.id, title, release_year])?;
                Ok(Album {
                    id: self.tx.last_insert_rowid(),
                    artist_id: artist.id,
                    title: title.to_string(),
                    release_year,
                })
            },
        )
    }

    /// Patch the release year of a stored album; no other column is touched.
    pub fn set_album_release_year(&self, album: &mut Album, release_year: i32) -> Result<()> {
        self.tx
            .prepare_cached("UPDATE albums SET release_year = ?1 WHERE id = ?2")?
            .execute(params![release_year, album.id])?;
        album.release_year = Some(release_year);
        Ok(())
    }

    /// Resolve a track by its external id. `title` and `album` are only used when the track is created.
    pub fn get_or_create_track(
        &self,
        external_track_id: &str,
        title: &str,
        album: &Album,
    ) -> Result<(Track, bool)> {
        find_or_create(
            || find_track(&self.tx, external_track_id),
            || {
                self.tx
                    .prepare_cached(
                        "INSERT INTO tracks (album_id, title, external_track_id) VALUES (?1, ?2, ?3)",
                    )?
                    .execute(params![album.id, title, external_track_id])?;
                Ok(Track {
                    id: self.tx.last_insert_rowid(),
                    album_id: album.id,
                    title: title.to_string(),
                    external_track_id: external_track_id.to_string(),
                })
            },
        )
    }

    /// Move a stored track to another album; the title is left alone.
    pub fn set_track_album(&self, track: &mut Track, album: &Album) -> Result<()> {
        self.tx
            .prepare_cached("UPDATE tracks SET album_id = ?1 WHERE id = ?2")?
            .execute(params![album.id, track.id])?;
        track.album_id = album.id;
        Ok(())
    }

    pub fn get_or_create_user(&self, external_user_id: &str) -> Result<(User, bool)> {
        find_or_create(
            || find_user(&self.tx, external_user_id),
            || {
                self.tx
                    .prepare_cached("INSERT INTO users (external_user_id) VALUES (?1)")?
                    .execute(params![external_user_id])?;
                Ok(User {
                    id: self.tx.last_insert_rowid(),
                    external_user_id: external_user_id.to_string(),
                })
            },
        )
    }

    pub fn get_or_create_event_type(&self, code: &str) -> Result<(EventType, bool)> {
        find_or_create(
            || find_event_type(&self.tx, code),
            || {
                self.tx
                    .prepare_cached("INSERT INTO event_types (code) VALUES (?1)")?
                    .execute(params![code])?;
                Ok(EventType {
                    id: self.tx.last_insert_rowid(),
                    code: code.to_string(),
                })
            },
        )
    }

    /// Append an event. Events are never deduplicated.
    pub fn insert_event(&self, event: &NewEvent) -> Result<i64> {
        self.tx
            .prepare_cached(
                "INSERT INTO events (ts, date, user_id, track_id, event_type_id, is_organic)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?
            .execute(params![
                event.ts,
                event.date,
                event.user_id,
                event.track_id,
                event.event_type_id,
                event.is_organic
            ])?;
        Ok(self.tx.last_insert_rowid())
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit().context("Failed to commit import transaction")
    }
}
