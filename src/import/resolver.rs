//! Artist → Album → Track resolution for a valid row.

use super::row::ValidRow;
use crate::listen_store::{Album, Artist, ImportSession, Track};
use anyhow::Result;
use tracing::debug;

/// Outcome of resolving one row's entity chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub artist: Artist,
    pub album: Album,
    pub track: Track,
    pub artist_created: bool,
    pub album_created: bool,
    pub track_created: bool,
}

pub fn resolve_artist(session: &ImportSession, name: &str) -> Result<(Artist, bool)> {
    session.get_or_create_artist(name)
}

/// Find or create the album; a stored album without a release year gets this one.
pub fn resolve_album(
    session: &ImportSession,
    artist: &Artist,
    title: &str,
    year: i32,
) -> Result<(Album, bool)> {
    let (mut album, created) = session.get_or_create_album(artist, title, Some(year))?;
    if !created && album.release_year.is_none() {
        debug!("Backfilling release year {} of album {:?}", year, album.title);
        session.set_album_release_year(&mut album, year)?;
    }
    Ok((album, created))
}

/// Find or create the track by external id, moving it under `album` if it lives elsewhere.
pub fn resolve_track(
    session: &ImportSession,
    album: &Album,
    external_track_id: &str,
    title: &str,
) -> Result<(Track, bool)> {
    let (mut track, created) = session.get_or_create_track(external_track_id, title, album)?;
    if !created && track.album_id != album.id {
        debug!(
            "Moving track {} from album {} to album {}",
            track.external_track_id, track.album_id, album.id
        );
        session.set_track_album(&mut track, album)?;
    }
    Ok((track, created))
}

pub fn resolve_row(session: &ImportSession, row: &ValidRow) -> Result<Resolution> {
    let (artist, artist_created) = resolve_artist(session, &row.artist_name)?;
    let (album, album_created) = resolve_album(session, &artist, &row.album_name, row.year)?;
    let (track, track_created) = resolve_track(session, &album, &row.track_id, &row.track_name)?;
    Ok(Resolution {
        artist,
        album,
        track,
        artist_created,
        album_created,
        track_created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listen_store::SqliteListenStore;
    use tempfile::TempDir;

    fn create_tmp_store() -> (SqliteListenStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteListenStore::new(temp_dir.path().join("listen.db")).unwrap();
        (store, temp_dir)
    }

    fn valid_row(artist: &str, album: &str, track: &str, id: &str, year: i32) -> ValidRow {
        ValidRow {
            artist_name: artist.to_string(),
            album_name: album.to_string(),
            track_name: track.to_string(),
            track_id: id.to_string(),
            year,
            is_explicit: false,
        }
    }

    #[test]
    fn test_first_row_creates_whole_chain() {
        let (mut store, _temp_dir) = create_tmp_store();
        let session = store.begin_import().unwrap();

        let resolution = resolve_row(
            &session,
            &valid_row("Sia", "1000 Forms of Fear", "Chandelier", "t1", 2014),
        )
        .unwrap();
        assert!(resolution.artist_created);
        assert!(resolution.album_created);
        assert!(resolution.track_created);
        assert_eq!(resolution.album.artist_id, resolution.artist.id);
        assert_eq!(resolution.album.release_year, Some(2014));
        assert_eq!(resolution.track.album_id, resolution.album.id);

        let again = resolve_row(
            &session,
            &valid_row("Sia", "1000 Forms of Fear", "Chandelier", "t1", 2014),
        )
        .unwrap();
        assert!(!again.artist_created);
        assert!(!again.album_created);
        assert!(!again.track_created);
        assert_eq!(again.track, resolution.track);
    }

    #[test]
    fn test_album_year_backfilled_once() {
        let (mut store, _temp_dir) = create_tmp_store();
        let session = store.begin_import().unwrap();
        let (artist, _) = session.get_or_create_artist("Sia").unwrap();
        session.get_or_create_album(&artist, "Demo", None).unwrap();

        let (album, created) = resolve_album(&session, &artist, "Demo", 2016).unwrap();
        assert!(!created);
        assert_eq!(album.release_year, Some(2016));

        let (album, _) = resolve_album(&session, &artist, "Demo", 2020).unwrap();
        assert_eq!(album.release_year, Some(2016));

        session.commit().unwrap();
        let stored = store.get_album(artist.id, "Demo").unwrap().unwrap();
        assert_eq!(stored.release_year, Some(2016));
    }

    #[test]
    fn test_track_reparented_title_kept() {
        let (mut store, _temp_dir) = create_tmp_store();
        let session = store.begin_import().unwrap();

        let first = resolve_row(&session, &valid_row("Sia", "A", "Chandelier", "t1", 2014)).unwrap();
        let second = resolve_row(&session, &valid_row("Sia", "B", "Renamed", "t1", 2016)).unwrap();

        assert!(!second.track_created);
        assert!(second.album_created);
        assert_eq!(second.track.id, first.track.id);
        assert_eq!(second.track.album_id, second.album.id);
        assert_eq!(second.track.title, "Chandelier");

        session.commit().unwrap();
        let stored = store.get_track_by_external_id("t1").unwrap().unwrap();
        assert_eq!(stored.album_id, second.album.id);
        assert_eq!(stored.title, "Chandelier");
    }
}
