//! Read-only aggregate queries over the listening database.
//!
//! Every query is restricted to a [`YearWindow`]: entity counts through the
//! album release year, events through the local year of their `date`.

use super::models::*;
use super::store::SqliteListenStore;
use crate::window::YearWindow;
use anyhow::Result;
use rusqlite::params;
use std::collections::HashMap;

pub trait ListenAnalytics {
    fn window_summary(&self, window: &YearWindow) -> Result<WindowSummary>;

    /// Event types with their in-window event counts, zero counts included.
    fn events_by_type(&self, window: &YearWindow) -> Result<Vec<EventTypeCount>>;

    /// Most listened (artist, title) pairs in the window.
    fn top_tracks(&self, window: &YearWindow, limit: usize) -> Result<Vec<TopTrack>>;

    /// One entry per year of the window, zero-filled.
    fn events_by_year(&self, window: &YearWindow) -> Result<Vec<YearCount>>;

    /// Newest in-window events first.
    fn recent_events(&self, window: &YearWindow, limit: usize) -> Result<Vec<RecentEvent>>;

    fn analytics_report(
        &self,
        window: &YearWindow,
        top_tracks_limit: usize,
        recent_events_limit: usize,
    ) -> Result<AnalyticsReport> {
        Ok(AnalyticsReport {
            summary: self.window_summary(window)?,
            events_by_type: self.events_by_type(window)?,
            top_tracks: self.top_tracks(window, top_tracks_limit)?,
            events_by_year: self.events_by_year(window)?,
            recent_events: self.recent_events(window, recent_events_limit)?,
        })
    }
}

/// First and last YYYYMMDD dates of the window.
fn date_range(window: &YearWindow) -> (u32, u32) {
    (
        window.min as u32 * 10000 + 101,
        window.max as u32 * 10000 + 1231,
    )
}

fn organic_share(organic: u64, known: u64) -> Option<f64> {
    if known == 0 {
        None
    } else {
        Some(organic as f64 / known as f64)
    }
}

impl ListenAnalytics for SqliteListenStore {
    fn window_summary(&self, window: &YearWindow) -> Result<WindowSummary> {
        let conn = self.conn();
        let (start_date, end_date) = date_range(window);
        let count = |sql: &str, p: &[&dyn rusqlite::ToSql]| -> Result<u64> {
            let n: i64 = conn.query_row(sql, p, |r| r.get(0))?;
            Ok(n as u64)
        };

        let artists_count = count(
            "SELECT COUNT(DISTINCT artist_id) FROM albums WHERE release_year BETWEEN ?1 AND ?2",
            params![window.min, window.max],
        )?;
        let albums_count = count(
            "SELECT COUNT(*) FROM albums WHERE release_year BETWEEN ?1 AND ?2",
            params![window.min, window.max],
        )?;
        let tracks_count = count(
            "SELECT COUNT(*) FROM tracks t JOIN albums a ON a.id = t.album_id
             WHERE a.release_year BETWEEN ?1 AND ?2",
            params![window.min, window.max],
        )?;
        let users_count = count("SELECT COUNT(*) FROM users", params![])?;
        let events_count = count(
            "SELECT COUNT(*) FROM events WHERE date BETWEEN ?1 AND ?2",
            params![start_date, end_date],
        )?;

        let (organic, known): (i64, i64) = conn.query_row(
            "SELECT COALESCE(SUM(is_organic = 1), 0), COUNT(is_organic)
             FROM events WHERE date BETWEEN ?1 AND ?2",
            params![start_date, end_date],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;

        Ok(WindowSummary {
            year_min: window.min,
            year_max: window.max,
            artists_count,
            albums_count,
            tracks_count,
            users_count,
            events_count,
            organic_share: organic_share(organic as u64, known as u64),
        })
    }

    fn events_by_type(&self, window: &YearWindow) -> Result<Vec<EventTypeCount>> {
        let (start_date, end_date) = date_range(window);
        let mut stmt = self.conn().prepare_cached(
            "SELECT et.id, et.code, COUNT(e.id) AS cnt
             FROM event_types et
             LEFT JOIN events e
               ON e.event_type_id = et.id AND e.date BETWEEN ?1 AND ?2
             GROUP BY et.id, et.code
             ORDER BY cnt DESC, et.code",
        )?;
        let rows = stmt
            .query_map(params![start_date, end_date], |r| {
                Ok(EventTypeCount {
                    id: r.get(0)?,
                    code: r.get(1)?,
                    count: r.get::<_, i64>(2)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn top_tracks(&self, window: &YearWindow, limit: usize) -> Result<Vec<TopTrack>> {
        let (start_date, end_date) = date_range(window);
        let mut stmt = self.conn().prepare_cached(
            "SELECT ar.name, t.title, COUNT(e.id) AS cnt
             FROM events e
             JOIN tracks t ON t.id = e.track_id
             JOIN albums al ON al.id = t.album_id
             JOIN artists ar ON ar.id = al.artist_id
             WHERE e.date BETWEEN ?1 AND ?2
             GROUP BY ar.name, t.title
             ORDER BY cnt DESC, ar.name, t.title
             LIMIT ?3",
        )?;
        let rows = stmt
            .query_map(params![start_date, end_date, limit as i64], |r| {
                Ok(TopTrack {
                    artist: r.get(0)?,
                    title: r.get(1)?,
                    listen_count: r.get::<_, i64>(2)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn events_by_year(&self, window: &YearWindow) -> Result<Vec<YearCount>> {
        let (start_date, end_date) = date_range(window);
        let mut stmt = self.conn().prepare_cached(
            "SELECT date / 10000 AS year, COUNT(*)
             FROM events WHERE date BETWEEN ?1 AND ?2
             GROUP BY year",
        )?;
        let counts: HashMap<i32, u64> = stmt
            .query_map(params![start_date, end_date], |r| {
                Ok((r.get::<_, i32>(0)?, r.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(window
            .years()
            .map(|year| YearCount {
                year,
                count: counts.get(&year).copied().unwrap_or(0),
            })
            .collect())
    }

    fn recent_events(&self, window: &YearWindow, limit: usize) -> Result<Vec<RecentEvent>> {
        let (start_date, end_date) = date_range(window);
        let mut stmt = self.conn().prepare_cached(
            "SELECT e.ts, u.external_user_id, et.code, ar.name, t.title, e.is_organic
             FROM events e
             JOIN users u ON u.id = e.user_id
             JOIN event_types et ON et.id = e.event_type_id
             JOIN tracks t ON t.id = e.track_id
             JOIN albums al ON al.id = t.album_id
             JOIN artists ar ON ar.id = al.artist_id
             WHERE e.date BETWEEN ?1 AND ?2
             ORDER BY e.ts DESC, e.id DESC
             LIMIT ?3",
        )?;
        let rows = stmt
            .query_map(params![start_date, end_date, limit as i64], |r| {
                Ok(RecentEvent {
                    ts: r.get(0)?,
                    user: r.get(1)?,
                    event_type: r.get(2)?,
                    artist: r.get(3)?,
                    track: r.get(4)?,
                    is_organic: r.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
