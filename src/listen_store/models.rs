//! Row models for the listening database and the analytics read models.

use serde::Serialize;

// =============================================================================
// Normalized entities
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Album {
    pub id: i64,
    pub artist_id: i64,
    pub title: String,
    pub release_year: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Track {
    pub id: i64,
    pub album_id: i64,
    pub title: String,
    pub external_track_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub external_user_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EventType {
    pub id: i64,
    pub code: String,
}

/// A listen event about to be appended. Events are never updated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEvent {
    /// Unix timestamp (seconds)
    pub ts: i64,
    /// Local civil date of `ts` in YYYYMMDD format
    pub date: u32,
    pub user_id: i64,
    pub track_id: i64,
    pub event_type_id: i64,
    pub is_organic: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: i64,
    pub ts: i64,
    pub date: u32,
    pub user_id: i64,
    pub track_id: i64,
    pub event_type_id: i64,
    pub is_organic: Option<bool>,
}

/// Row counts per table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub artists: u64,
    pub albums: u64,
    pub tracks: u64,
    pub users: u64,
    pub event_types: u64,
    pub events: u64,
}

// =============================================================================
// Analytics models
// =============================================================================

/// Entity counts restricted to a year window.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WindowSummary {
    pub year_min: i32,
    pub year_max: i32,
    /// Artists with at least one album released inside the window
    pub artists_count: u64,
    /// Albums released inside the window
    pub albums_count: u64,
    /// Tracks whose album was released inside the window
    pub tracks_count: u64,
    pub users_count: u64,
    /// Events whose local year falls inside the window
    pub events_count: u64,
    /// Organic events over events with a known organic flag, None when no flag is known
    pub organic_share: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EventTypeCount {
    pub id: i64,
    pub code: String,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TopTrack {
    pub artist: String,
    pub title: String,
    pub listen_count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecentEvent {
    pub ts: i64,
    pub user: String,
    pub event_type: String,
    pub artist: String,
    pub track: String,
    pub is_organic: Option<bool>,
}

/// Everything the dashboard shows, computed in one go.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub summary: WindowSummary,
    pub events_by_type: Vec<EventTypeCount>,
    pub top_tracks: Vec<TopTrack>,
    pub events_by_year: Vec<YearCount>,
    pub recent_events: Vec<RecentEvent>,
}
