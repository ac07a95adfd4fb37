//! SQLite schema definitions for the listening database.
//!
//! Primary keys are integer surrogate ids. Dedup keys (artist name, album
//! artist+title, track external id, user external id, event type code) are
//! enforced with UNIQUE constraints so the storage layer rejects duplicates
//! even if a caller skips the lookup.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, ForeignKey, SqlType, Table, VersionedSchema};

const ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "id",
};

const ALBUM_FK: ForeignKey = ForeignKey {
    foreign_table: "albums",
    foreign_column: "id",
};

const TRACK_FK: ForeignKey = ForeignKey {
    foreign_table: "tracks",
    foreign_column: "id",
};

const USER_FK: ForeignKey = ForeignKey {
    foreign_table: "users",
    foreign_column: "id",
};

const EVENT_TYPE_FK: ForeignKey = ForeignKey {
    foreign_table: "event_types",
    foreign_column: "id",
};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["name"]],
};

const ALBUMS_TABLE: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FK)
        ),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("release_year", &SqlType::Integer), // NULL when unknown
    ],
    indices: &[("idx_albums_artist", "artist_id")],
    unique_constraints: &[&["artist_id", "title"]],
};

const TRACKS_TABLE: Table = Table {
    name: "tracks",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "album_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ALBUM_FK)
        ),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("external_track_id", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_tracks_album", "album_id")],
    unique_constraints: &[&["external_track_id"]],
};

const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("external_user_id", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["external_user_id"]],
};

const EVENT_TYPES_TABLE: Table = Table {
    name: "event_types",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("code", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["code"]],
};

const EVENTS_TABLE: Table = Table {
    name: "events",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("ts", &SqlType::Integer, non_null = true), // unix seconds
        sqlite_column!("date", &SqlType::Integer, non_null = true), // local YYYYMMDD
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!(
            "track_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&TRACK_FK)
        ),
        sqlite_column!(
            "event_type_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&EVENT_TYPE_FK)
        ),
        sqlite_column!("is_organic", &SqlType::Integer), // NULL when unknown
    ],
    indices: &[("idx_events_track", "track_id"), ("idx_events_date", "date")],
    unique_constraints: &[],
};

pub const LISTEN_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        ARTISTS_TABLE,
        ALBUMS_TABLE,
        TRACKS_TABLE,
        USERS_TABLE,
        EVENT_TYPES_TABLE,
        EVENTS_TABLE,
    ],
}];

/// Tables in deletion order: every table comes before the tables it references.
pub const TABLES_CHILD_FIRST: &[&str] = &[
    "events",
    "tracks",
    "albums",
    "artists",
    "users",
    "event_types",
];
