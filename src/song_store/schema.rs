//! SQLite schema for the song database.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

/// Songs table. `group_key` and `title_key` hold lowercased copies of
/// `group_name` and `title` and are what listing filters match against.
const SONGS_TABLE_V1: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("group_name", &SqlType::Text, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("group_key", &SqlType::Text, non_null = true),
        sqlite_column!("title_key", &SqlType::Text, non_null = true),
        sqlite_column!("release_date", &SqlType::Text),
        sqlite_column!(
            "lyrics",
            &SqlType::Text,
            non_null = true,
            default_value = Some("''")
        ),
        sqlite_column!(
            "link",
            &SqlType::Text,
            non_null = true,
            default_value = Some("''")
        ),
        sqlite_column!("created_at", &SqlType::Text, non_null = true),
        sqlite_column!("updated_at", &SqlType::Text, non_null = true),
    ],
    indices: &[
        ("idx_songs_group_key", "group_key"),
        ("idx_songs_title_key", "title_key"),
        ("idx_songs_created_at", "created_at, id"),
    ],
};

pub const SONG_SCHEMA: VersionedSchema = VersionedSchema {
    version: 1,
    tables: &[SONGS_TABLE_V1],
};
