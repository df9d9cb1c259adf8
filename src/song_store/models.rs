use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A song in the catalog.
///
/// `group` and `title` are the key used to look the song up on the metadata
/// provider, they are never empty once a song is stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub group: String,
    #[serde(rename = "song")]
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub text: String,
    pub link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Song {
    /// Builds a song with a fresh id and both timestamps set to now.
    pub fn new(group: impl Into<String>, title: impl Into<String>) -> Self {
        let now = now_timestamp();
        Song {
            id: uuid::Uuid::new_v4().to_string(),
            group: group.into(),
            title: title.into(),
            release_date: None,
            text: String::new(),
            link: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Current time truncated to the precision timestamps are persisted with,
/// so that a stored song compares equal to the one that was written.
pub fn now_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Lowercased form of a group or title used for case-insensitive matching.
pub fn search_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Filter for song listings. Each field is a case-insensitive substring match;
/// a missing or blank field matches every song.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongFilter {
    pub group: Option<String>,
    pub title: Option<String>,
}

impl SongFilter {
    pub fn group_key(&self) -> Option<String> {
        Self::key_of(&self.group)
    }

    pub fn title_key(&self) -> Option<String> {
        Self::key_of(&self.title)
    }

    fn key_of(field: &Option<String>) -> Option<String> {
        field
            .as_deref()
            .map(search_key)
            .filter(|key| !key.is_empty())
    }
}

/// One window of a filtered listing, `total` counts every match regardless of the window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongListPage {
    pub songs: Vec<Song>,
    pub total: usize,
}
