mod models;
mod schema;
mod sqlite_song_store;

pub use models::{now_timestamp, search_key, Song, SongFilter, SongListPage};
pub use schema::SONG_SCHEMA;
pub use sqlite_song_store::SqliteSongStore;

use anyhow::Result;

pub trait SongStore: Send + Sync {
    /// Inserts a new song. Fails if a song with the same id already exists.
    fn create_song(&self, song: &Song) -> Result<()>;

    /// Returns the song with the given id.
    /// Returns Ok(None) if the song does not exist.
    /// Returns Err if there is a database error.
    fn get_song(&self, id: &str) -> Result<Option<Song>>;

    /// Replaces every stored field of the song except its id and creation time.
    /// Returns Ok(false) if the song does not exist.
    fn update_song(&self, song: &Song) -> Result<bool>;

    /// Deletes the song with the given id.
    /// Returns Ok(false) if the song does not exist.
    fn delete_song(&self, id: &str) -> Result<bool>;

    /// Returns the songs matching the filter within the `offset`/`limit` window,
    /// along with the total number of matches.
    fn list_songs(&self, filter: &SongFilter, offset: usize, limit: usize)
        -> Result<SongListPage>;

    /// Returns the number of stored songs.
    fn count_songs(&self) -> Result<usize>;
}
