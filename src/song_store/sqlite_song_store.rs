use super::models::{search_key, Song, SongFilter, SongListPage};
use super::schema::SONG_SCHEMA;
use super::SongStore;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

const SONG_COLUMNS: &str =
    "id, group_name, title, release_date, lyrics, link, created_at, updated_at";

const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteSongStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSongStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let mut conn = Connection::open(path)
            .with_context(|| format!("Failed to open song database at {:?}", path))?;

        if SONG_SCHEMA.open_or_validate(&mut conn)? {
            info!("Created song database schema at {:?}", path);
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Song database connection lock is poisoned"))
    }

    fn format_timestamp(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn parse_timestamp(column: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
    }

    fn row_to_song(row: &rusqlite::Row) -> rusqlite::Result<Song> {
        let release_date: Option<String> = row.get(3)?;
        let release_date = match release_date {
            Some(s) => Some(NaiveDate::parse_from_str(&s, RELEASE_DATE_FORMAT).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
            })?),
            None => None,
        };
        let created_at: String = row.get(6)?;
        let updated_at: String = row.get(7)?;

        Ok(Song {
            id: row.get(0)?,
            group: row.get(1)?,
            title: row.get(2)?,
            release_date,
            text: row.get(4)?,
            link: row.get(5)?,
            created_at: Self::parse_timestamp(6, &created_at)?,
            updated_at: Self::parse_timestamp(7, &updated_at)?,
        })
    }

    /// Builds the WHERE clause for a filter. Column names come from this fixed
    /// list only; user input is always bound as a parameter.
    fn filter_clause(filter: &SongFilter) -> (String, Vec<Value>) {
        let mut clauses = Vec::new();
        let mut args = Vec::new();
        for (column, key) in [
            ("group_key", filter.group_key()),
            ("title_key", filter.title_key()),
        ] {
            if let Some(key) = key {
                args.push(Value::Text(key));
                clauses.push(format!("instr({}, ?{}) > 0", column, args.len()));
            }
        }

        if clauses.is_empty() {
            (String::new(), args)
        } else {
            (format!(" WHERE {}", clauses.join(" AND ")), args)
        }
    }
}

impl SongStore for SqliteSongStore {
    fn create_song(&self, song: &Song) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO songs (id, group_name, title, group_key, title_key, release_date, lyrics, link, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                song.id,
                song.group,
                song.title,
                search_key(&song.group),
                search_key(&song.title),
                song.release_date
                    .map(|d| d.format(RELEASE_DATE_FORMAT).to_string()),
                song.text,
                song.link,
                Self::format_timestamp(&song.created_at),
                Self::format_timestamp(&song.updated_at),
            ],
        )
        .with_context(|| format!("Failed to insert song {}", song.id))?;
        Ok(())
    }

    fn get_song(&self, id: &str) -> Result<Option<Song>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM songs WHERE id = ?1", SONG_COLUMNS))?;
        let song = stmt.query_row(params![id], Self::row_to_song).optional()?;
        Ok(song)
    }

    fn update_song(&self, song: &Song) -> Result<bool> {
        let conn = self.conn()?;
        let updated = conn
            .execute(
                "UPDATE songs SET group_name = ?2, title = ?3, group_key = ?4, title_key = ?5,
                    release_date = ?6, lyrics = ?7, link = ?8, updated_at = ?9
                 WHERE id = ?1",
                params![
                    song.id,
                    song.group,
                    song.title,
                    search_key(&song.group),
                    search_key(&song.title),
                    song.release_date
                        .map(|d| d.format(RELEASE_DATE_FORMAT).to_string()),
                    song.text,
                    song.link,
                    Self::format_timestamp(&song.updated_at),
                ],
            )
            .with_context(|| format!("Failed to update song {}", song.id))?;
        Ok(updated > 0)
    }

    fn delete_song(&self, id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM songs WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    fn list_songs(&self, filter: &SongFilter, offset: usize, limit: usize) -> Result<SongListPage> {
        let conn = self.conn()?;
        let (where_sql, mut args) = Self::filter_clause(filter);

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM songs{}", where_sql),
            params_from_iter(args.iter()),
            |row| row.get(0),
        )?;

        let limit_index = args.len() + 1;
        args.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        args.push(Value::Integer(i64::try_from(offset).unwrap_or(i64::MAX)));

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM songs{} ORDER BY created_at ASC, id ASC LIMIT ?{} OFFSET ?{}",
            SONG_COLUMNS,
            where_sql,
            limit_index,
            limit_index + 1
        ))?;
        let songs = stmt
            .query_map(params_from_iter(args.iter()), Self::row_to_song)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(SongListPage {
            songs,
            total: total as usize,
        })
    }

    fn count_songs(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
