//! Song use cases: enriched creation, partial updates, listing and lyrics paging.
//!
//! Creation fails as a whole when the metadata lookup fails: nothing is written
//! unless the provider answered with a decodable body.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Instrument, Span};

use crate::lyrics::{self, PaginateError};
use crate::metadata_provider::{MetadataProvider, MetadataProviderError, PROVIDER_DATE_FORMAT};
use crate::pagination::PageRequest;
use crate::server::metrics;
use crate::song_store::{now_timestamp, Song, SongFilter, SongListPage, SongStore};

#[derive(Debug, Error)]
pub enum SongServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("song {0} not found")]
    NotFound(String),

    #[error("metadata lookup failed: {0}")]
    ExternalLookupFailed(#[source] MetadataProviderError),

    #[error("metadata response is invalid: {0}")]
    ExternalResponseInvalid(#[source] MetadataProviderError),

    #[error("storage failure: {0:#}")]
    StorageFailure(#[source] anyhow::Error),

    #[error("page {page} is out of range for {total} verses")]
    PageOutOfRange { page: usize, total: usize },

    #[error("request was cancelled")]
    Cancelled,
}

impl From<MetadataProviderError> for SongServiceError {
    fn from(err: MetadataProviderError) -> Self {
        if err.is_invalid_response() {
            SongServiceError::ExternalResponseInvalid(err)
        } else {
            SongServiceError::ExternalLookupFailed(err)
        }
    }
}

impl From<anyhow::Error> for SongServiceError {
    fn from(err: anyhow::Error) -> Self {
        SongServiceError::StorageFailure(err)
    }
}

pub type SongServiceResult<T> = Result<T, SongServiceError>;

/// Partial update of a song: only non-empty fields replace stored values.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SongUpdate {
    pub group: Option<String>,
    #[serde(rename = "song")]
    pub title: Option<String>,
    /// `YYYY-MM-DD` or `DD.MM.YYYY`.
    pub release_date: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongLyrics {
    pub song_id: String,
    pub verses: Vec<String>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Parses a release date in the metadata service format, `None` if it does not match.
pub fn parse_provider_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), PROVIDER_DATE_FORMAT).ok()
}

fn parse_update_date(value: &str) -> SongServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_provider_date(value))
        .ok_or_else(|| SongServiceError::InvalidInput(format!("invalid release date {:?}", value)))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn require(name: &str, value: &str) -> SongServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SongServiceError::InvalidInput(format!("{} must not be empty", name)));
    }
    Ok(trimmed.to_string())
}

pub struct SongService {
    store: Arc<dyn SongStore>,
    metadata_provider: Arc<dyn MetadataProvider>,
    span: Span,
}

impl SongService {
    /// `span` is the logging context every operation of this service runs in.
    pub fn new(
        store: Arc<dyn SongStore>,
        metadata_provider: Arc<dyn MetadataProvider>,
        span: Span,
    ) -> Self {
        Self {
            store,
            metadata_provider,
            span,
        }
    }

    /// Creates a song enriched with the metadata service's details.
    pub async fn add_song(&self, group: &str, title: &str) -> SongServiceResult<Song> {
        self.add_song_cancellable(group, title, &CancellationToken::new())
            .await
    }

    /// Like [`SongService::add_song`], abandoning the lookup without writing
    /// anything if `cancel` fires first.
    pub async fn add_song_cancellable(
        &self,
        group: &str,
        title: &str,
        cancel: &CancellationToken,
    ) -> SongServiceResult<Song> {
        let group = require("group", group)?;
        let title = require("song", title)?;

        self.enrich_and_create(group, title, cancel)
            .instrument(self.span.clone())
            .await
    }

    async fn enrich_and_create(
        &self,
        group: String,
        title: String,
        cancel: &CancellationToken,
    ) -> SongServiceResult<Song> {
        let lookup = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                metrics::record_enrichment_lookup("cancelled");
                info!("Lookup of \"{}\" by \"{}\" cancelled", title, group);
                return Err(SongServiceError::Cancelled);
            }
            lookup = self.metadata_provider.lookup(&group, &title) => lookup,
        };

        let detail = match lookup {
            Ok(detail) => {
                metrics::record_enrichment_lookup("success");
                detail
            }
            Err(err) => {
                metrics::record_enrichment_lookup(if err.is_invalid_response() {
                    "invalid_response"
                } else {
                    "failed"
                });
                warn!("Lookup of \"{}\" by \"{}\" failed: {}", title, group, err);
                return Err(err.into());
            }
        };

        let release_date = parse_provider_date(&detail.release_date);
        if release_date.is_none() && !detail.release_date.is_empty() {
            warn!(
                "Ignoring unparsable release date {:?} for \"{}\" by \"{}\"",
                detail.release_date, title, group
            );
        }

        let mut song = Song::new(group, title);
        song.release_date = release_date;
        song.text = detail.text;
        song.link = detail.link;

        self.store.create_song(&song)?;
        metrics::adjust_songs_total(1);
        info!("Created song {} (\"{}\" by \"{}\")", song.id, song.title, song.group);
        Ok(song)
    }

    fn find_song(&self, id: &str) -> SongServiceResult<Song> {
        match self.store.get_song(id)? {
            Some(song) => Ok(song),
            None => {
                debug!("Song {} not found", id);
                Err(SongServiceError::NotFound(id.to_string()))
            }
        }
    }

    pub fn get_song(&self, id: &str) -> SongServiceResult<Song> {
        let _entered = self.span.enter();
        self.find_song(id)
    }

    pub fn list_songs(&self, filter: &SongFilter, page: PageRequest) -> SongServiceResult<SongListPage> {
        let _entered = self.span.enter();
        let songs = self.store.list_songs(filter, page.offset(), page.limit)?;
        debug!(
            "Listed {} of {} songs (page {}, limit {})",
            songs.songs.len(),
            songs.total,
            page.page,
            page.limit
        );
        Ok(songs)
    }

    /// Applies the non-empty fields of `update` to the stored song.
    pub fn update_song(&self, id: &str, update: &SongUpdate) -> SongServiceResult<Song> {
        let _entered = self.span.enter();

        // Validate before touching the store.
        let release_date = non_empty(&update.release_date)
            .map(parse_update_date)
            .transpose()?;

        let mut song = self.find_song(id)?;
        if let Some(group) = non_empty(&update.group) {
            song.group = group.trim().to_string();
        }
        if let Some(title) = non_empty(&update.title) {
            song.title = title.trim().to_string();
        }
        if let Some(release_date) = release_date {
            song.release_date = Some(release_date);
        }
        if let Some(text) = non_empty(&update.text) {
            song.text = text.to_string();
        }
        if let Some(link) = non_empty(&update.link) {
            song.link = link.trim().to_string();
        }
        song.updated_at = now_timestamp();

        if !self.store.update_song(&song)? {
            return Err(SongServiceError::NotFound(id.to_string()));
        }
        info!("Updated song {}", id);
        Ok(song)
    }

    pub fn delete_song(&self, id: &str) -> SongServiceResult<()> {
        let _entered = self.span.enter();
        if !self.store.delete_song(id)? {
            return Err(SongServiceError::NotFound(id.to_string()));
        }
        metrics::adjust_songs_total(-1);
        info!("Deleted song {}", id);
        Ok(())
    }

    pub fn get_song_lyrics(&self, id: &str, page: PageRequest) -> SongServiceResult<SongLyrics> {
        let _entered = self.span.enter();
        let song = self.find_song(id)?;
        let verses = lyrics::paginate(&song.text, page.page, page.limit).map_err(|e| match e {
            PaginateError::PageOutOfRange { page, total } => {
                SongServiceError::PageOutOfRange { page, total }
            }
            PaginateError::InvalidPageRequest { .. } => SongServiceError::InvalidInput(e.to_string()),
        })?;

        Ok(SongLyrics {
            song_id: song.id.clone(),
            verses: verses.verses.iter().map(|v| v.to_string()).collect(),
            page: page.page,
            limit: page.limit,
            total: verses.total,
            total_pages: lyrics::total_pages(verses.total, page.limit),
        })
    }

    pub fn count_songs(&self) -> SongServiceResult<usize> {
        let _entered = self.span.enter();
        Ok(self.store.count_songs()?)
    }
}
