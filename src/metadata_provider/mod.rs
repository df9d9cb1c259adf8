//! Lookup of song details on the external music metadata service.

mod client;

pub use client::MetadataProviderClient;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Date format the metadata service uses for `releaseDate`, e.g. `16.07.2006`.
pub const PROVIDER_DATE_FORMAT: &str = "%d.%m.%Y";

/// Song details as returned by the metadata service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SongDetail {
    pub release_date: String,
    pub text: String,
    pub link: String,
}

#[derive(Debug, Error)]
pub enum MetadataProviderError {
    #[error("metadata request failed: {0}")]
    Request(String),

    #[error("metadata service returned status {0}")]
    Status(u16),

    #[error("metadata response could not be decoded: {0}")]
    InvalidResponse(String),
}

impl MetadataProviderError {
    /// True when the service answered but the body did not match the expected schema.
    pub fn is_invalid_response(&self) -> bool {
        matches!(self, MetadataProviderError::InvalidResponse(_))
    }
}

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetches the details of the song identified by group name and title.
    /// A single attempt is made, failures are never retried.
    async fn lookup(&self, group: &str, title: &str) -> Result<SongDetail, MetadataProviderError>;
}
