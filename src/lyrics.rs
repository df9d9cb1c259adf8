//! Splitting of song lyrics into verses and paging over them.
//!
//! A verse is a run of text delimited by a blank line. Joining every page in
//! order with [`VERSE_SEPARATOR`] gives back the original text unchanged.

use thiserror::Error;

pub const VERSE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginateError {
    #[error("page and page size must be at least 1 (page {page}, page size {page_size})")]
    InvalidPageRequest { page: usize, page_size: usize },

    #[error("page {page} is out of range for {total} verses")]
    PageOutOfRange { page: usize, total: usize },
}

#[derive(Debug, PartialEq, Eq)]
pub struct VersePage<'a> {
    pub verses: Vec<&'a str>,
    pub total: usize,
}

impl VersePage<'_> {
    pub fn text(&self) -> String {
        self.verses.join(VERSE_SEPARATOR)
    }
}

/// Splits lyrics into verses. Empty text has no verses.
pub fn split_verses(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(VERSE_SEPARATOR).collect()
}

pub fn verse_count(text: &str) -> usize {
    split_verses(text).len()
}

pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Returns the verses of `page` (1-indexed), at most `page_size` of them.
///
/// A page whose first verse would be at or past the end of the lyrics is out of
/// range, so every page of empty lyrics is out of range too.
pub fn paginate(text: &str, page: usize, page_size: usize) -> Result<VersePage<'_>, PaginateError> {
    if page == 0 || page_size == 0 {
        return Err(PaginateError::InvalidPageRequest { page, page_size });
    }

    let verses = split_verses(text);
    let total = verses.len();

    let offset = (page - 1).saturating_mul(page_size);
    if offset >= total {
        return Err(PaginateError::PageOutOfRange { page, total });
    }
    let end = offset.saturating_add(page_size).min(total);

    Ok(VersePage {
        verses: verses[offset..end].to_vec(),
        total,
    })
}
