//! Page requests for listings and lyrics.
//!
//! Pages are 1-indexed. Values below 1 fall back to the defaults instead of being
//! rejected, and limits are capped at [`MAX_PAGE_LIMIT`].

use thiserror::Error;

pub const MAX_PAGE_LIMIT: usize = 100;

pub const DEFAULT_LIST_LIMIT: usize = 10;
pub const DEFAULT_LYRICS_LIMIT: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {name} parameter: {value:?}")]
pub struct PageParamError {
    pub name: &'static str,
    pub value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64, default_limit: usize) -> Self {
        let page = usize::try_from(page).ok().filter(|p| *p >= 1).unwrap_or(1);
        let limit = usize::try_from(limit)
            .ok()
            .filter(|l| *l >= 1)
            .unwrap_or(default_limit)
            .min(MAX_PAGE_LIMIT);
        PageRequest { page, limit }
    }

    /// Parses query parameters, rejecting values that are not integers.
    /// Absent or blank parameters use the defaults.
    pub fn parse_strict(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: usize,
    ) -> Result<Self, PageParamError> {
        let page = parse_param("page", page)?.unwrap_or(1);
        let limit = parse_param("limit", limit)?.unwrap_or(default_limit as i64);
        Ok(Self::new(page, limit, default_limit))
    }

    /// Parses query parameters, falling back to the defaults for anything unparsable.
    pub fn parse_lenient(page: Option<&str>, limit: Option<&str>, default_limit: usize) -> Self {
        let page = parse_param("page", page).ok().flatten().unwrap_or(1);
        let limit = parse_param("limit", limit)
            .ok()
            .flatten()
            .unwrap_or(default_limit as i64);
        Self::new(page, limit, default_limit)
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_param(name: &'static str, value: Option<&str>) -> Result<Option<i64>, PageParamError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| PageParamError {
            name,
            value: raw.to_string(),
        }),
    }
}
