//! Pagination state types
//!
//! Each endpoint instance owns one [`PaginationState`]: the next/previous/last
//! URLs from the most recent list response and the total item count.

use super::link_header::parse_link_headers;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Pagination relation followed by page requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rel {
    Next,
    Previous,
    Last,
}

impl Rel {
    /// All tracked relations
    pub const ALL: [Rel; 3] = [Rel::Next, Rel::Previous, Rel::Last];

    /// Relation name as it appears in a Link header
    pub fn as_str(self) -> &'static str {
        match self {
            Rel::Next => "next",
            Rel::Previous => "previous",
            Rel::Last => "last",
        }
    }
}

impl fmt::Display for Rel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "next" => Ok(Rel::Next),
            "previous" | "prev" => Ok(Rel::Previous),
            "last" => Ok(Rel::Last),
            _ => Err(()),
        }
    }
}

/// URLs for the pages adjacent to the last list response
///
/// `None` means the relation is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    pub next: Option<String>,
    pub previous: Option<String>,
    pub last: Option<String>,
}

impl PaginationLinks {
    /// Create links with every relation absent
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the URL for a relation
    pub fn get(&self, rel: Rel) -> Option<&str> {
        match rel {
            Rel::Next => self.next.as_deref(),
            Rel::Previous => self.previous.as_deref(),
            Rel::Last => self.last.as_deref(),
        }
    }

    /// Set the URL for a relation
    pub fn set(&mut self, rel: Rel, url: Option<String>) {
        match rel {
            Rel::Next => self.next = url,
            Rel::Previous => self.previous = url,
            Rel::Last => self.last = url,
        }
    }

    /// Mark every relation absent
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when no relation is present
    pub fn is_empty(&self) -> bool {
        self.next.is_none() && self.previous.is_none() && self.last.is_none()
    }

    /// Build links from response headers
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut links = Self::new();
        for (rel, url) in parse_link_headers(headers) {
            if let Ok(rel) = rel.parse::<Rel>() {
                // First occurrence of a relation wins.
                if links.get(rel).is_none() {
                    links.set(rel, Some(url));
                }
            }
        }
        links
    }
}

/// Mutable pagination state of one endpoint instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Total items reported by the last list response
    pub count: u64,
    /// Adjacent page URLs
    pub links: PaginationLinks,
}

impl PaginationState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a list response's headers
    ///
    /// Every relation is replaced by the parsed URL or cleared. The count is
    /// replaced only when `count_header` is present and parses as an integer.
    /// Applying the same headers twice yields the same state.
    pub fn update_from_headers(&mut self, headers: &HeaderMap, count_header: &str) {
        self.links = PaginationLinks::from_headers(headers);

        if let Some(raw) = headers.get(count_header) {
            match raw.to_str().ok().and_then(|v| v.trim().parse::<u64>().ok()) {
                Some(count) => self.count = count,
                None => warn!("Ignoring unparseable {} header: {:?}", count_header, raw),
            }
        }

        debug!(
            count = self.count,
            next = self.links.next.is_some(),
            previous = self.links.previous.is_some(),
            last = self.links.last.is_some(),
            "Pagination updated"
        );
    }

    /// Clear every relation, leaving the count untouched
    pub fn reset_links(&mut self) {
        self.links.clear();
    }
}
