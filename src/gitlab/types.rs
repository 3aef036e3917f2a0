//! GitLab REST API payloads (only the fields the provider reads).

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// Project visibility level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Internal,
    Public,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: u64,
    /// Null for projects without any branch yet.
    #[serde(default)]
    pub default_branch: Option<String>,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagCommit {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub name: String,
    pub commit: TagCommit,
}

/// Body for `POST /projects/:id/releases`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReleaseOptions<'a> {
    pub tag_name: &'a str,
    #[serde(rename = "ref")]
    pub git_ref: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedRelease {
    pub tag_name: String,
}

/// Pagination metadata from GitLab's `X-*` response headers.
///
/// Missing or empty headers read as 0, which is what GitLab sends for the
/// last page's `X-Next-Page` and, on large collections, for `X-Total-Pages`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: u32,
    pub per_page: u32,
    pub total_items: u32,
    pub total_pages: u32,
    pub next_page: u32,
    pub prev_page: u32,
}

impl PageInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| -> u32 {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0)
        };

        Self {
            current_page: read("x-page"),
            per_page: read("x-per-page"),
            total_items: read("x-total"),
            total_pages: read("x-total-pages"),
            next_page: read("x-next-page"),
            prev_page: read("x-prev-page"),
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}
