//! GitLab API access using reqwest.

pub mod client;
pub mod types;

pub use client::{DEFAULT_BASE_URL, GitLabClient, normalize_base_url};
pub use types::{Commit, CreateReleaseOptions, Page, PageInfo, Project, Tag, Visibility};
