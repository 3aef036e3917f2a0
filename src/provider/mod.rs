//! Host-facing provider interface.
//!
//! A release-automation host drives a [`Provider`] to read commit history and
//! existing releases, then publish the next one. The host owns commit
//! classification, version bumping and changelog rendering.

pub mod gitlab;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

pub use gitlab::GitLabRepository;

/// Build version of this provider, overridable at compile time.
pub const PROVIDER_VERSION: &str = match option_env!("PROVIDER_GITLAB_VERSION") {
    Some(version) => version,
    None => "dev",
};

/// Snapshot of remote project metadata.
///
/// `owner` and `repo` are always empty: GitLab addresses projects by id or
/// full path, not by an owner/name pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub owner: String,
    pub repo: String,
    pub default_branch: String,
    pub private: bool,
}

/// A commit as delivered by the remote, message unparsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCommit {
    pub sha: String,
    pub raw_message: String,
}

/// An existing release: the tagged commit and the tag's canonical version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub sha: String,
    pub version: String,
}

/// Request to publish a new release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReleaseConfig {
    pub new_version: String,
    pub sha: String,
    pub changelog: String,
    /// Not every forge can flag pre-releases; providers may ignore this.
    #[serde(default)]
    pub prerelease: bool,
}

/// Repository operations a release host needs from a forge.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Fetch default branch and visibility.
    async fn get_info(&self) -> Result<RepositoryInfo, ProviderError>;

    /// Every commit in `from_sha...to_sha`, in the order the remote returns them.
    async fn get_commits(
        &self,
        from_sha: &str,
        to_sha: &str,
    ) -> Result<Vec<RawCommit>, ProviderError>;

    /// Every tag that matches `pattern` (all tags when empty) and parses as a
    /// semantic version.
    async fn get_releases(&self, pattern: &str) -> Result<Vec<Release>, ProviderError>;

    /// Publish a release for `release.new_version` at `release.sha`.
    async fn create_release(&self, release: &CreateReleaseConfig) -> Result<(), ProviderError>;

    fn name(&self) -> &'static str;

    fn version(&self) -> &'static str;
}
