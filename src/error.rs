//! Error types for the GitLab provider using thiserror.

use thiserror::Error;

/// Errors raised while resolving configuration into a connection descriptor.
///
/// All of these are fatal: no provider instance exists when one is returned.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("gitlab token missing: set the `token` option or the GITLAB_TOKEN environment variable")]
    MissingToken,

    #[error(
        "gitlab_projectid is required: set the `gitlab_projectid` option or the CI_PROJECT_ID environment variable"
    )]
    MissingProjectId,

    #[error("failed to set property strip_v_tag_prefix: invalid boolean literal '{0}'")]
    InvalidStripVTagPrefix(String),

    #[error("failed to create client: {0}")]
    ClientCreation(#[source] GitLabError),
}

/// Errors from GitLab API operations.
#[derive(Error, Debug)]
pub enum GitLabError {
    #[error("invalid GitLab base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("{method} {url}: request failed: {source}")]
    Request {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url}: {status} {message}")]
    Api {
        method: String,
        url: String,
        status: u16,
        message: String,
    },

    #[error("{method} {url}: failed to decode response: {source}")]
    Decode {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl GitLabError {
    /// HTTP status returned by the remote, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request { source, .. } | Self::Decode { source, .. } => {
                source.status().map(|s| s.as_u16())
            }
            _ => None,
        }
    }
}

/// Errors returned by provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    GitLab(#[from] GitLabError),

    #[error("invalid release pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },
}
