//! semrel-provider-gitlab - GitLab repository provider for semantic release automation.
//!
//! # Overview
//!
//! The provider reads commit ranges and semver tags from a GitLab project and
//! publishes new releases. Deciding what the next version is, and what goes
//! into the changelog, is left to the host driving the [`Provider`] trait.

pub mod config;
pub mod error;
pub mod gitlab;
pub mod provider;
pub mod version;

// Re-export commonly used types
pub use config::{ConnectionDescriptor, EnvSource, ProcessEnv};
pub use error::{ConfigError, GitLabError, ProviderError};
pub use provider::{
    CreateReleaseConfig, GitLabRepository, PROVIDER_VERSION, Provider, RawCommit, Release,
    RepositoryInfo,
};
