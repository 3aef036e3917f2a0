//! GitLab implementation of [`Provider`].

use std::collections::HashMap;

use async_trait::async_trait;
use regex_lite::Regex;
use tracing::{debug, info, warn};

use super::{CreateReleaseConfig, PROVIDER_VERSION, Provider, RawCommit, Release, RepositoryInfo};
use crate::config::{ConnectionDescriptor, EnvSource, ProcessEnv};
use crate::error::{ConfigError, ProviderError};
use crate::gitlab::{CreateReleaseOptions, GitLabClient, Visibility};
use crate::version::{canonical_version, tag_name};

/// Items requested per page from paginated endpoints.
pub const PER_PAGE: u32 = 100;

/// A GitLab project exposed as a release provider.
#[derive(Debug)]
pub struct GitLabRepository {
    descriptor: ConnectionDescriptor,
    client: GitLabClient,
}

impl GitLabRepository {
    /// Initialize from the host's configuration map and the process environment.
    pub fn new(config: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::with_env(config, &ProcessEnv)
    }

    /// Initialize from the host's configuration map with an explicit fallback source.
    pub fn with_env(
        config: &HashMap<String, String>,
        env: &impl EnvSource,
    ) -> Result<Self, ConfigError> {
        let descriptor = ConnectionDescriptor::resolve(config, env)?;
        Self::from_descriptor(descriptor)
    }

    /// Build the API client for an already resolved descriptor.
    pub fn from_descriptor(descriptor: ConnectionDescriptor) -> Result<Self, ConfigError> {
        let client = GitLabClient::new(&descriptor.base_url, &descriptor.token)
            .map_err(ConfigError::ClientCreation)?;

        info!(
            base_url = %client.base_url(),
            project_id = %descriptor.project_id,
            "Initialized GitLab provider"
        );

        Ok(Self { descriptor, client })
    }

    pub fn project_id(&self) -> &str {
        &self.descriptor.project_id
    }

    /// Branch from `gitlab_branch` / `CI_COMMIT_BRANCH`, if any.
    pub fn branch(&self) -> Option<&str> {
        self.descriptor.branch.as_deref()
    }

    pub fn strip_v_tag_prefix(&self) -> bool {
        self.descriptor.strip_v_tag_prefix
    }
}

#[async_trait]
impl Provider for GitLabRepository {
    async fn get_info(&self) -> Result<RepositoryInfo, ProviderError> {
        let project = self.client.get_project(self.project_id()).await?;
        debug!(id = project.id, visibility = ?project.visibility, "Fetched project");

        Ok(RepositoryInfo {
            owner: String::new(),
            repo: String::new(),
            default_branch: project.default_branch.unwrap_or_default(),
            private: project.visibility == Visibility::Private,
        })
    }

    async fn get_commits(
        &self,
        from_sha: &str,
        to_sha: &str,
    ) -> Result<Vec<RawCommit>, ProviderError> {
        // GitLab returns reverse chronological order whichever side is "from".
        let ref_name = format!("{from_sha}...{to_sha}");
        let mut all_commits = Vec::new();
        let mut page = 1;

        loop {
            let result = self
                .client
                .list_commits(self.project_id(), &ref_name, page, PER_PAGE)
                .await?;

            debug!(
                page,
                items = result.items.len(),
                next_page = result.info.next_page,
                total_pages = result.info.total_pages,
                "Fetched commit page"
            );

            all_commits.extend(result.items.into_iter().map(|commit| RawCommit {
                sha: commit.id,
                raw_message: commit.message,
            }));

            // X-Total-Pages is unreliable for commit listings on some GitLab
            // versions, so only X-Next-Page ends the walk.
            if result.info.next_page == 0 {
                break;
            }

            page = result.info.next_page;
        }

        Ok(all_commits)
    }

    async fn get_releases(&self, pattern: &str) -> Result<Vec<Release>, ProviderError> {
        let filter = if pattern.is_empty() {
            None
        } else {
            Some(
                Regex::new(pattern).map_err(|source| ProviderError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?,
            )
        };

        let mut all_releases = Vec::new();
        let mut page = 1;

        loop {
            let result = self
                .client
                .list_tags(self.project_id(), page, PER_PAGE)
                .await?;

            debug!(
                page,
                items = result.items.len(),
                current_page = result.info.current_page,
                total_pages = result.info.total_pages,
                "Fetched tag page"
            );

            for tag in result.items {
                if filter.as_ref().is_some_and(|re| !re.is_match(&tag.name)) {
                    continue;
                }

                let Some(version) = canonical_version(&tag.name) else {
                    debug!(tag = %tag.name, "Skipping tag that is not a semantic version");
                    continue;
                };

                all_releases.push(Release {
                    sha: tag.commit.id,
                    version,
                });
            }

            if result.info.current_page >= result.info.total_pages {
                break;
            }

            let next_page = if result.info.next_page > 0 {
                result.info.next_page
            } else {
                result.info.current_page + 1
            };

            // Missing page headers must not send us back to a page we already read.
            if next_page <= page {
                warn!(
                    page,
                    next_page,
                    total_pages = result.info.total_pages,
                    "Tag pagination did not advance, stopping"
                );
                break;
            }

            page = next_page;
        }

        Ok(all_releases)
    }

    async fn create_release(&self, release: &CreateReleaseConfig) -> Result<(), ProviderError> {
        let tag = tag_name(&release.new_version, self.descriptor.strip_v_tag_prefix);

        // GitLab releases have no pre-release flag; `release.prerelease` is ignored.
        let options = CreateReleaseOptions {
            tag_name: &tag,
            git_ref: &release.sha,
            description: &release.changelog,
        };

        let created = self.client.create_release(self.project_id(), &options).await?;
        info!(tag = %created.tag_name, sha = %release.sha, "Created GitLab release");

        Ok(())
    }

    fn name(&self) -> &'static str {
        "GitLab"
    }

    fn version(&self) -> &'static str {
        PROVIDER_VERSION
    }
}
