//! Configuration resolution.
//!
//! Resolution order per field:
//! 1. Explicit value from the host's configuration map (if non-empty)
//! 2. Fixed environment variable fallback (if non-empty)
//! 3. Default, or [`ConfigError`] for required fields

use std::collections::HashMap;

use crate::error::ConfigError;

pub const BASE_URL_KEY: &str = "gitlab_baseurl";
pub const TOKEN_KEY: &str = "token";
pub const BRANCH_KEY: &str = "gitlab_branch";
pub const PROJECT_ID_KEY: &str = "gitlab_projectid";
pub const STRIP_V_TAG_PREFIX_KEY: &str = "strip_v_tag_prefix";

pub const BASE_URL_ENV: &str = "CI_SERVER_URL";
pub const TOKEN_ENV: &str = "GITLAB_TOKEN";
pub const BRANCH_ENV: &str = "CI_COMMIT_BRANCH";
pub const PROJECT_ID_ENV: &str = "CI_PROJECT_ID";

/// A source of environment-style fallback values.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Validated connection settings for one provider instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    /// Empty means the public gitlab.com API.
    pub base_url: String,
    pub token: String,
    pub project_id: String,
    pub branch: Option<String>,
    pub strip_v_tag_prefix: bool,
}

impl ConnectionDescriptor {
    /// Resolve a descriptor from the host configuration map, falling back to `env`.
    pub fn resolve(
        config: &HashMap<String, String>,
        env: &impl EnvSource,
    ) -> Result<Self, ConfigError> {
        let base_url = lookup(config, BASE_URL_KEY, env, BASE_URL_ENV).unwrap_or_default();

        let token = lookup(config, TOKEN_KEY, env, TOKEN_ENV).ok_or(ConfigError::MissingToken)?;

        let branch = lookup(config, BRANCH_KEY, env, BRANCH_ENV);

        let project_id = lookup(config, PROJECT_ID_KEY, env, PROJECT_ID_ENV)
            .ok_or(ConfigError::MissingProjectId)?;

        // No environment fallback for this one. Absent means false, but a
        // value that is present must be a valid literal.
        let strip_v_tag_prefix = match non_empty(config.get(STRIP_V_TAG_PREFIX_KEY).cloned()) {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidStripVTagPrefix(raw))?,
            None => false,
        };

        Ok(Self {
            base_url,
            token,
            project_id,
            branch,
            strip_v_tag_prefix,
        })
    }
}

fn lookup(
    config: &HashMap<String, String>,
    key: &str,
    env: &impl EnvSource,
    env_key: &str,
) -> Option<String> {
    non_empty(config.get(key).cloned()).or_else(|| non_empty(env.var(env_key)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parse a boolean literal.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false counterparts
/// `0`, `f`, `F`, `FALSE`, `false`, `False`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
