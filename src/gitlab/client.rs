//! Thin GitLab REST client built on reqwest.

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::types::{Commit, CreateReleaseOptions, CreatedRelease, Page, PageInfo, Project, Tag};
use crate::error::GitLabError;

/// API root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://gitlab.com/api/v4/";

const API_VERSION_PATH: &str = "api/v4/";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Authenticated handle to one GitLab instance.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl GitLabClient {
    /// Create a client for `base_url` (empty means gitlab.com).
    pub fn new(base_url: &str, token: &str) -> Result<Self, GitLabError> {
        let base_url = normalize_base_url(base_url)?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(GitLabError::HttpClient)?;

        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /projects/:id`
    pub async fn get_project(&self, project_id: &str) -> Result<Project, GitLabError> {
        let url = self.endpoint(&["projects", project_id])?;
        let response = self.send(Method::GET, url.clone(), |r| r).await?;
        decode(Method::GET, &url, response).await
    }

    /// `GET /projects/:id/repository/commits` for one page.
    pub async fn list_commits(
        &self,
        project_id: &str,
        ref_name: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Commit>, GitLabError> {
        let url = self.endpoint(&["projects", project_id, "repository", "commits"])?;
        let query = [
            ("ref_name", ref_name.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        self.get_page(url, &query).await
    }

    /// `GET /projects/:id/repository/tags` for one page.
    pub async fn list_tags(
        &self,
        project_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Tag>, GitLabError> {
        let url = self.endpoint(&["projects", project_id, "repository", "tags"])?;
        let query = [("page", page.to_string()), ("per_page", per_page.to_string())];
        self.get_page(url, &query).await
    }

    /// `POST /projects/:id/releases`
    pub async fn create_release(
        &self,
        project_id: &str,
        options: &CreateReleaseOptions<'_>,
    ) -> Result<CreatedRelease, GitLabError> {
        let url = self.endpoint(&["projects", project_id, "releases"])?;
        let response = self
            .send(Method::POST, url.clone(), |r| r.json(options))
            .await?;
        decode(Method::POST, &url, response).await
    }

    async fn get_page<T, Q>(&self, url: Url, query: &Q) -> Result<Page<T>, GitLabError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.send(Method::GET, url.clone(), |r| r.query(query)).await?;
        let info = PageInfo::from_headers(response.headers());
        let items = decode(Method::GET, &url, response).await?;
        Ok(Page { items, info })
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        customize: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response, GitLabError> {
        debug!(%method, %url, "GitLab API request");

        let request = self
            .http
            .request(method.clone(), url.clone())
            .header("PRIVATE-TOKEN", &self.token)
            .header("Accept", "application/json");

        let response = customize(request)
            .send()
            .await
            .map_err(|source| GitLabError::Request {
                method: method.to_string(),
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(GitLabError::Api {
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
            message: error_message(&body),
        })
    }

    /// Append path segments to the API root, percent-encoding each one.
    ///
    /// Namespaced project paths like `group/project` become a single
    /// `group%2Fproject` segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GitLabError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GitLabError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn decode<T: DeserializeOwned>(
    method: Method,
    url: &Url,
    response: Response,
) -> Result<T, GitLabError> {
    response.json().await.map_err(|source| GitLabError::Decode {
        method: method.to_string(),
        url: url.to_string(),
        source,
    })
}

/// Pull the human-readable message out of a GitLab error body.
///
/// GitLab uses `{"message": ...}` for most errors and `{"error": ...}` for
/// auth failures; `message` may itself be an object of field errors.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("message")
            .or_else(|| value.get("error"))
            .map(|m| match m.as_str() {
                Some(s) => s.to_string(),
                None => m.to_string(),
            })
            .unwrap_or_else(|| body.trim().to_string()),
        Err(_) => body.trim().to_string(),
    }
}

/// Resolve the configured endpoint to an API root ending in `api/v4/`.
pub fn normalize_base_url(raw: &str) -> Result<Url, GitLabError> {
    let raw = if raw.is_empty() { DEFAULT_BASE_URL } else { raw };

    let mut url = Url::parse(raw).map_err(|e| GitLabError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(GitLabError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "URL cannot be a base".to_string(),
        });
    }

    let mut path = url.path().to_string();
    if !path.ends_with('/') {
        path.push('/');
    }
    if !path.ends_with(API_VERSION_PATH) {
        path.push_str(API_VERSION_PATH);
    }
    url.set_path(&path);

    Ok(url)
}
