//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::HashMap;

use semrel_provider_gitlab::GitLabRepository;
use serde_json::{Value, json};
use wiremock::{MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";
pub const PROJECT_ID: &str = "42";

/// Fallback source with nothing in it, so the host environment never leaks in.
pub fn no_env(_: &str) -> Option<String> {
    None
}

/// Provider configuration pointing at the mock server.
pub fn config_for(server: &MockServer) -> HashMap<String, String> {
    HashMap::from([
        ("gitlab_baseurl".to_string(), server.uri()),
        ("token".to_string(), TOKEN.to_string()),
        ("gitlab_projectid".to_string(), PROJECT_ID.to_string()),
    ])
}

/// Create a provider pointing at the mock server.
pub fn mock_repository(server: &MockServer) -> GitLabRepository {
    GitLabRepository::with_env(&config_for(server), &no_env)
        .expect("Failed to initialize provider")
}

/// API path for a project-scoped endpoint.
pub fn project_path(suffix: &str) -> String {
    format!("/api/v4/projects/{PROJECT_ID}{suffix}")
}

/// Create a mock commit object (subset of GitLab's commit schema).
pub fn mock_commit(sha: &str, message: &str) -> Value {
    json!({
        "id": sha,
        "short_id": &sha[..sha.len().min(8)],
        "title": message.lines().next().unwrap_or_default(),
        "message": message,
        "author_name": "Test User",
        "author_email": "test@example.com",
        "created_at": "2024-06-15T12:00:00.000Z",
        "parent_ids": []
    })
}

/// Create `count` commits whose ids start at `start`.
pub fn mock_commits(start: usize, count: usize) -> Vec<Value> {
    (start..start + count)
        .map(|i| mock_commit(&format!("{i:040x}"), &format!("feat: change {i}")))
        .collect()
}

/// Create a mock tag object pointing at `sha`.
pub fn mock_tag(name: &str, sha: &str) -> Value {
    json!({
        "name": name,
        "message": null,
        "target": sha,
        "protected": false,
        "commit": mock_commit(sha, &format!("chore: release {name}"))
    })
}

/// A 200 response carrying GitLab pagination headers.
///
/// `next_page` of `None` renders as an empty `X-Next-Page`, like GitLab does on
/// the last page.
pub fn paged_response(
    body: Vec<Value>,
    page: u32,
    total_pages: u32,
    next_page: Option<u32>,
) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(body)
        .insert_header("X-Page", page.to_string().as_str())
        .insert_header("X-Per-Page", "100")
        .insert_header("X-Total-Pages", total_pages.to_string().as_str())
        .insert_header(
            "X-Next-Page",
            next_page.map(|n| n.to_string()).unwrap_or_default().as_str(),
        )
}
