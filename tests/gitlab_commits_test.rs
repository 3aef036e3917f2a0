//! Integration tests for commit range fetching against a mock GitLab.

mod common;

use common::{mock_commit, mock_commits, mock_repository, paged_response, project_path};
use semrel_provider_gitlab::{GitLabError, Provider, ProviderError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// PAGINATION TESTS
// =============================================================================

#[tokio::test]
async fn test_two_pages_are_concatenated_in_delivery_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(project_path("/repository/commits")))
        .and(query_param("ref_name", "aaa111...bbb222"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(paged_response(mock_commits(0, 100), 1, 2, Some(2)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(project_path("/repository/commits")))
        .and(query_param("page", "2"))
        .respond_with(paged_response(mock_commits(100, 37), 2, 2, None))
        .expect(1)
        .mount(&server)
        .await;

    let repo = mock_repository(&server);
    let commits = repo
        .get_commits("aaa111", "bbb222")
        .await
        .expect("Failed to fetch commits");

    assert_eq!(commits.len(), 137);
    for (i, commit) in commits.iter().enumerate() {
        assert_eq!(commit.sha, format!("{i:040x}"));
        assert_eq!(commit.raw_message, format!("feat: change {i}"));
    }
}

#[tokio::test]
async fn test_stale_total_pages_does_not_stop_early() {
    let server = MockServer::start().await;

    // Claims a single page but still advertises a next page.
    Mock::given(method("GET"))
        .and(path(project_path("/repository/commits")))
        .and(query_param("page", "1"))
        .respond_with(paged_response(mock_commits(0, 100), 1, 1, Some(2)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(project_path("/repository/commits")))
        .and(query_param("page", "2"))
        .respond_with(paged_response(mock_commits(100, 5), 2, 1, None))
        .expect(1)
        .mount(&server)
        .await;

    let repo = mock_repository(&server);
    let commits = repo.get_commits("v1.0.0", "main").await.unwrap();

    assert_eq!(commits.len(), 105);
}

#[tokio::test]
async fn test_stops_on_empty_next_page_even_if_total_pages_is_higher() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(project_path("/repository/commits")))
        .and(query_param("page", "1"))
        .respond_with(paged_response(mock_commits(0, 3), 1, 5, None))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(project_path("/repository/commits")))
        .and(query_param("page", "2"))
        .respond_with(paged_response(mock_commits(3, 3), 2, 5, None))
        .expect(0)
        .mount(&server)
        .await;

    let repo = mock_repository(&server);
    let commits = repo.get_commits("v1.0.0", "main").await.unwrap();

    assert_eq!(commits.len(), 3);
}

#[tokio::test]
async fn test_empty_range() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(project_path("/repository/commits")))
        .respond_with(paged_response(Vec::new(), 1, 0, None))
        .mount(&server)
        .await;

    let repo = mock_repository(&server);
    let commits = repo.get_commits("abc", "abc").await.unwrap();

    assert!(commits.is_empty());
}

// =============================================================================
// MESSAGE AND AUTH TESTS
// =============================================================================

#[tokio::test]
async fn test_raw_message_is_kept_verbatim() {
    let server = MockServer::start().await;
    let message = "feat(api): add endpoint\n\nBREAKING CHANGE: removes v1\n";

    Mock::given(method("GET"))
        .and(path(project_path("/repository/commits")))
        .and(header("PRIVATE-TOKEN", common::TOKEN))
        .respond_with(paged_response(vec![mock_commit("deadbeef", message)], 1, 1, None))
        .expect(1)
        .mount(&server)
        .await;

    let repo = mock_repository(&server);
    let commits = repo.get_commits("a", "b").await.unwrap();

    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].sha, "deadbeef");
    assert_eq!(commits[0].raw_message, message);
}

// =============================================================================
// ERROR HANDLING TESTS
// =============================================================================

#[tokio::test]
async fn test_failure_on_second_page_discards_partial_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(project_path("/repository/commits")))
        .and(query_param("page", "1"))
        .respond_with(paged_response(mock_commits(0, 100), 1, 2, Some(2)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(project_path("/repository/commits")))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({"message": "500 Internal Server Error"})),
        )
        .mount(&server)
        .await;

    let repo = mock_repository(&server);
    let err = repo.get_commits("a", "b").await.unwrap_err();

    match err {
        ProviderError::GitLab(GitLabError::Api {
            status, message, ..
        }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "500 Internal Server Error");
        }
        other => panic!("Expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_revision() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(project_path("/repository/commits")))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"message": "404 Revision Not Found"})),
        )
        .mount(&server)
        .await;

    let repo = mock_repository(&server);
    let err = repo.get_commits("nope", "main").await.unwrap_err();

    assert!(err.to_string().contains("404 Revision Not Found"));
}
