//! Fetcher tests against a mock GitHub GraphQL endpoint.

use mergelens::config::{FetchConfig, RepoRef};
use mergelens::data::ActivityKind;
use mergelens::services::{
    fetch_activity, fetch_commits, fetch_issues, fetch_issues_raw, format_response, Error,
};
use mockito::{Matcher, Server};
use serde_json::json;

fn config(server: &Server, token: Option<&str>) -> FetchConfig {
    FetchConfig::new(RepoRef::new("abrie", "nl12"), token.map(str::to_string))
        .with_api_base(server.url())
}

fn bad_credentials() -> String {
    json!({
        "message": "Bad credentials",
        "documentation_url": "https://docs.github.com/graphql"
    })
    .to_string()
}

#[tokio::test]
async fn empty_issue_list_is_printed_not_an_error() {
    let mut server = Server::new_async().await;
    let body = json!({ "data": { "repository": { "issues": { "edges": [] } } } });
    let mock = server
        .mock("POST", "/graphql")
        .match_header("authorization", Matcher::Regex("test-token".to_string()))
        .match_body(Matcher::PartialJson(json!({
            "variables": { "owner": "abrie", "name": "nl12" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let response = fetch_issues_raw(&config(&server, Some("test-token")))
        .await
        .expect("empty result should succeed");

    mock.assert_async().await;
    assert_eq!(response, body);
    assert!(format_response(&response).unwrap().contains("\"edges\": []"));
}

#[tokio::test]
async fn issues_carry_merged_flag() {
    let mut server = Server::new_async().await;
    let body = json!({ "data": { "repository": { "issues": { "edges": [
        { "node": {
            "__typename": "Issue",
            "title": "Crash on start",
            "number": 1,
            "url": "https://github.com/abrie/nl12/issues/1",
            "timelineItems": { "nodes": [
                {},
                { "source": { "__typename": "PullRequest", "merged": true, "number": 3, "title": "Fix crash" } }
            ] }
        } },
        { "node": {
            "__typename": "Issue",
            "title": "Typo",
            "number": 2,
            "url": "https://github.com/abrie/nl12/issues/2",
            "timelineItems": { "nodes": [
                { "source": { "__typename": "PullRequest", "merged": false, "number": 4, "title": "Fix typo" } }
            ] }
        } }
    ] } } } });
    let _mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let issues = fetch_issues(&config(&server, Some("test-token")))
        .await
        .unwrap();

    assert_eq!(issues.len(), 2);
    assert!(issues[0].has_merged_pr);
    assert!(!issues[1].has_merged_pr);
    assert_eq!(issues[1].linked_pull_requests[0].number, 4);
}

#[tokio::test]
async fn missing_token_fails_at_call_time() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/graphql")
        .match_header("authorization", Matcher::Missing)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(bad_credentials())
        .create_async()
        .await;

    let result = fetch_issues_raw(&config(&server, None)).await;

    mock.assert_async().await;
    assert!(matches!(result, Err(Error::Api(_))));
}

#[tokio::test]
async fn bad_credentials_are_surfaced_without_retry() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/graphql")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(bad_credentials())
        .expect(1)
        .create_async()
        .await;

    let err = fetch_issues_raw(&config(&server, Some("expired")))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(err.to_string().starts_with("GitHub API error"));
}

#[tokio::test]
async fn graphql_errors_without_repository_fail() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": { "repository": null },
                "errors": [{ "message": "Could not resolve to a Repository with the name 'abrie/nl12'." }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    match fetch_issues_raw(&config(&server, Some("test-token"))).await {
        Err(Error::GraphQl(msg)) => assert!(msg.contains("Could not resolve")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn commit_history_carries_pull_request_and_issue() {
    let mut server = Server::new_async().await;
    let body = json!({ "data": { "repository": { "defaultBranchRef": { "target": {
        "history": { "edges": [
            { "node": {
                "oid": "bbbbbbbbbb",
                "messageHeadline": "Fix crash (#4)",
                "committedDate": "2024-03-02T00:00:00Z",
                "author": { "name": "Abrie", "email": "abrie@example.com" },
                "associatedPullRequests": { "nodes": [{
                    "number": 4,
                    "title": "Fix crash",
                    "merged": true,
                    "url": "https://github.com/abrie/nl12/pull/4",
                    "author": { "login": "abrie" },
                    "closingIssuesReferences": { "nodes": [
                        { "number": 1, "title": "Crash on start", "url": "https://github.com/abrie/nl12/issues/1" }
                    ] }
                }] }
            } },
            { "node": {
                "oid": "aaaaaaaaaa",
                "messageHeadline": "Initial commit",
                "committedDate": "2024-03-01T00:00:00Z",
                "author": { "name": "Abrie", "email": "abrie@example.com" },
                "associatedPullRequests": { "nodes": [] }
            } }
        ] }
    } } } } });
    let mock = server
        .mock("POST", "/graphql")
        .match_body(Matcher::Regex("defaultBranchRef".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let commits = fetch_commits(&config(&server, Some("test-token")))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].headline, "Initial commit");
    let pr = commits[1].pull_request.as_ref().unwrap();
    assert_eq!(pr.number, 4);
    assert_eq!(pr.closes.as_ref().map(|i| i.number), Some(1));
}

#[tokio::test]
async fn activity_summary_is_ordered_by_creation() {
    let mut server = Server::new_async().await;
    let body = json!({ "data": { "repository": { "issues": { "edges": [
        { "node": {
            "title": "Crash on start",
            "url": "https://github.com/abrie/nl12/issues/1",
            "createdAt": "2024-03-01T00:00:00Z",
            "timelineItems": { "nodes": [
                { "source": {
                    "__typename": "PullRequest",
                    "title": "Fix crash",
                    "url": "https://github.com/abrie/nl12/pull/4",
                    "createdAt": "2024-03-04T00:00:00Z"
                } }
            ] }
        } },
        { "node": {
            "title": "Typo",
            "url": "https://github.com/abrie/nl12/issues/2",
            "createdAt": "2024-03-02T00:00:00Z",
            "timelineItems": { "nodes": [{ "source": {} }] }
        } }
    ] } } } });
    let mock = server
        .mock("POST", "/graphql")
        .match_body(Matcher::Regex("createdAt".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let entries = fetch_activity(&config(&server, Some("test-token")))
        .await
        .unwrap();

    mock.assert_async().await;
    let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Crash on start", "Typo", "Fix crash"]);
    assert_eq!(entries[2].kind, ActivityKind::PullRequest);
}

#[tokio::test]
async fn commit_history_of_missing_repository_fails() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": { "repository": null } }).to_string())
        .create_async()
        .await;

    let result = fetch_commits(&config(&server, Some("test-token"))).await;
    assert!(matches!(result, Err(Error::RepositoryNotFound(r)) if r == "abrie/nl12"));
}
