use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::error::{Error, Result};
use super::github::{run_query, take_data};
use crate::config::FetchConfig;
use crate::data::{Commit, CommitsGraphQLResponse, COMMITS_PAGE_SIZE};

/// Latest commits on the default branch, each with the pull request it
/// landed through and the issue that pull request closes.
pub const COMMITS_QUERY: &str = r#"
    query($owner: String!, $name: String!) {
        repository(owner: $owner, name: $name) {
            defaultBranchRef {
                target {
                    ... on Commit {
                        history(first: 100) {
                            edges {
                                node {
                                    oid
                                    messageHeadline
                                    committedDate
                                    author {
                                        name
                                        email
                                    }
                                    associatedPullRequests(first: 1) {
                                        nodes {
                                            number
                                            title
                                            merged
                                            url
                                            author {
                                                login
                                            }
                                            closingIssuesReferences(first: 1) {
                                                nodes {
                                                    number
                                                    title
                                                    url
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
"#;

/// Fetch the default branch's commits, oldest first.
pub async fn fetch_commits(config: &FetchConfig) -> Result<Vec<Commit>> {
    info!(repository = %config.repository, "Querying commit history");

    let response = run_query(config, COMMITS_QUERY).await?;
    let commits = parse_commits(&response, &config.repository.to_string())?;

    if commits.len() >= COMMITS_PAGE_SIZE {
        warn!(
            limit = COMMITS_PAGE_SIZE,
            "Commit history hit the page size; older commits are not included"
        );
    }

    Ok(commits)
}

/// Extract commits from a raw response and order them by commit date.
/// A repository without a default branch has no commits.
pub fn parse_commits(response: &Value, repository: &str) -> Result<Vec<Commit>> {
    let parsed = CommitsGraphQLResponse::deserialize(response)?;

    let repo = take_data(parsed)?
        .and_then(|d| d.repository)
        .ok_or_else(|| Error::RepositoryNotFound(repository.to_string()))?;

    let mut commits: Vec<Commit> = repo
        .default_branch_ref
        .and_then(|branch| branch.target)
        .and_then(|target| target.history)
        .map(|history| history.edges)
        .unwrap_or_default()
        .into_iter()
        .map(|edge| Commit::from(edge.node))
        .collect();

    // committedDate is UTC, so string order is time order
    commits.sort_by(|a, b| a.committed_date.cmp(&b.committed_date));
    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn commit(oid: &str, date: &str) -> Value {
        json!({ "node": {
            "oid": oid,
            "messageHeadline": format!("Commit {oid}"),
            "committedDate": date,
            "author": { "name": "Abrie", "email": "abrie@example.com" },
            "associatedPullRequests": { "nodes": [] }
        }})
    }

    fn history(edges: Vec<Value>) -> Value {
        json!({ "data": { "repository": { "defaultBranchRef": { "target": {
            "history": { "edges": edges }
        } } } } })
    }

    #[test]
    fn query_reads_default_branch_history() {
        assert!(COMMITS_QUERY.contains("defaultBranchRef"));
        assert!(COMMITS_QUERY.contains("history(first: 100)"));
        assert!(COMMITS_QUERY.contains("closingIssuesReferences(first: 1)"));
    }

    #[test]
    fn commits_are_oldest_first() {
        let resp = history(vec![
            commit("c3", "2024-03-03T00:00:00Z"),
            commit("c1", "2024-03-01T00:00:00Z"),
            commit("c2", "2024-03-02T00:00:00Z"),
        ]);
        let commits = parse_commits(&resp, "abrie/nl12").unwrap();
        let oids: Vec<&str> = commits.iter().map(|c| c.oid.as_str()).collect();
        assert_eq!(oids, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn empty_repository_has_no_commits() {
        let resp = json!({ "data": { "repository": { "defaultBranchRef": null } } });
        assert!(parse_commits(&resp, "abrie/nl12").unwrap().is_empty());
    }

    #[test]
    fn missing_repository_is_reported() {
        let resp = json!({ "data": { "repository": null } });
        assert!(matches!(
            parse_commits(&resp, "abrie/gone"),
            Err(Error::RepositoryNotFound(r)) if r == "abrie/gone"
        ));
    }
}
