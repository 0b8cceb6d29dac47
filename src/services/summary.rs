use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::error::{Error, Result};
use super::github::{run_query, take_data};
use crate::config::FetchConfig;
use crate::data::{Activity, IssuesGraphQLResponse};

/// Issues with their creation time, and the pull requests that
/// cross-referenced them.
pub const SUMMARY_QUERY: &str = r#"
    query($owner: String!, $name: String!) {
        repository(owner: $owner, name: $name) {
            issues(first: 100) {
                edges {
                    node {
                        title
                        url
                        createdAt
                        timelineItems(itemTypes: [CROSS_REFERENCED_EVENT], first: 100) {
                            nodes {
                                ... on CrossReferencedEvent {
                                    source {
                                        ... on PullRequest {
                                            __typename
                                            title
                                            url
                                            createdAt
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

/// Fetch issues and referencing pull requests as one timeline.
pub async fn fetch_activity(config: &FetchConfig) -> Result<Vec<Activity>> {
    info!(repository = %config.repository, "Querying activity");

    let response = run_query(config, SUMMARY_QUERY).await?;
    parse_activity(&response, &config.repository.to_string())
}

/// Flatten issues and their pull requests into entries ordered by creation
/// time. Entries with the same time keep their response order.
pub fn parse_activity(response: &Value, repository: &str) -> Result<Vec<Activity>> {
    let parsed = IssuesGraphQLResponse::deserialize(response)?;

    let repo = take_data(parsed)?
        .and_then(|d| d.repository)
        .ok_or_else(|| Error::RepositoryNotFound(repository.to_string()))?;

    let mut entries: Vec<Activity> = repo
        .issues
        .edges
        .into_iter()
        .flat_map(|edge| Activity::from_issue_node(edge.node))
        .collect();

    entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(entries)
}
