use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::Value;
use std::process::Command;
use tracing::{debug, info, warn};

use super::error::{Error, Result};
use crate::config::FetchConfig;
use crate::data::{
    GraphQLResponse, Issue, IssuesGraphQLResponse, ISSUES_PAGE_SIZE, TIMELINE_PAGE_SIZE,
};

/// Issues of one repository with the pull requests that cross-referenced them.
/// Timeline items are narrowed structurally: anything that is not a
/// cross-reference from a pull request comes back as an empty object.
pub const ISSUES_QUERY: &str = r#"
    query($owner: String!, $name: String!) {
        repository(owner: $owner, name: $name) {
            issues(first: 100) {
                edges {
                    node {
                        __typename
                        title
                        number
                        url
                        timelineItems(first: 100) {
                            nodes {
                                ... on CrossReferencedEvent {
                                    source {
                                        ... on PullRequest {
                                            __typename
                                            merged
                                            number
                                            title
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

/// Ask the `gh` CLI for its token.
pub fn get_github_token() -> anyhow::Result<String> {
    let output = Command::new("gh").args(["auth", "token"]).output()?;

    if !output.status.success() {
        anyhow::bail!("Failed to get GitHub token. Run 'gh auth login' first.");
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Use the explicit token if there is one, else whatever `gh` knows.
/// Returns `None` when neither is available; the request then goes out
/// unauthenticated and fails at call time.
pub fn resolve_token(explicit: Option<String>) -> Option<String> {
    explicit.filter(|t| !t.is_empty()).or_else(|| match get_github_token() {
        Ok(token) if !token.is_empty() => Some(token),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "No token from gh");
            None
        }
    })
}

fn build_client(config: &FetchConfig) -> Result<Octocrab> {
    let builder = Octocrab::builder().base_uri(config.api_base.as_str())?;
    let client = match &config.token {
        Some(token) => builder.personal_token(token.clone()).build()?,
        None => {
            warn!("No GitHub token configured, sending unauthenticated request");
            builder.build()?
        }
    };
    Ok(client)
}

/// Send `query` once with the repository's owner and name as variables.
/// Fails on transport errors and on GraphQL errors without a repository.
pub(crate) async fn run_query(config: &FetchConfig, query: &str) -> Result<Value> {
    let client = build_client(config)?;

    let response: Value = client
        .graphql(&serde_json::json!({
            "query": query,
            "variables": {
                "owner": config.repository.owner,
                "name": config.repository.name,
            }
        }))
        .await?;

    check_graphql_errors(&response, &config.repository.to_string())?;
    Ok(response)
}

/// Run the issues query once and return the response as-is.
pub async fn fetch_issues_raw(config: &FetchConfig) -> Result<Value> {
    info!(repository = %config.repository, endpoint = %config.api_base, "Querying issues");

    let response = run_query(config, ISSUES_QUERY).await?;
    warn_if_truncated(&response);

    Ok(response)
}

/// Fetch and extract issues with their merged-PR flag.
pub async fn fetch_issues(config: &FetchConfig) -> Result<Vec<Issue>> {
    let response = fetch_issues_raw(config).await?;
    parse_issues(&response, &config.repository.to_string())
}

/// Extract issues from a raw query response.
pub fn parse_issues(response: &Value, repository: &str) -> Result<Vec<Issue>> {
    let parsed = IssuesGraphQLResponse::deserialize(response)?;

    let repo = take_data(parsed)?
        .and_then(|d| d.repository)
        .ok_or_else(|| Error::RepositoryNotFound(repository.to_string()))?;

    Ok(repo
        .issues
        .edges
        .into_iter()
        .map(|edge| Issue::from(edge.node))
        .collect())
}

/// The response's `data`. Errors without data become `Error::GraphQl`.
pub(crate) fn take_data<D>(response: GraphQLResponse<D>) -> Result<Option<D>> {
    if response.data.is_none() && !response.errors.is_empty() {
        return Err(Error::GraphQl(join_messages(
            response.errors.iter().map(|e| e.message.as_str()),
        )));
    }
    Ok(response.data)
}

/// Pretty-print a response the way it is written to stdout.
pub fn format_response(response: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(response)?)
}

/// A response with errors and no repository is a failure; errors alongside
/// data are partial results and pass through.
fn check_graphql_errors(response: &Value, repository: &str) -> Result<()> {
    let messages: Vec<&str> = response
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    let has_repository = response
        .pointer("/data/repository")
        .is_some_and(|r| !r.is_null());

    if !has_repository {
        if messages.is_empty() {
            if response.get("data").is_none() {
                return Err(Error::GraphQl("response has no data".to_string()));
            }
            return Err(Error::RepositoryNotFound(repository.to_string()));
        }
        return Err(Error::GraphQl(join_messages(messages.into_iter())));
    }

    if !messages.is_empty() {
        warn!(errors = %join_messages(messages.into_iter()), "Partial GraphQL response");
    }

    Ok(())
}

/// Which parts of a response filled their page: whether the issue list did,
/// and the titles of issues whose timeline did.
fn truncation(response: &Value) -> (bool, Vec<&str>) {
    let Some(edges) = response
        .pointer("/data/repository/issues/edges")
        .and_then(Value::as_array)
    else {
        return (false, Vec::new());
    };

    let timelines = edges
        .iter()
        .filter(|edge| {
            edge.pointer("/node/timelineItems/nodes")
                .and_then(Value::as_array)
                .is_some_and(|nodes| nodes.len() >= TIMELINE_PAGE_SIZE)
        })
        .map(|edge| {
            edge.pointer("/node/title")
                .and_then(Value::as_str)
                .unwrap_or("?")
        })
        .collect();

    (edges.len() >= ISSUES_PAGE_SIZE, timelines)
}

fn warn_if_truncated(response: &Value) {
    let (issues_full, timelines) = truncation(response);

    if issues_full {
        warn!(
            limit = ISSUES_PAGE_SIZE,
            "Issue list hit the page size; later issues are not included"
        );
    }

    for title in timelines {
        warn!(
            issue = title,
            limit = TIMELINE_PAGE_SIZE,
            "Timeline hit the page size; linked PRs may be missing"
        );
    }
}

fn join_messages<'a>(messages: impl Iterator<Item = &'a str>) -> String {
    messages.collect::<Vec<_>>().join(", ")
}
