use serde::Deserialize;

/// Number of issues requested per query. Larger repositories are truncated.
pub const ISSUES_PAGE_SIZE: usize = 100;
/// Number of timeline items requested per issue.
pub const TIMELINE_PAGE_SIZE: usize = 100;
/// Number of default-branch commits requested.
pub const COMMITS_PAGE_SIZE: usize = 100;

// GraphQL response types

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<D> {
    pub data: Option<D>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

pub type IssuesGraphQLResponse = GraphQLResponse<IssuesGraphQLData>;
pub type CommitsGraphQLResponse = GraphQLResponse<CommitsGraphQLData>;

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct IssuesGraphQLData {
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryNode {
    pub issues: IssueConnection,
}

#[derive(Debug, Deserialize)]
pub struct IssueConnection {
    pub edges: Vec<IssueEdge>,
}

#[derive(Debug, Deserialize)]
pub struct IssueEdge {
    pub node: IssueNode,
}

#[derive(Debug, Deserialize)]
pub struct IssueNode {
    pub title: String,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "timelineItems")]
    pub timeline_items: TimelineConnection,
}

#[derive(Debug, Deserialize)]
pub struct TimelineConnection {
    pub nodes: Vec<TimelineNode>,
}

/// A timeline item. Events that are not cross-references match none of the
/// query's fragments and arrive as empty objects.
#[derive(Debug, Deserialize)]
pub struct TimelineNode {
    #[serde(default)]
    pub source: Option<CrossReferenceSource>,
}

/// Source of a cross-reference. Only pull requests carry fields; an issue
/// source comes back as `{}`.
#[derive(Debug, Deserialize)]
pub struct CrossReferenceSource {
    #[serde(rename = "__typename", default)]
    pub typename: Option<String>,
    #[serde(default)]
    pub merged: Option<bool>,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

impl CrossReferenceSource {
    pub fn is_pull_request(&self) -> bool {
        self.typename.as_deref() == Some("PullRequest")
    }
}

// Commit history

#[derive(Debug, Deserialize)]
pub struct CommitsGraphQLData {
    pub repository: Option<CommitsRepositoryNode>,
}

#[derive(Debug, Deserialize)]
pub struct CommitsRepositoryNode {
    /// Null for an empty repository.
    #[serde(rename = "defaultBranchRef")]
    pub default_branch_ref: Option<BranchRef>,
}

#[derive(Debug, Deserialize)]
pub struct BranchRef {
    pub target: Option<CommitTarget>,
}

/// Head of the branch. Only a commit carries history.
#[derive(Debug, Deserialize)]
pub struct CommitTarget {
    #[serde(default)]
    pub history: Option<CommitHistory>,
}

#[derive(Debug, Deserialize)]
pub struct CommitHistory {
    pub edges: Vec<CommitEdge>,
}

#[derive(Debug, Deserialize)]
pub struct CommitEdge {
    pub node: CommitNode,
}

#[derive(Debug, Deserialize)]
pub struct CommitNode {
    pub oid: String,
    #[serde(rename = "messageHeadline")]
    pub message_headline: String,
    #[serde(rename = "committedDate", default)]
    pub committed_date: Option<String>,
    #[serde(default)]
    pub author: Option<GitActor>,
    #[serde(rename = "associatedPullRequests", default)]
    pub associated_pull_requests: Option<NodeList<AssociatedPullRequest>>,
}

#[derive(Debug, Deserialize)]
pub struct GitActor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct NodeList<T> {
    #[serde(default)]
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct AssociatedPullRequest {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub merged: bool,
    pub url: String,
    #[serde(default)]
    pub author: Option<Actor>,
    #[serde(rename = "closingIssuesReferences", default)]
    pub closing_issues_references: Option<NodeList<IssueRefNode>>,
}

#[derive(Debug, Deserialize)]
pub struct Actor {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct IssueRefNode {
    pub number: u64,
    pub title: String,
    pub url: String,
}
