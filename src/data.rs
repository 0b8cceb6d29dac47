pub mod models;
pub mod types;

pub use models::{
    Activity, ActivityKind, Commit, CommitPullRequest, Issue, IssueRef, LinkedPullRequest,
};
pub use types::{
    CommitNode, CommitsGraphQLData, CommitsGraphQLResponse, CrossReferenceSource, GraphQLError,
    GraphQLResponse, IssueConnection, IssueEdge, IssueNode, IssuesGraphQLData,
    IssuesGraphQLResponse, RepositoryNode, TimelineConnection, TimelineNode, COMMITS_PAGE_SIZE,
    ISSUES_PAGE_SIZE, TIMELINE_PAGE_SIZE,
};

pub use crate::icons::SPINNER_FRAMES;
