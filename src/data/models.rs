use super::types::{CommitNode, IssueNode};

/// A pull request that mentioned an issue.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedPullRequest {
    pub number: u64,
    pub title: String,
    pub merged: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub title: String,
    pub number: Option<u64>,
    pub url: Option<String>,
    pub linked_pull_requests: Vec<LinkedPullRequest>,
    pub has_merged_pr: bool,
}

impl Issue {
    pub fn new(title: impl Into<String>, linked_pull_requests: Vec<LinkedPullRequest>) -> Self {
        let has_merged_pr = linked_pull_requests.iter().any(|pr| pr.merged);
        Self {
            title: title.into(),
            number: None,
            url: None,
            linked_pull_requests,
            has_merged_pr,
        }
    }
}

impl From<IssueNode> for Issue {
    fn from(node: IssueNode) -> Self {
        let linked = node
            .timeline_items
            .nodes
            .into_iter()
            .filter_map(|item| item.source)
            .filter(|source| source.is_pull_request())
            .map(|source| LinkedPullRequest {
                number: source.number.unwrap_or_default(),
                title: source.title.unwrap_or_default(),
                merged: source.merged.unwrap_or(false),
            })
            .collect();

        let mut issue = Issue::new(node.title, linked);
        issue.number = node.number;
        issue.url = node.url;
        issue
    }
}

/// An issue a pull request closes.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueRef {
    pub number: u64,
    pub title: String,
    pub url: String,
}

/// The pull request a commit landed through.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitPullRequest {
    pub number: u64,
    pub title: String,
    pub merged: bool,
    pub url: String,
    pub author: Option<String>,
    pub closes: Option<IssueRef>,
}

/// A commit on the default branch.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub oid: String,
    pub headline: String,
    pub author: Option<String>,
    pub committed_date: Option<String>,
    pub pull_request: Option<CommitPullRequest>,
}

impl Commit {
    pub fn short_oid(&self) -> &str {
        self.oid.get(..7).unwrap_or(&self.oid)
    }
}

impl From<CommitNode> for Commit {
    fn from(node: CommitNode) -> Self {
        let author = node.author.and_then(|a| a.name.or(a.email));
        let pull_request = node
            .associated_pull_requests
            .and_then(|prs| prs.nodes.into_iter().next())
            .map(|pr| CommitPullRequest {
                number: pr.number,
                title: pr.title,
                merged: pr.merged,
                url: pr.url,
                author: pr.author.map(|a| a.login),
                closes: pr
                    .closing_issues_references
                    .and_then(|issues| issues.nodes.into_iter().next())
                    .map(|issue| IssueRef {
                        number: issue.number,
                        title: issue.title,
                        url: issue.url,
                    }),
            });

        Self {
            oid: node.oid,
            headline: node.message_headline,
            author,
            committed_date: node.committed_date,
            pull_request,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Issue,
    PullRequest,
}

impl ActivityKind {
    pub fn label(self) -> &'static str {
        match self {
            ActivityKind::Issue => "Issue",
            ActivityKind::PullRequest => "Pull request",
        }
    }
}

/// One entry of the activity summary: an issue, or a pull request that
/// cross-referenced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub kind: ActivityKind,
    pub title: String,
    pub created_at: Option<String>,
    pub url: Option<String>,
}

impl Activity {
    /// The issue followed by every pull request that referenced it.
    pub fn from_issue_node(node: IssueNode) -> Vec<Activity> {
        let mut entries = vec![Activity {
            kind: ActivityKind::Issue,
            title: node.title,
            created_at: node.created_at,
            url: node.url,
        }];
        entries.extend(
            node.timeline_items
                .nodes
                .into_iter()
                .filter_map(|item| item.source)
                .filter(|source| source.is_pull_request())
                .map(|source| Activity {
                    kind: ActivityKind::PullRequest,
                    title: source.title.unwrap_or_default(),
                    created_at: source.created_at,
                    url: source.url,
                }),
        );
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr(number: u64, merged: bool) -> LinkedPullRequest {
        LinkedPullRequest {
            number,
            title: format!("PR {number}"),
            merged,
        }
    }

    #[test]
    fn merged_flag_is_true_when_any_linked_pr_merged() {
        let issue = Issue::new("crash on start", vec![pr(1, false), pr(2, true)]);
        assert!(issue.has_merged_pr);
    }

    #[test]
    fn merged_flag_is_false_without_merged_prs() {
        assert!(!Issue::new("a", vec![pr(1, false)]).has_merged_pr);
        assert!(!Issue::new("b", vec![]).has_merged_pr);
    }

    #[test]
    fn node_conversion_skips_non_pull_request_events() {
        let node: IssueNode = serde_json::from_value(serde_json::json!({
            "__typename": "Issue",
            "title": "Broken link",
            "number": 7,
            "timelineItems": {
                "nodes": [
                    {},
                    { "source": {} },
                    { "source": { "__typename": "PullRequest", "merged": true, "number": 12, "title": "Fix link" } }
                ]
            }
        }))
        .unwrap();

        let issue = Issue::from(node);
        assert_eq!(issue.number, Some(7));
        assert_eq!(issue.linked_pull_requests.len(), 1);
        assert_eq!(issue.linked_pull_requests[0].number, 12);
        assert!(issue.has_merged_pr);
    }

    #[test]
    fn commit_takes_first_pull_request_and_closed_issue() {
        let node: CommitNode = serde_json::from_value(serde_json::json!({
            "oid": "0123456789abcdef",
            "messageHeadline": "Fix crash on start (#4)",
            "committedDate": "2024-03-01T10:00:00Z",
            "author": { "name": null, "email": "dev@example.com" },
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
        }))
        .unwrap();

        let commit = Commit::from(node);
        assert_eq!(commit.short_oid(), "0123456");
        assert_eq!(commit.author.as_deref(), Some("dev@example.com"));
        let pr = commit.pull_request.unwrap();
        assert_eq!(pr.author.as_deref(), Some("abrie"));
        assert_eq!(pr.closes.map(|i| i.number), Some(1));
    }

    #[test]
    fn commit_without_pull_request() {
        let node: CommitNode = serde_json::from_value(serde_json::json!({
            "oid": "abc",
            "messageHeadline": "Initial commit",
            "associatedPullRequests": { "nodes": [] }
        }))
        .unwrap();

        let commit = Commit::from(node);
        assert_eq!(commit.short_oid(), "abc");
        assert!(commit.pull_request.is_none());
        assert!(commit.author.is_none());
    }

    #[test]
    fn activity_lists_issue_then_referencing_pull_requests() {
        let node: IssueNode = serde_json::from_value(serde_json::json!({
            "title": "Crash on start",
            "url": "https://github.com/abrie/nl12/issues/1",
            "createdAt": "2024-03-01T09:00:00Z",
            "timelineItems": { "nodes": [
                {},
                { "source": {} },
                { "source": {
                    "__typename": "PullRequest",
                    "title": "Fix crash",
                    "url": "https://github.com/abrie/nl12/pull/4",
                    "createdAt": "2024-03-01T10:00:00Z"
                } }
            ] }
        }))
        .unwrap();

        let entries = Activity::from_issue_node(node);
        let kinds: Vec<ActivityKind> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ActivityKind::Issue, ActivityKind::PullRequest]);
        assert_eq!(entries[1].title, "Fix crash");
        assert_eq!(entries[1].created_at.as_deref(), Some("2024-03-01T10:00:00Z"));
    }
}
