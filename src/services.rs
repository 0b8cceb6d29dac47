pub mod commits;
pub mod error;
pub mod github;
pub mod render;
pub mod summary;

pub use commits::{fetch_commits, parse_commits, COMMITS_QUERY};
pub use error::{Error, Result};
pub use github::{
    fetch_issues, fetch_issues_raw, format_response, get_github_token, parse_issues,
    resolve_token, ISSUES_QUERY,
};
pub use render::{
    page_file, render_commits_page, render_document, render_page, render_summary_page,
    write_file, write_site,
};
pub use summary::{fetch_activity, parse_activity, SUMMARY_QUERY};
