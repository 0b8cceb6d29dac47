pub mod git;

pub use git::parse_github_url;
