use std::fmt;
use std::str::FromStr;

use crate::services::Error;
use crate::utils::parse_github_url;

/// Repository queried when none is configured.
pub const DEFAULT_REPOSITORY: &str = "abrie/nl12";
/// Public GitHub API base. The GraphQL endpoint lives at `<base>/graphql`.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// A GitHub repository, `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl Default for RepoRef {
    fn default() -> Self {
        DEFAULT_REPOSITORY
            .parse()
            .unwrap_or_else(|_| RepoRef::new("abrie", "nl12"))
    }
}

impl FromStr for RepoRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_github_url(s)
            .map(|(owner, name)| RepoRef { owner, name })
            .ok_or_else(|| Error::InvalidRepository(s.to_string()))
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Everything a fetch needs, passed in at call time.
#[derive(Clone)]
pub struct FetchConfig {
    pub repository: RepoRef,
    pub token: Option<String>,
    pub api_base: String,
}

impl FetchConfig {
    pub fn new(repository: RepoRef, token: Option<String>) -> Self {
        Self {
            repository,
            token,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new(RepoRef::default(), None)
    }
}

impl fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchConfig")
            .field("repository", &self.repository)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_repository_is_fixed() {
        assert_eq!(RepoRef::default(), RepoRef::new("abrie", "nl12"));
        assert_eq!(RepoRef::default().to_string(), "abrie/nl12");
    }

    #[test]
    fn repo_ref_rejects_garbage() {
        let err = "not-a-repo".parse::<RepoRef>().unwrap_err();
        assert!(matches!(err, Error::InvalidRepository(_)));

        let err = "abrie/nl12/extra".parse::<RepoRef>().unwrap_err();
        assert!(matches!(err, Error::InvalidRepository(r) if r == "abrie/nl12/extra"));
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = FetchConfig::new(RepoRef::default(), Some("ghp_secret".to_string()));
        let debug = format!("{config:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn api_base_can_be_overridden() {
        let config = FetchConfig::default().with_api_base("http://127.0.0.1:9000");
        assert_eq!(config.api_base, "http://127.0.0.1:9000");
        assert!(config.token.is_none());
    }
}
