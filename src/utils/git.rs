/// Parse a repository reference into `(owner, name)`.
///
/// Accepts `owner/name`, `https://github.com/owner/name(.git)` and
/// `git@github.com:owner/name.git`.
pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    let url = url.trim();

    // Handle SSH: git@github.com:owner/repo.git
    if let Some(path) = url.strip_prefix("git@github.com:") {
        return split_owner_name(path);
    }

    // Handle HTTPS: https://github.com/owner/repo.git
    if url.contains("github.com") {
        let path = url.split("github.com").nth(1)?;
        let path = path.trim_start_matches('/').trim_start_matches(':');
        return split_owner_name(path);
    }

    // Shorthand: owner/repo
    if !url.contains("://") && !url.contains('@') {
        return split_owner_name(url);
    }

    None
}

fn split_owner_name(path: &str) -> Option<(String, String)> {
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.split('/');
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let name = parts.next().filter(|s| !s.is_empty())?;
    if parts.next().is_some() {
        return None;
    }
    Some((owner.to_string(), name.to_string()))
}
