//! Parsing of user-supplied repository references
//!
//! Accepted forms:
//!
//! ```text
//! https://github.com/owner/repo
//! github.com/owner/repo.git
//! https://github.com/owner/repo/tree/feature/x
//! owner/repo
//! owner/repo@develop
//! ```

use crate::error::{LensError, LensResult};
use reqwest::Url;
use std::fmt;

const HOSTS: &[&str] = &["github.com", "www.github.com"];
const MAX_OWNER_LEN: usize = 39;
const MAX_REPO_LEN: usize = 100;

/// A parsed reference; `branch` is `None` when the default branch is wanted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub branch: Option<String>,
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)?;
        if let Some(branch) = &self.branch {
            write!(f, "@{}", branch)?;
        }
        Ok(())
    }
}

/// Parse a URL or `owner/repo` shorthand, with optional branch
pub fn parse_reference(input: &str) -> LensResult<RepoRef> {
    let invalid = || LensError::InvalidReference(input.to_string());

    let raw = repo_path(input.trim()).ok_or_else(invalid)?;
    let path = raw
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    let (path, at_branch) = match path.split_once('@') {
        Some((left, branch)) => (left, Some(branch)),
        None => (path, None),
    };

    let mut segments = path.split('/');
    let owner = segments.next().ok_or_else(invalid)?;
    let repo = segments.next().ok_or_else(invalid)?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    let rest: Vec<&str> = segments.collect();

    let branch = match (rest.as_slice(), at_branch) {
        ([], None) => None,
        ([], Some(branch)) => Some(branch.to_string()),
        (["tree", branch @ ..], None) if !branch.is_empty() => Some(branch.join("/")),
        _ => return Err(invalid()),
    };

    if !is_valid_owner(owner) || !is_valid_repo(repo) {
        return Err(invalid());
    }
    if let Some(branch) = &branch {
        if !is_valid_branch(branch) {
            return Err(invalid());
        }
    }

    Ok(RepoRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
        branch,
    })
}

/// Path part of a GitHub URL, or the input itself when it names no host.
/// `None` for URLs pointing anywhere else.
fn repo_path(input: &str) -> Option<String> {
    let bare_host = HOSTS.iter().any(|host| {
        input
            .get(..host.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(host))
            && input[host.len()..].starts_with('/')
    });

    let url = if input.contains("://") {
        Url::parse(input).ok()?
    } else if bare_host {
        Url::parse(&format!("https://{}", input)).ok()?
    } else {
        return Some(input.to_string());
    };

    let on_github = matches!(url.scheme(), "http" | "https")
        && url.host_str().is_some_and(|host| HOSTS.contains(&host))
        && url.port().is_none()
        && url.username().is_empty()
        && url.password().is_none();
    on_github.then(|| url.path().trim_start_matches('/').to_string())
}

fn is_valid_owner(owner: &str) -> bool {
    !owner.is_empty()
        && owner.len() <= MAX_OWNER_LEN
        && owner.starts_with(|c: char| c.is_ascii_alphanumeric())
        && owner.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_valid_repo(repo: &str) -> bool {
    !repo.is_empty()
        && repo.len() <= MAX_REPO_LEN
        && repo != "."
        && repo != ".."
        && repo
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Subset of git's ref-name rules
fn is_valid_branch(branch: &str) -> bool {
    !branch.is_empty()
        && !branch.starts_with(['/', '-'])
        && !branch.ends_with(['/', '.'])
        && !branch.ends_with(".lock")
        && !branch.contains("..")
        && !branch.contains("//")
        && !branch.contains("@{")
        && !branch
            .chars()
            .any(|c| c.is_control() || c.is_whitespace() || matches!(c, '~' | '^' | ':' | '?' | '*' | '[' | '\\'))
}
