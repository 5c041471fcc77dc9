use super::host_spec::{HostKind, HostSpec};
use crate::Result;
use crate::facts::source_result::try_found;
use crate::facts::{FactKey, FactSet, SourceAdapter, SourceResult, http};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

const LOG_TARGET: &str = "   hosting";

const GITHUB_API: &str = "https://api.github.com";
const GITLAB_API: &str = "https://gitlab.com/api/v4";

/// Only the first page of pull requests and tags is fetched; a project with
/// more open PRs than this reports the page size as a floor.
const PAGE_SIZE: u32 = 100;

/// Repository info returned by the GitHub API, reduced to the fields we use.
#[derive(Debug, Deserialize)]
struct GithubRepo {
    name: String,
    description: Option<String>,
    homepage: Option<String>,
    language: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    stargazers_count: Option<u64>,
    watchers_count: Option<u64>,
    subscribers_count: Option<u64>,
    forks_count: Option<u64>,
    /// GitHub counts open pull requests in this number as well.
    open_issues_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GithubTag {
    name: String,
}

/// Project info returned by the GitLab API, reduced to the fields we use.
#[derive(Debug, Deserialize)]
struct GitlabProject {
    name: String,
    description: Option<String>,
    web_url: Option<String>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
    star_count: Option<u64>,
    forks_count: Option<u64>,
    open_issues_count: Option<u64>,
}

/// Adapter for remote hosting platforms (GitHub and GitLab).
#[derive(Debug, Clone)]
pub struct HostingAdapter {
    github: reqwest::Client,
    gitlab: reqwest::Client,
    github_base: String,
    gitlab_base: String,
}

impl HostingAdapter {
    pub fn new(github_token: Option<&str>, gitlab_token: Option<&str>) -> Result<Self> {
        Self::with_base_urls(GITHUB_API, GITLAB_API, github_token, gitlab_token)
    }

    /// Construct against alternative API endpoints. Used by tests.
    pub fn with_base_urls(
        github_base: impl Into<String>,
        gitlab_base: impl Into<String>,
        github_token: Option<&str>,
        gitlab_token: Option<&str>,
    ) -> Result<Self> {
        let github_auth = github_token.map(|t| format!("token {t}"));
        let github = http::build_client(github_auth.as_deref().map(|v| ("authorization", v)))?;
        let gitlab = http::build_client(gitlab_token.map(|t| ("private-token", t)))?;

        Ok(Self {
            github,
            gitlab,
            github_base: github_base.into(),
            gitlab_base: gitlab_base.into(),
        })
    }

    async fn fetch_github(&self, spec: &HostSpec) -> SourceResult {
        let base = &self.github_base;
        let repo_url = format!("{base}/repos/{}", spec.path());

        let repo: GithubRepo = try_found!(http::get_json(&self.github, &repo_url).await);

        let pulls: Vec<serde_json::Value> =
            try_found!(http::get_json(&self.github, &format!("{repo_url}/pulls?state=open&per_page={PAGE_SIZE}")).await);

        let tags: Vec<GithubTag> = try_found!(http::get_json(&self.github, &format!("{repo_url}/tags?per_page={PAGE_SIZE}")).await);

        let mut facts = FactSet::new();
        facts.set_text(FactKey::Name, &repo.name);
        facts.set_text(FactKey::Description, repo.description.unwrap_or_default());
        facts.set_text(FactKey::Homepage, repo.homepage.unwrap_or_default());
        facts.set_text(FactKey::Language, repo.language.unwrap_or_default());
        facts.set(FactKey::Created, repo.created_at);
        facts.set(FactKey::Updated, repo.updated_at);
        facts.set_opt(FactKey::Stars, repo.stargazers_count);
        facts.set_opt(FactKey::Watchers, repo.watchers_count);
        facts.set_opt(FactKey::Subscribers, repo.subscribers_count);
        facts.set_opt(FactKey::Forks, repo.forks_count);
        facts.set_opt(FactKey::OpenIssues, repo.open_issues_count);
        facts.set(FactKey::OpenPullRequests, pulls.len() as u64);
        if let Some(tag) = greatest_tag(&tags) {
            facts.set_text(FactKey::Version, tag);
        }

        SourceResult::Found(facts)
    }

    async fn fetch_gitlab(&self, spec: &HostSpec) -> SourceResult {
        let url = format!("{}/projects/{}", self.gitlab_base, spec.encoded_path());

        let project: GitlabProject = try_found!(http::get_json(&self.gitlab, &url).await);

        let mut facts = FactSet::new();
        facts.set_text(FactKey::Name, &project.name);
        facts.set_text(FactKey::Description, project.description.unwrap_or_default());
        facts.set_text(FactKey::Homepage, project.web_url.unwrap_or_default());
        facts.set(FactKey::Created, project.created_at);
        facts.set(FactKey::Updated, project.last_activity_at);
        facts.set_opt(FactKey::Stars, project.star_count);
        facts.set_opt(FactKey::Forks, project.forks_count);
        facts.set_opt(FactKey::OpenIssues, project.open_issues_count);

        SourceResult::Found(facts)
    }
}

#[async_trait]
impl SourceAdapter for HostingAdapter {
    async fn fetch(&self, identifier: &str) -> SourceResult {
        let spec = match HostSpec::parse(identifier) {
            Ok(spec) => spec,
            Err(reason) => return SourceResult::Unavailable(reason),
        };

        log::info!(target: LOG_TARGET, "Querying {} for repository '{spec}'", spec.host().domain());

        match spec.host() {
            HostKind::GitHub => self.fetch_github(&spec).await,
            HostKind::GitLab => self.fetch_gitlab(&spec).await,
        }
    }
}

/// Pick the greatest tag name, ignoring a leading `v`.
fn greatest_tag(tags: &[GithubTag]) -> Option<&str> {
    let best_semver = tags
        .iter()
        .filter_map(|t| semver::Version::parse(t.name.trim_start_matches('v')).ok().map(|v| (v, t.name.as_str())))
        .max_by(|(a, _), (b, _)| a.cmp(b));

    if let Some((_, tag)) = best_semver {
        return Some(tag);
    }

    tags.iter().map(|t| t.name.as_str()).max_by_key(|t| t.trim_start_matches('v'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_repo_deserialize() {
        let json = r#"{
            "name": "tokio",
            "description": "A runtime",
            "homepage": "https://tokio.rs",
            "language": "Rust",
            "created_at": "2016-08-26T17:45:01Z",
            "updated_at": "2024-01-15T10:30:00Z",
            "stargazers_count": 20000,
            "watchers_count": 20000,
            "subscribers_count": 300,
            "forks_count": 2000,
            "open_issues_count": 150
        }"#;

        let repo: GithubRepo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.name, "tokio");
        assert_eq!(repo.stargazers_count, Some(20000));
        assert_eq!(repo.created_at.timestamp(), 1_472_233_501);
    }

    #[test]
    fn test_github_repo_deserialize_sparse() {
        let json = r#"{
            "name": "tiny",
            "created_at": "2020-01-01T00:00:00Z",
            "updated_at": "2020-06-01T00:00:00Z"
        }"#;

        let repo: GithubRepo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.description, None);
        assert_eq!(repo.stargazers_count, None);
    }

    #[test]
    fn test_gitlab_project_deserialize() {
        let json = r#"{
            "name": "inkscape",
            "description": "Vector graphics editor",
            "web_url": "https://gitlab.com/inkscape/inkscape",
            "created_at": "2017-06-09T14:16:35.615Z",
            "last_activity_at": "2024-01-15T10:30:00.000Z",
            "star_count": 3000,
            "forks_count": 1000,
            "open_issues_count": 2000
        }"#;

        let project: GitlabProject = serde_json::from_str(json).unwrap();
        assert_eq!(project.name, "inkscape");
        assert_eq!(project.star_count, Some(3000));
    }

    #[test]
    fn test_greatest_tag() {
        let tags = vec![
            GithubTag { name: "v1.2.0".into() },
            GithubTag { name: "v1.10.0".into() },
            GithubTag { name: "v1.9.3".into() },
        ];
        assert_eq!(greatest_tag(&tags), Some("v1.10.0"));
        assert_eq!(greatest_tag(&[]), None);
    }

    #[tokio::test]
    async fn test_fetch_bad_identifier_is_unavailable() {
        let adapter = HostingAdapter::new(None, None).unwrap();
        let result = adapter.fetch("not-a-slug").await;

        match result {
            SourceResult::Unavailable(m) => assert!(m.contains("owner/repo")),
            other => panic!("expected Unavailable, got {}", other.status_str()),
        }
    }
}
