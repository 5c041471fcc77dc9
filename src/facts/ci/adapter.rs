use crate::Result;
use crate::facts::source_result::try_found;
use crate::facts::{FactKey, FactSet, SourceAdapter, SourceResult, http};
use async_trait::async_trait;
use serde::Deserialize;

const LOG_TARGET: &str = "        ci";

const TRAVIS_API: &str = "https://api.travis-ci.org";

#[derive(Debug, Deserialize)]
struct TravisRepo {
    description: Option<String>,
    /// Zero means the last build passed.
    last_build_result: Option<i64>,
}

/// Adapter for the Travis CI service. The identifier is an `owner/repo` slug
/// or a travis-ci.org URL.
#[derive(Debug, Clone)]
pub struct CiAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl CiAdapter {
    pub fn new() -> Result<Self> {
        Self::with_base_url(TRAVIS_API)
    }

    /// Construct against an alternative API endpoint. Used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http::build_client(None)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl SourceAdapter for CiAdapter {
    async fn fetch(&self, identifier: &str) -> SourceResult {
        let slug = match parse_slug(identifier) {
            Ok(slug) => slug,
            Err(reason) => return SourceResult::Unavailable(reason),
        };

        log::info!(target: LOG_TARGET, "Querying Travis for repository '{slug}'");

        let url = format!("{}/repos/{slug}", self.base_url);
        let repo: TravisRepo = try_found!(http::get_json(&self.client, &url).await);

        let mut facts = FactSet::new();
        facts.set_text(FactKey::Description, repo.description.unwrap_or_default());
        if let Some(result) = repo.last_build_result {
            facts.set(FactKey::TestsPassing, result == 0);
        }

        SourceResult::Found(facts)
    }
}

/// Accept an `owner/repo` slug or a travis-ci.org URL.
fn parse_slug(identifier: &str) -> Result<String, String> {
    let identifier = identifier.trim();

    let path = if let Some(rest) = identifier
        .strip_prefix("https://travis-ci.org/")
        .or_else(|| identifier.strip_prefix("http://travis-ci.org/"))
    {
        rest
    } else if identifier.contains("://") {
        return Err(format!("unsupported CI service URL '{identifier}'"));
    } else {
        identifier
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() != 2 {
        return Err("a CI identifier must have the form 'owner/repo'".to_string());
    }

    Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slug() {
        assert_eq!(parse_slug("xi/project-stats").unwrap(), "xi/project-stats");
        assert_eq!(parse_slug("https://travis-ci.org/xi/project-stats").unwrap(), "xi/project-stats");
    }

    #[test]
    fn test_parse_slug_rejects_bad_forms() {
        let _ = parse_slug("just-an-owner").unwrap_err();
        let _ = parse_slug("https://circleci.com/gh/owner/repo").unwrap_err();
        let _ = parse_slug("a/b/c").unwrap_err();
    }

    #[test]
    fn test_repo_deserialize() {
        let json = r#"{"description": "keep track of all your projects", "last_build_result": 0}"#;
        let repo: TravisRepo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.last_build_result, Some(0));
    }

    #[test]
    fn test_repo_deserialize_no_builds() {
        let json = r#"{"description": null, "last_build_result": null}"#;
        let repo: TravisRepo = serde_json::from_str(json).unwrap();
        assert!(repo.last_build_result.is_none());
    }
}
