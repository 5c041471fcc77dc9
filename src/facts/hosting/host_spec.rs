use core::fmt::{Display, Formatter};
use url::Url;

/// Supported hosting platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    GitHub,
    GitLab,
}

impl HostKind {
    #[must_use]
    pub const fn domain(self) -> &'static str {
        match self {
            Self::GitHub => "github.com",
            Self::GitLab => "gitlab.com",
        }
    }

    fn from_domain(domain: &str) -> Option<Self> {
        match domain {
            "github.com" | "www.github.com" => Some(Self::GitHub),
            "gitlab.com" | "www.gitlab.com" => Some(Self::GitLab),
            _ => None,
        }
    }

    fn from_alias(alias: &str) -> Option<Self> {
        match alias {
            "github" => Some(Self::GitHub),
            "gitlab" => Some(Self::GitLab),
            _ => None,
        }
    }
}

/// A parsed hosting identifier: which host, and the repository path on it.
///
/// Accepted forms: `owner/repo` (GitHub by default), `github:owner/repo`,
/// `gitlab:group/project`, or a full `https://` URL. GitLab paths may be
/// nested (`group/subgroup/project`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSpec {
    host: HostKind,
    path: String,
}

impl HostSpec {
    /// Parse an identifier, returning a human-readable reason on failure.
    pub fn parse(identifier: &str) -> Result<Self, String> {
        let identifier = identifier.trim();

        if identifier.contains("://") {
            return Self::parse_url(identifier);
        }

        let (host, rest) = match identifier.split_once(':') {
            Some((alias, rest)) => {
                let host = HostKind::from_alias(alias).ok_or_else(|| format!("unsupported hosting platform '{alias}'"))?;
                (host, rest)
            }
            None => (HostKind::GitHub, identifier),
        };

        Self::from_segments(host, rest.split('/'), false)
    }

    fn parse_url(identifier: &str) -> Result<Self, String> {
        let url = Url::parse(identifier).map_err(|e| format!("invalid hosting URL '{identifier}': {e}"))?;

        let domain = url.host_str().unwrap_or_default();
        let host = HostKind::from_domain(domain).ok_or_else(|| format!("unsupported hosting platform '{domain}'"))?;

        Self::from_segments(host, url.path_segments().map_or_else(Vec::new, Iterator::collect).into_iter(), true)
    }

    fn from_segments<'a>(host: HostKind, segments: impl Iterator<Item = &'a str>, from_url: bool) -> Result<Self, String> {
        let mut segments: Vec<&str> = segments.filter(|s| !s.is_empty()).collect();

        // In a browser URL, segments past owner/repo are browsing context
        // (e.g. /tree/master); in a bare slug they are just wrong
        if from_url && host == HostKind::GitHub && segments.len() > 2 {
            segments.truncate(2);
        }

        if let Some(last) = segments.last_mut() {
            *last = last.trim_end_matches(".git");
        }

        match host {
            // GitHub repositories are always exactly owner/repo
            HostKind::GitHub if segments.len() != 2 => Err("a GitHub identifier must have the form 'owner/repo'".to_string()),
            // GitLab projects may live under nested groups
            HostKind::GitLab if segments.len() < 2 => {
                Err("a GitLab identifier must have the form 'group/project' (groups may be nested)".to_string())
            }
            _ if segments.iter().any(|s| s.is_empty()) => Err("empty segment in hosting identifier".to_string()),
            _ => Ok(Self {
                host,
                path: segments.join("/"),
            }),
        }
    }

    #[must_use]
    pub fn host(&self) -> HostKind {
        self.host
    }

    /// The repository path on the host (`owner/repo`, possibly nested for GitLab).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The path with `/` percent-encoded, as the GitLab API expects for
    /// project lookups by path.
    #[must_use]
    pub fn encoded_path(&self) -> String {
        self.path.replace('/', "%2F")
    }
}

impl Display for HostSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.host.domain(), self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_slug_defaults_to_github() {
        let spec = HostSpec::parse("tokio-rs/tokio").unwrap();
        assert_eq!(spec.host(), HostKind::GitHub);
        assert_eq!(spec.path(), "tokio-rs/tokio");
        assert_eq!(spec.to_string(), "github.com/tokio-rs/tokio");
    }

    #[test]
    fn test_parse_alias_prefix() {
        let spec = HostSpec::parse("gitlab:inkscape/inkscape").unwrap();
        assert_eq!(spec.host(), HostKind::GitLab);
        assert_eq!(spec.path(), "inkscape/inkscape");
    }

    #[test]
    fn test_parse_github_url() {
        let spec = HostSpec::parse("https://github.com/serde-rs/serde").unwrap();
        assert_eq!(spec.host(), HostKind::GitHub);
        assert_eq!(spec.path(), "serde-rs/serde");
    }

    #[test]
    fn test_parse_url_strips_git_extension() {
        let spec = HostSpec::parse("https://github.com/serde-rs/serde.git").unwrap();
        assert_eq!(spec.path(), "serde-rs/serde");
    }

    #[test]
    fn test_parse_nested_gitlab_path() {
        let spec = HostSpec::parse("gitlab:gnome/gimp/gimp-web").unwrap();
        assert_eq!(spec.path(), "gnome/gimp/gimp-web");
        assert_eq!(spec.encoded_path(), "gnome%2Fgimp%2Fgimp-web");
    }

    #[test]
    fn test_parse_github_url_with_browsing_context() {
        let spec = HostSpec::parse("https://github.com/tokio-rs/tokio/tree/master").unwrap();
        assert_eq!(spec.path(), "tokio-rs/tokio");
    }

    #[test]
    fn test_parse_github_slug_rejects_deep_path() {
        let _ = HostSpec::parse("tokio-rs/tokio/tree/master").unwrap_err();
    }

    #[test]
    fn test_parse_unknown_host() {
        let err = HostSpec::parse("https://bitbucket.org/owner/repo").unwrap_err();
        assert!(err.contains("bitbucket.org"));

        let err = HostSpec::parse("sourcehut:owner/repo").unwrap_err();
        assert!(err.contains("sourcehut"));
    }

    #[test]
    fn test_parse_missing_repo() {
        let _ = HostSpec::parse("just-an-owner").unwrap_err();
        let _ = HostSpec::parse("gitlab:project").unwrap_err();
        let _ = HostSpec::parse("https://github.com/").unwrap_err();
    }
}
