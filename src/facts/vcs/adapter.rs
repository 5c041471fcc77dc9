use crate::facts::source_result::try_found;
use crate::facts::{FactKey, FactSet, SourceAdapter, SourceResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core::time::Duration;
use directories::BaseDirs;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::process::Command;

const LOG_TARGET: &str = "       vcs";
const GIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Adapter for local git checkouts.
///
/// The identifier is a filesystem path (a leading `~` is expanded to the
/// user's home directory).
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionControlAdapter;

impl VersionControlAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SourceAdapter for VersionControlAdapter {
    async fn fetch(&self, identifier: &str) -> SourceResult {
        let path = expand_home(identifier);
        if !path.is_dir() {
            return SourceResult::Unavailable(format!("'{}' is not a directory", path.display()));
        }

        log::info!(target: LOG_TARGET, "Inspecting git repository at '{}'", path.display());

        // Fails fast on directories that aren't repositories
        let _ = try_found!(git(&path, &["rev-parse", "--git-dir"]).await);

        let mut facts = FactSet::new();

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            facts.set_text(FactKey::Name, name);
        }

        let rev_list = try_found!(git(&path, &["rev-list", "HEAD"]).await);
        let revs: Vec<&str> = rev_list.lines().collect();
        facts.set(FactKey::CommitCount, revs.len() as u64);

        if let Some(root_rev) = revs.last() {
            facts.set(FactKey::Created, try_found!(commit_time(&path, root_rev).await));
        }
        facts.set(FactKey::Updated, try_found!(commit_time(&path, "HEAD").await));

        let files = try_found!(git(&path, &["ls-files"]).await);
        facts.set(FactKey::FileCount, files.lines().count() as u64);

        // Unique author emails across all refs (respects .mailmap)
        let authors = try_found!(git(&path, &["log", "--all", "--format=%ae"]).await);
        let unique: HashSet<&str> = authors.lines().collect();
        facts.set(FactKey::Contributors, unique.len() as u64);

        let tags = try_found!(git(&path, &["tag"]).await);
        if let Some(tag) = greatest_tag(tags.lines()) {
            facts.set_text(FactKey::Version, tag);
        }

        let status = try_found!(git(&path, &["status", "--porcelain", "--branch"]).await);
        let (unstaged, staged) = worktree_state(&status);
        facts.set(FactKey::UnstagedChanges, unstaged);
        facts.set(FactKey::UncommittedChanges, staged);
        if let Some(up_to_date) = branch_up_to_date(&status) {
            facts.set(FactKey::UpToDate, up_to_date);
        }

        SourceResult::Found(facts)
    }
}

/// Run a git command in `path` and return its trimmed stdout.
async fn git(path: &Path, args: &[&str]) -> SourceResult<String> {
    let mut command = Command::new("git");
    let _ = command
        .arg("-C")
        .arg(path)
        .args(args)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true);

    let child = match command.spawn() {
        Ok(child) => child,
        Err(e) => return SourceResult::Unavailable(format!("could not run git: {e}")),
    };

    let output = match tokio::time::timeout(GIT_TIMEOUT, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return SourceResult::Unavailable(format!("'git {}' failed to run: {e}", args.join(" "))),
        Err(_) => {
            return SourceResult::Unavailable(format!(
                "'git {}' timed out after {} seconds",
                args.join(" "),
                GIT_TIMEOUT.as_secs()
            ));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return SourceResult::Unavailable(format!("'git {}' failed: {}", args.join(" "), stderr.trim()));
    }

    match String::from_utf8(output.stdout) {
        Ok(stdout) => SourceResult::Found(stdout.trim_end().to_string()),
        Err(_) => SourceResult::Malformed(format!("'git {}' produced non-UTF-8 output", args.join(" "))),
    }
}

/// Author time of a revision as a UTC timestamp.
async fn commit_time(path: &Path, rev: &str) -> SourceResult<DateTime<Utc>> {
    let raw = try_found!(git(path, &["show", "-s", "--format=%aI", rev]).await);
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(dt) => SourceResult::Found(dt.to_utc()),
        Err(e) => SourceResult::Malformed(format!("could not parse commit time '{}': {e}", raw.trim())),
    }
}

/// Pick the greatest tag, ignoring a leading `v`.
///
/// Tags that parse as semantic versions are compared as versions; when none
/// do, the lexically greatest stripped tag wins.
fn greatest_tag<'a>(tags: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let tags: Vec<&str> = tags.map(str::trim).filter(|t| !t.is_empty()).collect();

    let best_semver = tags
        .iter()
        .filter_map(|t| semver::Version::parse(t.trim_start_matches('v')).ok().map(|v| (v, *t)))
        .max_by(|(a, _), (b, _)| a.cmp(b));

    if let Some((_, tag)) = best_semver {
        return Some(tag);
    }

    tags.into_iter().max_by_key(|t| t.trim_start_matches('v'))
}

/// Classify `git status --porcelain` entries into (unstaged, staged) changes.
fn worktree_state(status: &str) -> (bool, bool) {
    let mut unstaged = false;
    let mut staged = false;

    for line in status.lines() {
        if line.starts_with("##") {
            continue;
        }

        let mut chars = line.chars();
        let index_state = chars.next().unwrap_or(' ');
        let worktree_state = chars.next().unwrap_or(' ');

        if index_state == '?' {
            unstaged = true;
            continue;
        }
        if worktree_state != ' ' {
            unstaged = true;
        }
        if index_state != ' ' {
            staged = true;
        }
    }

    (unstaged, staged)
}

/// Whether the current branch matches its upstream.
///
/// Returns `None` when there is no upstream to compare against, so the fact
/// is omitted rather than guessed.
fn branch_up_to_date(status: &str) -> Option<bool> {
    let branch_line = status.lines().find(|l| l.starts_with("##"))?;
    if !branch_line.contains("...") {
        return None;
    }
    Some(!branch_line.contains("[ahead") && !branch_line.contains("[behind") && !branch_line.contains("[gone"))
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(identifier: &str) -> PathBuf {
    if identifier == "~" || identifier.starts_with("~/") {
        if let Some(base) = BaseDirs::new() {
            return base.home_dir().join(identifier.trim_start_matches('~').trim_start_matches('/'));
        }
    }
    PathBuf::from(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greatest_tag_semver() {
        let tags = ["v1.2.0", "v1.10.0", "v1.9.3"];
        assert_eq!(greatest_tag(tags.into_iter()), Some("v1.10.0"));
    }

    #[test]
    fn test_greatest_tag_mixed_prefix() {
        let tags = ["0.3.0", "v0.10.1", "0.9.0"];
        assert_eq!(greatest_tag(tags.into_iter()), Some("v0.10.1"));
    }

    #[test]
    fn test_greatest_tag_non_semver_falls_back_to_lexical() {
        let tags = ["release-a", "release-c", "release-b"];
        assert_eq!(greatest_tag(tags.into_iter()), Some("release-c"));
    }

    #[test]
    fn test_greatest_tag_empty() {
        assert_eq!(greatest_tag(core::iter::empty()), None);
    }

    #[test]
    fn test_worktree_state_clean() {
        let status = "## main...origin/main";
        assert_eq!(worktree_state(status), (false, false));
    }

    #[test]
    fn test_worktree_state_unstaged_only() {
        let status = "## main...origin/main\n M src/lib.rs";
        assert_eq!(worktree_state(status), (true, false));
    }

    #[test]
    fn test_worktree_state_staged_only() {
        let status = "## main\nM  src/lib.rs";
        assert_eq!(worktree_state(status), (false, true));
    }

    #[test]
    fn test_worktree_state_untracked_counts_as_unstaged() {
        let status = "?? notes.txt";
        assert_eq!(worktree_state(status), (true, false));
    }

    #[test]
    fn test_worktree_state_staged_and_modified() {
        let status = "MM src/lib.rs";
        assert_eq!(worktree_state(status), (true, true));
    }

    #[test]
    fn test_branch_up_to_date() {
        assert_eq!(branch_up_to_date("## main...origin/main"), Some(true));
        assert_eq!(branch_up_to_date("## main...origin/main [ahead 2]"), Some(false));
        assert_eq!(branch_up_to_date("## main...origin/main [behind 1]"), Some(false));
        assert_eq!(branch_up_to_date("## main"), None);
        assert_eq!(branch_up_to_date(" M src/lib.rs"), None);
    }

    #[test]
    fn test_expand_home_passthrough() {
        assert_eq!(expand_home("/src/alpha"), PathBuf::from("/src/alpha"));
        assert_eq!(expand_home("relative/path"), PathBuf::from("relative/path"));
    }

    #[tokio::test]
    async fn test_fetch_missing_directory_is_unavailable() {
        let adapter = VersionControlAdapter::new();
        let result = adapter.fetch("/definitely/not/a/real/checkout").await;

        assert!(matches!(result, SourceResult::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_non_repository_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = VersionControlAdapter::new();
        let result = adapter.fetch(dir.path().to_str().unwrap()).await;

        assert!(matches!(result, SourceResult::Unavailable(_)));
    }
}
