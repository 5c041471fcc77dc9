use super::adapter::AdapterRegistry;
use super::project_report::ProjectReport;
use super::project_spec::ProjectSpec;
use super::source_kind::SourceKind;
use super::source_result::SourceResult;
use super::throttler::Throttler;
use crate::Result;
use futures_util::future::join_all;
use ohno::bail;
use std::sync::Arc;

const LOG_TARGET: &str = "aggregator";
const MAX_CONCURRENT_FETCHES: usize = 8;

/// Drives every applicable source adapter for every configured project and
/// merges the outcomes into one report per project.
///
/// Fetches run concurrently across projects and source kinds, bounded by a
/// [`Throttler`]. Results are buffered per project and merged in the
/// configured precedence order, never in completion order, so the merged
/// output is deterministic no matter how the network behaves.
#[derive(Debug)]
pub struct Aggregator {
    registry: AdapterRegistry,
    precedence: Vec<SourceKind>,
    throttler: Arc<Throttler>,
}

impl Aggregator {
    #[must_use]
    pub fn new(registry: AdapterRegistry, precedence: Vec<SourceKind>) -> Self {
        Self {
            registry,
            precedence,
            throttler: Throttler::new(MAX_CONCURRENT_FETCHES),
        }
    }

    /// Check that the run is structurally sound before any adapter is invoked.
    ///
    /// A project list with no entries, or a project referencing a source kind
    /// with no registered adapter, is a configuration error and aborts the
    /// whole run. Data-level problems never do.
    pub fn validate(&self, projects: &[ProjectSpec]) -> Result<()> {
        if projects.is_empty() {
            bail!("no projects configured");
        }

        for project in projects {
            for kind in project.source_kinds() {
                if !self.registry.contains(kind) {
                    bail!("no adapter registered for source kind '{kind}' (referenced by project '{project}')");
                }
            }
        }

        Ok(())
    }

    /// Collect facts for every project and merge them into reports.
    ///
    /// Every configured project yields exactly one report, in the order
    /// given, even when every one of its sources fails. Only structural
    /// configuration problems produce an error.
    pub async fn collect(&self, projects: &[ProjectSpec]) -> Result<Vec<ProjectReport>> {
        self.validate(projects)?;

        let mut fetches = Vec::new();
        for (index, project) in projects.iter().enumerate() {
            for (kind, identifier) in project.sources() {
                let adapter = Arc::clone(self.registry.get(kind).expect("validated above"));
                let throttler = Arc::clone(&self.throttler);

                fetches.push(async move {
                    let _permit = throttler.acquire().await;
                    log::debug!(target: LOG_TARGET, "Fetching {kind} facts for project '{project}'");
                    let result = adapter.fetch(identifier).await;
                    log::debug!(target: LOG_TARGET, "{kind} fetch for project '{project}' finished: {}", result.status_str());
                    (index, kind, result)
                });
            }
        }

        let results = join_all(fetches).await;

        // Buffer everything per project before merging; completion order must
        // never influence the merge
        let mut buckets: Vec<Vec<(SourceKind, SourceResult)>> = (0..projects.len()).map(|_| Vec::new()).collect();
        for (index, kind, result) in results {
            buckets[index].push((kind, result));
        }

        Ok(projects
            .iter()
            .zip(buckets)
            .map(|(project, results)| self.merge(project, results))
            .collect())
    }

    /// Where a kind ranks for tie-breaking. Kinds absent from the configured
    /// precedence list rank after every listed kind, in declaration order.
    fn precedence_rank(&self, kind: SourceKind) -> usize {
        self.precedence
            .iter()
            .position(|&k| k == kind)
            .unwrap_or(self.precedence.len() + kind as usize)
    }

    /// Merge one project's buffered source results into its report.
    fn merge(&self, project: &ProjectSpec, mut results: Vec<(SourceKind, SourceResult)>) -> ProjectReport {
        results.sort_by_key(|(kind, _)| self.precedence_rank(*kind));

        let mut report = ProjectReport::new(project.name());
        for (kind, result) in results {
            match result {
                SourceResult::Found(facts) => {
                    for (key, value) in facts {
                        report.record_claim(key, value, kind);
                    }
                }
                failure => {
                    if let Some(failure) = failure.failure(kind) {
                        log::warn!(
                            target: LOG_TARGET,
                            "Source {} for project '{project}' {}: {}",
                            failure.source,
                            failure.kind,
                            failure.message
                        );
                        report.record_failure(failure);
                    }
                }
            }
        }

        report
    }
}
