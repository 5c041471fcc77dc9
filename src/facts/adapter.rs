use super::source_kind::SourceKind;
use super::source_result::SourceResult;
use crate::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A pluggable translator from one external data source into normalized facts.
///
/// Implementations are stateless per call: `fetch` may perform network or
/// filesystem I/O but must not mutate shared state, so calls are safe to run
/// concurrently across projects and across kinds. Failures are always
/// expressed through [`SourceResult`], never as a panic or a run-level error,
/// so one bad source can never take down its siblings.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Fetch facts for the project named by `identifier`.
    ///
    /// The identifier's format is scoped to this adapter's kind; callers
    /// treat it as opaque.
    async fn fetch(&self, identifier: &str) -> SourceResult;
}

/// The wiring from each [`SourceKind`] to its adapter, supplied at startup.
#[derive(Clone)]
pub struct AdapterRegistry {
    adapters: BTreeMap<SourceKind, Arc<dyn SourceAdapter>>,
}

impl core::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("kinds", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AdapterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapters: BTreeMap::new(),
        }
    }

    /// The standard wiring: one adapter per kind, with optional hosting
    /// tokens passed through to the hosting adapter.
    pub fn standard(github_token: Option<&str>, gitlab_token: Option<&str>) -> Result<Self> {
        Ok(Self::new()
            .with(SourceKind::VersionControl, super::vcs::VersionControlAdapter::new())
            .with(SourceKind::Hosting, super::hosting::HostingAdapter::new(github_token, gitlab_token)?)
            .with(SourceKind::PackageRegistry, super::registry::PackageRegistryAdapter::new()?)
            .with(SourceKind::FrontendRegistry, super::frontend::FrontendRegistryAdapter::new())
            .with(SourceKind::Ci, super::ci::CiAdapter::new()?))
    }

    /// Register an adapter for a kind, replacing any previous registration.
    #[must_use]
    pub fn with(mut self, kind: SourceKind, adapter: impl SourceAdapter + 'static) -> Self {
        let _ = self.adapters.insert(kind, Arc::new(adapter));
        self
    }

    #[must_use]
    pub fn get(&self, kind: SourceKind) -> Option<&Arc<dyn SourceAdapter>> {
        self.adapters.get(&kind)
    }

    #[must_use]
    pub fn contains(&self, kind: SourceKind) -> bool {
        self.adapters.contains_key(&kind)
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
