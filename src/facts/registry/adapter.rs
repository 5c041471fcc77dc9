use crate::Result;
use crate::facts::source_result::try_found;
use crate::facts::{FactKey, FactSet, SourceAdapter, SourceResult, http};
use async_trait::async_trait;
use serde::Deserialize;

const LOG_TARGET: &str = "  registry";

const PYPI_API: &str = "https://pypi.org/pypi";

#[derive(Debug, Deserialize)]
struct PypiResponse {
    info: PypiInfo,
}

#[derive(Debug, Deserialize)]
struct PypiInfo {
    name: String,
    version: Option<String>,
    summary: Option<String>,
    license: Option<String>,
    home_page: Option<String>,
    downloads: Option<PypiDownloads>,
}

/// The registry serves `-1` placeholders here when download counts are
/// disabled, which is the usual case nowadays.
#[derive(Debug, Deserialize)]
struct PypiDownloads {
    last_month: Option<i64>,
}

/// Adapter for the PyPI package registry. The identifier is the package name.
#[derive(Debug, Clone)]
pub struct PackageRegistryAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl PackageRegistryAdapter {
    pub fn new() -> Result<Self> {
        Self::with_base_url(PYPI_API)
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
impl SourceAdapter for PackageRegistryAdapter {
    async fn fetch(&self, identifier: &str) -> SourceResult {
        log::info!(target: LOG_TARGET, "Querying PyPI for package '{identifier}'");

        let url = format!("{}/{identifier}/json", self.base_url);
        let resp: PypiResponse = try_found!(http::get_json(&self.client, &url).await);

        let mut facts = FactSet::new();
        facts.set_text(FactKey::Name, &resp.info.name);
        facts.set_text(FactKey::Version, resp.info.version.unwrap_or_default());
        facts.set_text(FactKey::Description, resp.info.summary.unwrap_or_default());
        facts.set_text(FactKey::License, resp.info.license.unwrap_or_default());
        facts.set_text(FactKey::Homepage, resp.info.home_page.unwrap_or_default());

        let downloads = resp.info.downloads.and_then(|d| d.last_month).filter(|&count| count >= 0);
        if let Some(downloads) = downloads {
            facts.set(FactKey::Downloads, downloads.unsigned_abs());
        }

        SourceResult::Found(facts)
    }
}
