use crate::facts::{FactKey, FactSet, SourceAdapter, SourceResult};
use async_trait::async_trait;
use core::time::Duration;
use tokio::process::Command;

const LOG_TARGET: &str = "  frontend";
const BOWER_TIMEOUT: Duration = Duration::from_secs(60);

/// Adapter for the Bower front-end registry. The identifier is the package name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontendRegistryAdapter;

impl FrontendRegistryAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SourceAdapter for FrontendRegistryAdapter {
    async fn fetch(&self, identifier: &str) -> SourceResult {
        log::info!(target: LOG_TARGET, "Querying bower for package '{identifier}'");

        let mut command = Command::new("bower");
        let _ = command
            .args(["info", identifier, "--json", "--loglevel=error"])
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => return SourceResult::Unavailable(format!("could not run bower: {e}")),
        };

        let output = match tokio::time::timeout(BOWER_TIMEOUT, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return SourceResult::Unavailable(format!("'bower info {identifier}' failed to run: {e}")),
            Err(_) => {
                return SourceResult::Unavailable(format!(
                    "'bower info {identifier}' timed out after {} seconds",
                    BOWER_TIMEOUT.as_secs()
                ));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return SourceResult::Unavailable(format!("'bower info {identifier}' failed: {}", stderr.trim()));
        }

        parse_bower_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Extract facts from `bower info --json` output.
///
/// The output is either the package manifest itself or an object whose
/// `latest` field holds the manifest.
fn parse_bower_output(stdout: &str) -> SourceResult {
    let value: serde_json::Value = match serde_json::from_str(stdout.trim()) {
        Ok(value) => value,
        Err(e) => return SourceResult::Malformed(format!("bower output is not valid JSON: {e}")),
    };

    let manifest = match value.get("latest") {
        Some(latest) if latest.is_object() => latest,
        _ => &value,
    };

    if !manifest.is_object() {
        return SourceResult::Malformed("bower output has no package manifest".to_string());
    }

    let mut facts = FactSet::new();
    for (key, field) in [
        (FactKey::Name, "name"),
        (FactKey::Version, "version"),
        (FactKey::Homepage, "homepage"),
        (FactKey::Description, "description"),
    ] {
        if let Some(text) = manifest.get(field).and_then(serde_json::Value::as_str) {
            facts.set_text(key, text);
        }
    }

    // The license field may be a single string or a list of them
    match manifest.get("license") {
        Some(serde_json::Value::String(license)) => facts.set_text(FactKey::License, license),
        Some(serde_json::Value::Array(licenses)) => {
            let joined = licenses
                .iter()
                .filter_map(serde_json::Value::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            facts.set_text(FactKey::License, joined);
        }
        _ => {}
    }

    SourceResult::Found(facts)
}
