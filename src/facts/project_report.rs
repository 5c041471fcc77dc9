use super::fact::{FactKey, FactValue};
use super::source_kind::SourceKind;
use super::source_result::SourceFailure;
use std::collections::BTreeMap;

/// One value claimed for a fact, with every source that reported it.
///
/// Sources reporting the identical value share one claim rather than
/// appearing as separate entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub value: FactValue,
    pub sources: Vec<SourceKind>,
}

/// The merged view of one project: every claim from every successful source,
/// ordered so the winning (highest-precedence) claim comes first, plus the
/// failures encountered along the way.
///
/// A report exists for every configured project, even when every source
/// failed: empty facts and a populated failure list is valid output, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReport {
    name: String,
    facts: BTreeMap<FactKey, Vec<Claim>>,
    failures: Vec<SourceFailure>,
}

impl ProjectReport {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            facts: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record one source's claim for a fact.
    ///
    /// Call order is precedence order: the first claim recorded for a key is
    /// the winning one. A source claiming a value some earlier source already
    /// claimed is appended to that claim's source list instead of creating a
    /// duplicate entry.
    pub fn record_claim(&mut self, key: FactKey, value: FactValue, source: SourceKind) {
        let claims = self.facts.entry(key).or_default();

        if let Some(claim) = claims.iter_mut().find(|c| c.value == value) {
            if !claim.sources.contains(&source) {
                claim.sources.push(source);
            }
        } else {
            claims.push(Claim {
                value,
                sources: vec![source],
            });
        }
    }

    pub fn record_failure(&mut self, failure: SourceFailure) {
        self.failures.push(failure);
    }

    /// All claims for a key, winning claim first. Empty if no source reported it.
    #[must_use]
    pub fn claims(&self, key: FactKey) -> &[Claim] {
        self.facts.get(&key).map_or(&[], Vec::as_slice)
    }

    /// The winning value for a key, if any source reported it.
    #[must_use]
    pub fn winning_value(&self, key: FactKey) -> Option<&FactValue> {
        self.facts.get(&key).and_then(|claims| claims.first()).map(|c| &c.value)
    }

    /// All facts with at least one claim, in key display order.
    pub fn facts(&self) -> impl Iterator<Item = (FactKey, &[Claim])> {
        self.facts.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    #[must_use]
    pub fn failures(&self) -> &[SourceFailure] {
        &self.failures
    }

    #[must_use]
    pub fn has_facts(&self) -> bool {
        !self.facts.is_empty()
    }

    /// Returns `true` when every applicable source failed.
    #[must_use]
    pub fn is_complete_failure(&self) -> bool {
        self.facts.is_empty() && !self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::source_result::FailureKind;

    #[test]
    fn test_first_claim_wins() {
        let mut report = ProjectReport::new("alpha");
        report.record_claim(FactKey::Version, FactValue::String("2.0".into()), SourceKind::VersionControl);
        report.record_claim(FactKey::Version, FactValue::String("1.9".into()), SourceKind::PackageRegistry);

        assert_eq!(report.winning_value(FactKey::Version), Some(&FactValue::String("2.0".into())));
        assert_eq!(report.claims(FactKey::Version).len(), 2);
    }

    #[test]
    fn test_identical_values_share_a_claim() {
        let mut report = ProjectReport::new("alpha");
        report.record_claim(FactKey::Name, FactValue::String("alpha".into()), SourceKind::VersionControl);
        report.record_claim(FactKey::Name, FactValue::String("alpha".into()), SourceKind::Hosting);

        let claims = report.claims(FactKey::Name);
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].sources, vec![SourceKind::VersionControl, SourceKind::Hosting]);
    }

    #[test]
    fn test_duplicate_source_not_repeated() {
        let mut report = ProjectReport::new("alpha");
        report.record_claim(FactKey::Stars, FactValue::UInt(5), SourceKind::Hosting);
        report.record_claim(FactKey::Stars, FactValue::UInt(5), SourceKind::Hosting);

        assert_eq!(report.claims(FactKey::Stars)[0].sources, vec![SourceKind::Hosting]);
    }

    #[test]
    fn test_empty_report() {
        let report = ProjectReport::new("gamma");
        assert!(!report.has_facts());
        assert!(!report.is_complete_failure());
        assert!(report.winning_value(FactKey::Name).is_none());
        assert!(report.claims(FactKey::Name).is_empty());
    }

    #[test]
    fn test_complete_failure() {
        let mut report = ProjectReport::new("gamma");
        report.record_failure(SourceFailure {
            source: SourceKind::PackageRegistry,
            kind: FailureKind::Unavailable,
            message: "connection refused".into(),
        });

        assert!(report.is_complete_failure());
        assert_eq!(report.failures().len(), 1);
    }

    #[test]
    fn test_facts_iterate_in_key_order() {
        let mut report = ProjectReport::new("alpha");
        report.record_claim(FactKey::Watchers, FactValue::UInt(3), SourceKind::Hosting);
        report.record_claim(FactKey::Name, FactValue::String("alpha".into()), SourceKind::Hosting);

        let keys: Vec<_> = report.facts().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![FactKey::Name, FactKey::Watchers]);
    }
}
