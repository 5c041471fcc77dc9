use super::source_kind::SourceKind;
use core::fmt::{Display, Formatter};
use std::collections::BTreeMap;

/// One configured project: a unique name plus the identifiers naming it at
/// each source it should be tracked against.
///
/// Identifiers are opaque to everything but the adapter for their kind: a
/// filesystem path for version control, an `owner/repo` slug or URL for a
/// hosting platform, a package name for a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    name: String,
    identifiers: BTreeMap<SourceKind, String>,
}

impl ProjectSpec {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifiers: BTreeMap::new(),
        }
    }

    /// Attach an identifier for one source kind.
    #[must_use]
    pub fn with_source(mut self, kind: SourceKind, identifier: impl Into<String>) -> Self {
        let _ = self.identifiers.insert(kind, identifier.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn identifier(&self, kind: SourceKind) -> Option<&str> {
        self.identifiers.get(&kind).map(String::as_str)
    }

    /// The source kinds this project carries an identifier for, in kind order.
    pub fn source_kinds(&self) -> impl Iterator<Item = SourceKind> + '_ {
        self.identifiers.keys().copied()
    }

    /// All (kind, identifier) pairs, in kind order.
    pub fn sources(&self) -> impl Iterator<Item = (SourceKind, &str)> {
        self.identifiers.iter().map(|(k, v)| (*k, v.as_str()))
    }

    #[must_use]
    pub fn source_count(&self) -> usize {
        self.identifiers.len()
    }
}

impl Display for ProjectSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name)
    }
}
