use super::fact::{FactKey, FactValue};
use std::collections::BTreeMap;

/// Normalized facts reported by one adapter invocation for one project.
///
/// Keys are drawn from the shared [`FactKey`] vocabulary; iteration is in key
/// display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactSet {
    facts: BTreeMap<FactKey, FactValue>,
}

impl FactSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fact, replacing any previous value for the same key.
    pub fn set(&mut self, key: FactKey, value: impl Into<FactValue>) {
        let _ = self.facts.insert(key, value.into());
    }

    /// Record a string fact, skipping empty or whitespace-only values.
    ///
    /// Sources frequently return `""` or `null` for fields they technically
    /// have but never populated; an empty claim is worse than no claim.
    pub fn set_text(&mut self, key: FactKey, value: impl AsRef<str>) {
        let value = value.as_ref().trim();
        if !value.is_empty() {
            self.set(key, value);
        }
    }

    /// Record an optional fact, skipping `None`.
    pub fn set_opt(&mut self, key: FactKey, value: Option<impl Into<FactValue>>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    #[must_use]
    pub fn get(&self, key: FactKey) -> Option<&FactValue> {
        self.facts.get(&key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FactKey, &FactValue)> {
        self.facts.iter().map(|(k, v)| (*k, v))
    }
}

impl IntoIterator for FactSet {
    type Item = (FactKey, FactValue);
    type IntoIter = std::collections::btree_map::IntoIter<FactKey, FactValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.into_iter()
    }
}

impl FromIterator<(FactKey, FactValue)> for FactSet {
    fn from_iter<I: IntoIterator<Item = (FactKey, FactValue)>>(iter: I) -> Self {
        Self {
            facts: iter.into_iter().collect(),
        }
    }
}
