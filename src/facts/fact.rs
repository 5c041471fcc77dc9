use chrono::{DateTime, Utc};
use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// The shared vocabulary of fact names adapters can report.
///
/// Two adapters reporting the same concept must use the same key so the merge
/// step can reconcile their claims. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, StrumDisplay, EnumIter, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FactKey {
    Name,
    Description,
    Version,
    Homepage,
    Created,
    Updated,
    License,
    Language,
    TestsPassing,
    CommitCount,
    FileCount,
    UnstagedChanges,
    UncommittedChanges,
    UpToDate,
    Contributors,
    Downloads,
    OpenIssues,
    OpenPullRequests,
    Forks,
    Stars,
    Subscribers,
    Watchers,
}

impl FactKey {
    /// The keys shown by the short report form, in display order.
    pub const SHORT_COUNT: usize = 9;
}

/// A typed fact value.
///
/// The derived ordering (variant first, then value) gives reports a total
/// order for sorting projects by an arbitrary key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FactValue {
    UInt(u64),
    Bool(bool),
    String(String),
    DateTime(DateTime<Utc>),
}

impl Display for FactValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UInt(u) => write!(f, "{u}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<u64> for FactValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for FactValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}
