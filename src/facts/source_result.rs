use super::fact_set::FactSet;
use super::source_kind::SourceKind;
use serde::{Deserialize, Serialize};
use strum::Display;

/// The outcome of asking one source about one project.
///
/// Neither failure variant is fatal to the run: both are recorded in the
/// project's report and sibling sources keep going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceResult<T = FactSet> {
    /// The source responded and its response was normalized into facts.
    Found(T),

    /// The source could not be reached, refused the request, or has no such
    /// project (network, auth, not-found).
    Unavailable(String),

    /// The source responded but the response could not be parsed into the
    /// expected shape.
    Malformed(String),
}

impl<T> SourceResult<T> {
    /// Returns `true` if the result is `Found`.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns a reference to the contained data if `Found`, otherwise `None`.
    #[must_use]
    pub const fn found(&self) -> Option<&T> {
        match self {
            Self::Found(data) => Some(data),
            _ => None,
        }
    }

    /// Converts this result into an `Option`, returning `Some` only for `Found`.
    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Found(data) => Some(data),
            _ => None,
        }
    }

    /// The report-side failure record for a non-`Found` outcome.
    #[must_use]
    pub fn failure(&self, source: SourceKind) -> Option<SourceFailure> {
        match self {
            Self::Found(_) => None,
            Self::Unavailable(message) => Some(SourceFailure {
                source,
                kind: FailureKind::Unavailable,
                message: message.clone(),
            }),
            Self::Malformed(message) => Some(SourceFailure {
                source,
                kind: FailureKind::Malformed,
                message: message.clone(),
            }),
        }
    }

    /// Returns a string describing the status of this result.
    #[must_use]
    pub const fn status_str(&self) -> &'static str {
        match self {
            Self::Found(_) => "Found",
            Self::Unavailable(_) => "Unavailable",
            Self::Malformed(_) => "Malformed",
        }
    }
}

/// Macro to unwrap a `SourceResult` or propagate the failure to the caller.
macro_rules! try_found {
    ($expr:expr) => {
        match $expr {
            $crate::facts::SourceResult::Found(data) => data,
            $crate::facts::SourceResult::Unavailable(m) => return $crate::facts::SourceResult::Unavailable(m),
            $crate::facts::SourceResult::Malformed(m) => return $crate::facts::SourceResult::Malformed(m),
        }
    };
}

pub(crate) use try_found;

/// How a source failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Unavailable,
    Malformed,
}

/// One recorded failure: which source, how it failed, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source: SourceKind,
    pub kind: FailureKind,
    pub message: String,
}
