use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The classes of data source a project can be tracked against.
///
/// Each kind maps to exactly one registered [`SourceAdapter`](super::SourceAdapter)
/// implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// A local version-control checkout (a filesystem path).
    VersionControl,

    /// A remote hosting platform such as GitHub or GitLab (an `owner/repo` slug or URL).
    Hosting,

    /// A language package registry (a package name on PyPI).
    PackageRegistry,

    /// A front-end dependency registry (a package name on Bower).
    FrontendRegistry,

    /// A continuous-integration service (a Travis `owner/repo` slug).
    Ci,
}
