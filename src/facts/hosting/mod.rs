//! Hosting-platform source.
//!
//! One adapter covers every supported host; the host is chosen per project
//! from the identifier itself (`owner/repo`, `gitlab:group/project`, or a
//! full URL).

mod adapter;
mod host_spec;

pub use adapter::HostingAdapter;
pub use host_spec::{HostKind, HostSpec};
