//! Local version-control source.
//!
//! Facts are gathered by running `git` against a checkout on the local
//! filesystem; nothing is fetched from the network.

mod adapter;

pub use adapter::VersionControlAdapter;
