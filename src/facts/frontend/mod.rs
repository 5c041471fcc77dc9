//! Front-end registry source (Bower).
//!
//! Bower has no public HTTP API worth speaking of, so this adapter shells out
//! to the `bower` CLI the same way the version-control adapter shells out to
//! `git`.

mod adapter;

pub use adapter::FrontendRegistryAdapter;
