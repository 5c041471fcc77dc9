//! Continuous-integration source (Travis).

mod adapter;

pub use adapter::CiAdapter;
