//! Aggregation crate re-exported by the root `kiln` package.

pub use kiln_core as core;
pub use kiln_eval as eval;
pub use kiln_store as store;
