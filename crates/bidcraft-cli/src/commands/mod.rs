//! CLI command implementations.

pub mod correct;
pub mod delete;
pub mod export;
pub mod flagged;
pub mod profile;
pub mod recompute;
pub mod serve;
pub mod status;
pub mod suggest;
