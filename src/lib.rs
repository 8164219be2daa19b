//! Blockfall (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof so the binary, the
//! integration tests and the benchmarks can write `blockfall::core::...`
//! while the implementation lives in dedicated crates under `crates/`.

pub use blockfall_core as core;
pub use blockfall_engine as engine;
pub use blockfall_input as input;
pub use blockfall_stats as stats;
pub use blockfall_term as term;
pub use blockfall_types as types;
