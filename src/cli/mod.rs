//! CLI layer
//!
//! Stage orchestration and terminal output. Argument parsing lives in
//! `main.rs`.

pub mod commands;
pub mod context;
pub mod output;

pub use context::RepoContext;
pub use output::Output;
