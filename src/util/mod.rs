//! Utility functions and helpers

pub mod cmd;
pub mod trash;

pub use cmd::{display_cmd, log_cmd};
pub use trash::{remove_dir_preferring_trash, RemovalMethod};
