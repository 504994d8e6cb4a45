//! Core library for `tree_merge`.
//!
//! The merge itself lives in [`merge`] and takes both roots explicitly; deriving
//! the default source root from the working directory is left to the binary.

pub mod cli;
pub mod config;
pub mod errors;
pub mod merge;
pub mod output;
pub mod platform;

pub use config::{default_config_path, path_has_symlink_ancestor, Config, LogLevel};
pub use errors::MergeError;
pub use merge::{merge, merge_with, DurabilityMode, MergeOptions, MergeSummary};
