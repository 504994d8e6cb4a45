//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::merge::{DurabilityMode, MergeOptions};

use super::SOURCE_DIR_DEFAULT;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// Per-directory and per-file detail
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration for one merge run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Folder under the working directory used as the source when no explicit root is set
    pub source_dir_name: String,
    /// Explicit source root; overrides `<cwd>/<source_dir_name>`
    pub source_root: Option<PathBuf>,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// fsync each copied file when true
    pub durable: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir_name: SOURCE_DIR_DEFAULT.to_string(),
            source_root: None,
            log_level: LogLevel::Normal,
            log_file: None,
            durable: false,
        }
    }
}

impl Config {
    /// Source root for a run started in `cwd`.
    pub fn resolve_source_root(&self, cwd: &Path) -> PathBuf {
        match &self.source_root {
            Some(root) => root.clone(),
            None => cwd.join(&self.source_dir_name),
        }
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            durability: if self.durable {
                DurabilityMode::Full
            } else {
                DurabilityMode::Data
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parse_aliases() {
        assert_eq!(LogLevel::parse("QUIET"), Some(LogLevel::Quiet));
        assert_eq!(LogLevel::parse("verbose"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
        assert!("bogus".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Info.to_string(), "info");
    }

    #[test]
    fn source_root_defaults_under_cwd() {
        let cfg = Config::default();
        assert_eq!(
            cfg.resolve_source_root(Path::new("/work")),
            PathBuf::from("/work/PAR")
        );
        let cfg = Config {
            source_root: Some(PathBuf::from("/explicit")),
            ..Config::default()
        };
        assert_eq!(
            cfg.resolve_source_root(Path::new("/work")),
            PathBuf::from("/explicit")
        );
    }

    #[test]
    fn durable_maps_to_full_sync() {
        let cfg = Config { durable: true, ..Config::default() };
        assert_eq!(cfg.merge_options().durability, DurabilityMode::Full);
        assert_eq!(Config::default().merge_options().durability, DurabilityMode::Data);
    }
}
