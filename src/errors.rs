//! Typed error definitions for tree_merge.
//! One variant per failing filesystem step so logs and tests can tell them apart.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::merge::hints::io_hint;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("cannot enumerate '{}'{}", .path.display(), Hint(.source))]
    Enumerate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create directory '{}'{}", .path.display(), Hint(.source))]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot remove existing destination file '{}'{}", .path.display(), Hint(.source))]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot copy '{}' -> '{}'{}", .from.display(), .to.display(), Hint(.source))]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MergeError {
    /// Stable numeric code, used in structured logs.
    pub fn code(&self) -> u16 {
        match self {
            MergeError::Enumerate { .. } => 10,
            MergeError::CreateDir { .. } => 11,
            MergeError::RemoveFile { .. } => 12,
            MergeError::Copy { .. } => 13,
        }
    }

    /// Short machine-friendly kind label.
    pub fn kind(&self) -> &'static str {
        match self {
            MergeError::Enumerate { .. } => "enumerate",
            MergeError::CreateDir { .. } => "create_dir",
            MergeError::RemoveFile { .. } => "remove_file",
            MergeError::Copy { .. } => "copy",
        }
    }

    /// The underlying I/O error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            MergeError::Enumerate { source, .. }
            | MergeError::CreateDir { source, .. }
            | MergeError::RemoveFile { source, .. }
            | MergeError::Copy { source, .. } => source,
        }
    }
}

/// Renders the optional hint and OS code suffix for an io::Error.
struct Hint<'a>(&'a io::Error);

impl fmt::Display for Hint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(hint) = io_hint(self.0) {
            write!(f, " ({hint})")?;
        }
        if let Some(code) = self.0.raw_os_error() {
            write!(f, " [os code: {code}]")?;
        }
        Ok(())
    }
}
