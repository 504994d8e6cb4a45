//! Tree merge: replicate every file under a source root at the same relative
//! path under a destination root, replacing files that already exist there.
//!
//! Directories are created on demand; destination entries with no source
//! counterpart are left alone. The first failure aborts the merge, files copied
//! before that point stay in place.

mod copy;
pub mod hints;

pub use copy::DurabilityMode;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};
use walkdir::WalkDir;

use crate::errors::MergeError;

/// Per-run knobs for the merge.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    pub durability: DurabilityMode,
}

/// Counters collected during a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub directories_created: u64,
    pub files_copied: u64,
    /// Subset of `files_copied` that replaced an existing destination entry.
    pub files_replaced: u64,
    pub bytes_copied: u64,
}

/// Merge `source_root` into `destination_root` with default options.
pub fn merge(source_root: &Path, destination_root: &Path) -> Result<MergeSummary, MergeError> {
    merge_with(source_root, destination_root, &MergeOptions::default())
}

/// Merge `source_root` into `destination_root`.
///
/// `source_root` must be a readable directory. `destination_root` and any
/// missing ancestors are created.
pub fn merge_with(
    source_root: &Path,
    destination_root: &Path,
    opts: &MergeOptions,
) -> Result<MergeSummary, MergeError> {
    let mut summary = MergeSummary::default();
    info!(src = %source_root.display(), dest = %destination_root.display(), "Merging tree");

    for entry in WalkDir::new(source_root).follow_links(false) {
        let entry = entry.map_err(|e| enumerate_error(source_root, e))?;
        let target = destination_for(source_root, destination_root, entry.path()).ok_or_else(
            || MergeError::Enumerate {
                path: entry.path().to_path_buf(),
                source: io::Error::other("entry is outside the source root"),
            },
        )?;

        // the root is followed even when it is a symlink; its entry still reports the link type
        if entry.file_type().is_dir() || (entry.depth() == 0 && entry.path().is_dir()) {
            ensure_dir(&target, &mut summary)?;
            continue;
        }

        if entry.depth() == 0 {
            return Err(MergeError::Enumerate {
                path: source_root.to_path_buf(),
                source: io::Error::from(io::ErrorKind::NotADirectory),
            });
        }

        if entry.path_is_symlink() && entry.path().is_dir() {
            debug!(path = %entry.path().display(), "Skipping symlink to directory");
            continue;
        }

        merge_file(entry.path(), &target, opts, &mut summary)?;
    }

    info!(
        dirs_created = summary.directories_created,
        files_copied = summary.files_copied,
        files_replaced = summary.files_replaced,
        bytes = summary.bytes_copied,
        "Merge completed"
    );
    Ok(summary)
}

fn ensure_dir(dir: &Path, summary: &mut MergeSummary) -> Result<(), MergeError> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| MergeError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    summary.directories_created += 1;
    debug!(path = %dir.display(), "Created directory");
    Ok(())
}

/// Remove-then-copy a single file.
fn merge_file(
    src: &Path,
    dst: &Path,
    opts: &MergeOptions,
    summary: &mut MergeSummary,
) -> Result<(), MergeError> {
    // symlink_metadata so a dangling link at the destination is also replaced
    let replaced = match fs::symlink_metadata(dst) {
        Ok(_) => {
            fs::remove_file(dst).map_err(|source| MergeError::RemoveFile {
                path: dst.to_path_buf(),
                source,
            })?;
            trace!(path = %dst.display(), "Removed existing destination file");
            true
        }
        Err(_) => false,
    };

    let copy_err = |source| MergeError::Copy {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source,
    };
    let src_meta = fs::metadata(src).map_err(copy_err)?;
    // FIFOs and device nodes would block or never end on open/read
    if !src_meta.file_type().is_file() {
        return Err(copy_err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    let bytes = copy::copy_file(src, dst, opts.durability).map_err(copy_err)?;
    copy::mirror_permissions(dst, &src_meta);

    summary.files_copied += 1;
    summary.bytes_copied += bytes;
    if replaced {
        summary.files_replaced += 1;
    }
    debug!(src = %src.display(), dest = %dst.display(), bytes, replaced, "Copied file");
    Ok(())
}

fn enumerate_error(source_root: &Path, e: walkdir::Error) -> MergeError {
    let path = e
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| source_root.to_path_buf());
    let source = match e.into_io_error() {
        Some(io) => io,
        None => io::Error::other("filesystem loop detected"),
    };
    MergeError::Enumerate { path, source }
}

/// Destination counterpart of `path` under `destination_root`, or `None` if
/// `path` is not under `source_root`.
pub fn destination_for(source_root: &Path, destination_root: &Path, path: &Path) -> Option<PathBuf> {
    path.strip_prefix(source_root)
        .ok()
        .map(|rel| destination_root.join(rel))
}
