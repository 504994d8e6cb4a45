//! Actionable hints for common I/O failures.
//!
//! Raw OS codes are checked first (libc on Unix, Win32 codes on Windows),
//! then `io::ErrorKind` as a fallback for synthetic errors.

use std::io;

/// Return a short hint for well-known failure causes, if any.
pub fn io_hint(e: &io::Error) -> Option<&'static str> {
    if let Some(code) = e.raw_os_error() {
        if let Some(h) = os_hint(code) {
            return Some(h);
        }
    }
    kind_hint(e.kind())
}

#[cfg(unix)]
fn os_hint(code: i32) -> Option<&'static str> {
    let h = match code {
        libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
        libc::ENOENT => "path not found; verify it exists",
        libc::EEXIST => "already exists; remove the target first",
        libc::EISDIR => "is a directory; a file cannot replace a directory",
        libc::ENOTDIR => "not a directory; a path component is a file",
        libc::ENOSPC => "insufficient space on device",
        libc::EROFS => "read-only filesystem; cannot write here",
        libc::ELOOP => "too many symbolic link levels; possible symlink cycle",
        libc::ENAMETOOLONG => "filename or path too long; shorten path segments",
        libc::EMFILE => "process file descriptor limit reached; close files or raise limits",
        libc::ENFILE => "system-wide file table overflow; reduce open files",
        _ => return None,
    };
    Some(h)
}

#[cfg(windows)]
fn os_hint(code: i32) -> Option<&'static str> {
    let h = match code {
        5 => "access denied; check permissions",              // ERROR_ACCESS_DENIED
        32 => "sharing violation; file is in use",            // ERROR_SHARING_VIOLATION
        2 | 3 => "path not found; verify it exists",          // FILE/PATH NOT FOUND
        80 | 183 => "already exists; remove the target first", // ERROR_FILE_EXISTS / ALREADY_EXISTS
        112 => "insufficient disk space",                     // ERROR_DISK_FULL
        19 => "write protected / read-only media",            // ERROR_WRITE_PROTECT
        206 => "filename or path too long (MAX_PATH exceeded)", // ERROR_FILENAME_EXCED_RANGE
        4 => "too many open files; close handles or increase limit", // ERROR_TOO_MANY_OPEN_FILES
        _ => return None,
    };
    Some(h)
}

#[cfg(not(any(unix, windows)))]
fn os_hint(_code: i32) -> Option<&'static str> {
    None
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => {
            Some("permission denied; check ownership and write permissions")
        }
        io::ErrorKind::NotFound => Some("path not found; verify it exists"),
        io::ErrorKind::AlreadyExists => Some("already exists; remove the target first"),
        io::ErrorKind::NotADirectory => Some("not a directory"),
        io::ErrorKind::IsADirectory => Some("is a directory; a file cannot replace a directory"),
        _ => None,
    }
}
