use owo_colors::OwoColorize;
use std::ffi::OsStr;
use std::io::{self, Write};

/// Small wrapper around stdout/stderr printing for consistent, colored
/// user-facing messages. Colors are enabled only when the stream is a TTY.
fn is_tty(stream: atty::Stream) -> bool {
    atty::is(stream)
}

pub fn print_info(msg: &str) {
    if is_tty(atty::Stream::Stdout) {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty(atty::Stream::Stderr) {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty(atty::Stream::Stderr) {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

/// Print an OS string as one plain line with no prefix or color. Used for the
/// destination echo, which callers may script against. Byte-for-byte on Unix so
/// non-UTF-8 paths are echoed exactly; other platforms fall back to a lossy conversion.
pub fn print_user_os(s: &OsStr) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        stdout.write_all(s.as_bytes())?;
    }
    #[cfg(not(unix))]
    stdout.write_all(s.to_string_lossy().as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()
}
