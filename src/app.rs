//! Application orchestrator.
//! Loads/merges config, initializes logging, echoes the destination, resolves the
//! source root from the working directory and runs the merge.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::{debug, error, info};

use tree_merge::cli::Args;
use tree_merge::config::{load_config_from_xml_path, load_config_if_present, CONFIG_ENV};
use tree_merge::output as out;
use tree_merge::{default_config_path, merge_with, Config, MergeError};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_location(&args);
        return Ok(());
    }

    let Some(destination) = args.destination.clone() else {
        // clap enforces DESTINATION unless --print-config is given
        anyhow::bail!("missing DESTINATION argument");
    };

    // Config file values first, then CLI overrides (CLI wins).
    let mut cfg = load_config(&args)?;
    args.apply_overrides(&mut cfg);

    // Hold the guard until we return so the file appender flushes.
    let _guard = match init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json) {
        Ok(g) => g,
        Err(e) => {
            out::print_warn(&format!("Failed to initialize logging: {e}"));
            None
        }
    };

    debug!("Starting tree_merge: {:?}", args);

    out::print_user_os(destination.as_os_str()).context("cannot write to stdout")?;

    let cwd = env::current_dir().context("cannot determine the current working directory")?;
    let source = cfg.resolve_source_root(&cwd);

    match merge_with(&source, &destination, &cfg.merge_options()) {
        Ok(summary) => {
            info!(
                source = %source.display(),
                dest = %destination.display(),
                files = summary.files_copied,
                "Merge finished"
            );
            Ok(())
        }
        Err(e) => {
            report_failure(&e);
            Err(e.into())
        }
    }
}

/// Explicit --config, else TREE_MERGE_CONFIG / the default location if present.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(path) = args.config.as_deref() {
        return load_config_from_xml_path(path);
    }
    let path = match default_config_path() {
        Ok(p) => p,
        // No resolvable location: defaults only.
        Err(_) => return Ok(Config::default()),
    };
    Ok(load_config_if_present(&path)?.unwrap_or_default())
}

fn print_config_location(args: &Args) {
    let (path, origin): (Option<PathBuf>, &str) = if let Some(p) = &args.config {
        (Some(p.clone()), "--config")
    } else if env::var_os(CONFIG_ENV).is_some() {
        (default_config_path().ok(), CONFIG_ENV)
    } else {
        (default_config_path().ok(), "default location")
    };
    match path {
        Some(p) => {
            out::print_info(&format!("Config path ({origin}):\n  {}", p.display()));
            if !p.exists() {
                out::print_info("No config file exists there; built-in defaults are used.");
            }
        }
        None => out::print_error("Could not determine a config path."),
    }
}

fn report_failure(e: &MergeError) {
    let code = e.code();
    let kind = e.kind();
    match e {
        MergeError::Enumerate { path, .. } => {
            error!(code, kind, path = %path.display(), error = %e, cause = %e.io_error(), "Merge failed")
        }
        MergeError::CreateDir { path, .. } => {
            error!(code, kind, path = %path.display(), error = %e, cause = %e.io_error(), "Merge failed")
        }
        MergeError::RemoveFile { path, .. } => {
            error!(code, kind, path = %path.display(), error = %e, cause = %e.io_error(), "Merge failed")
        }
        MergeError::Copy { from, to, .. } => {
            error!(code, kind, src = %from.display(), dest = %to.display(), error = %e, cause = %e.io_error(), "Merge failed")
        }
    }
}
