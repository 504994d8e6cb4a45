//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - A missing file means "use defaults"; nothing is written on the user's behalf.
//!
//! Example:
//! <config>
//!   <source_dir>PAR</source_dir>
//!   <log_level>info</log_level>
//!   <log_file>/var/log/tree_merge.log</log_file>
//!   <durable>false</durable>
//! </config>

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "source_dir")]
    source_dir: Option<String>,
    #[serde(rename = "source_root")]
    source_root: Option<String>,
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
    #[serde(rename = "durable", default, deserialize_with = "de_bool_trimmed_opt")]
    durable: Option<bool>,
}

// Custom deserializer that trims surrounding whitespace for an optional bool
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .to_ascii_lowercase()
            .parse::<bool>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid boolean for durable: '{s}'"))),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

// Map XmlConfig -> Config; absent or blank fields keep their defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(name) = non_empty(parsed.source_dir.as_deref()) {
        cfg.source_dir_name = name.to_string();
    }
    cfg.source_root = non_empty(parsed.source_root.as_deref()).map(PathBuf::from);
    cfg.log_file = non_empty(parsed.log_file.as_deref()).map(PathBuf::from);
    if let Some(lvl) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = lvl.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    cfg.durable = parsed.durable.unwrap_or(false);

    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    let cfg = xml_to_config(parsed)
        .with_context(|| format!("invalid value in config xml '{}'", path.display()))?;
    debug!(path = %path.display(), "Loaded config");
    Ok(cfg)
}

/// Load `path` if it exists; `Ok(None)` when there is no file.
pub fn load_config_if_present(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }
    load_config_from_xml_path(path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(xml: &str) -> (tempfile::TempDir, PathBuf) {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(&p, xml).unwrap();
        (td, p)
    }

    #[test]
    fn reads_all_fields_with_whitespace() {
        let (_td, p) = write(
            "<config>\n  <source_dir>  INBOX </source_dir>\n  <log_level> debug </log_level>\n  <log_file> /tmp/tm.log </log_file>\n  <durable> TRUE </durable>\n</config>",
        );
        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg.source_dir_name, "INBOX");
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/tm.log")));
        assert!(cfg.durable);
        assert_eq!(cfg.source_root, None);
    }

    #[test]
    fn empty_elements_keep_defaults() {
        let (_td, p) = write("<config><source_dir></source_dir><log_file></log_file></config>");
        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let (_td, p) = write("<config><download_base>/x</download_base></config>");
        let err = load_config_from_xml_path(&p).unwrap_err();
        assert!(format!("{err:#}").contains("unknown field"), "err was: {err:#}");
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let (_td, p) = write("<config><log_level>loud</log_level></config>");
        let err = load_config_from_xml_path(&p).unwrap_err();
        assert!(format!("{err:#}").contains("invalid log level"), "err was: {err:#}");
    }

    #[test]
    fn missing_file_is_none() {
        let td = tempdir().unwrap();
        assert!(load_config_if_present(&td.path().join("nope.xml")).unwrap().is_none());
    }
}
