//! Configuration: types, default paths and XML loading.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{load_config_from_xml_path, load_config_if_present};

/// Folder under the working directory merged when no source root is given.
pub const SOURCE_DIR_DEFAULT: &str = "PAR";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TREE_MERGE_CONFIG";
