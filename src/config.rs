//! Configuration for jsonrepo
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a repository instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all store files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── {TypeName}s.json
    ///     └── ...              (one file per record type)
    pub data_dir: PathBuf,

    /// Append an `s` to the type name when naming the store file
    pub pluralize: bool,

    // -------------------------------------------------------------------------
    // Output Configuration
    // -------------------------------------------------------------------------
    /// Write indented JSON instead of a single line
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            pluralize: true,
            pretty: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Name of the collection for a record type ("Contact" → "Contacts")
    pub fn collection_name(&self, type_name: &str) -> String {
        if self.pluralize {
            format!("{}s", type_name)
        } else {
            type_name.to_string()
        }
    }

    /// Path of the store file for a record type
    pub fn store_path(&self, type_name: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.json", self.collection_name(type_name)))
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all store files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Enable or disable pluralized store file names
    pub fn pluralize(mut self, pluralize: bool) -> Self {
        self.config.pluralize = pluralize;
        self
    }

    /// Enable or disable indented JSON output
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
