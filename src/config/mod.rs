//! Site configuration management for `mapembed.toml`.
//!
//! # Sections
//!
//! | Section      | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `[server]`   | Map server and API endpoint for ExternalData     |
//! | `[groups]`   | Whether authors may name groups                  |
//! | `[sanitize]` | Text rendering options                           |
//! | `[data]`     | Namespace and content model of map data pages    |
//!
//! # Example
//!
//! ```toml
//! [server]
//! map_server = "https://maps.wikimedia.org"
//!
//! [groups]
//! named = true
//!
//! [sanitize]
//! preserve_originals = true
//! ```

mod data;
pub mod defaults;
mod error;
mod groups;
mod sanitize;
mod server;

use data::DataConfig;
use error::ConfigError;
use groups::GroupsConfig;
use sanitize::SanitizeConfig;
use server::ServerConfig;

use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing mapembed.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Path the config was loaded from; empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    /// ExternalData URL targets
    #[serde(default)]
    pub server: ServerConfig,

    /// Group naming rules
    #[serde(default)]
    pub groups: GroupsConfig,

    /// Text sanitization options
    #[serde(default)]
    pub sanitize: SanitizeConfig,

    /// Map data page lookup
    #[serde(default)]
    pub data: DataConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Read(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.server.map_server.starts_with("http") {
            bail!(ConfigError::setting(
                "server",
                "map_server",
                "must start with http:// or https://"
            ));
        }

        if self.server.api_endpoint.trim().is_empty() {
            bail!(ConfigError::setting("server", "api_endpoint", "must not be empty"));
        }

        if self.data.namespace.trim().is_empty() {
            bail!(ConfigError::setting("data", "namespace", "must not be empty"));
        }

        if self.data.content_model.trim().is_empty() {
            bail!(ConfigError::setting("data", "content_model", "must not be empty"));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_str() {
        let config = SiteConfig::from_str(
            r#"
            [server]
            map_server = "https://maps.example.org"

            [groups]
            named = true
        "#,
        )
        .unwrap();

        assert_eq!(config.server.map_server, "https://maps.example.org");
        assert!(config.groups.named);
        assert!(!config.sanitize.preserve_originals);
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let err = SiteConfig::from_str("[server\nmap_server = 1").unwrap_err();
        assert!(err.to_string().starts_with("mapembed.toml is not valid TOML: "));
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(SiteConfig::from_str("[extra]\nkey = 1").is_err());
    }

    #[test]
    fn test_from_path_records_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[groups]\nnamed = true").unwrap();

        let config = SiteConfig::from_path(file.path()).unwrap();
        assert!(config.groups.named);
        assert_eq!(config.config_path, file.path());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = SiteConfig::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.server.map_server, "https://maps.wikimedia.org");
        assert!(config.config_path.as_os_str().is_empty());
    }

    #[test]
    fn test_validate_defaults() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_map_server_scheme() {
        let mut config = SiteConfig::default();
        config.server.map_server = "maps.example.org".into();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("`server.map_server`"));
    }

    #[test]
    fn test_validate_empty_content_model() {
        let mut config = SiteConfig::default();
        config.data.content_model = " ".into();
        assert!(config.validate().is_err());
    }
}
