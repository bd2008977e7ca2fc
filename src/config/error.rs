//! Errors raised while loading `mapembed.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read site config `{0}`")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("mapembed.toml is not valid TOML: {0}")]
    Syntax(#[from] toml::de::Error),

    /// A setting parsed but holds an unusable value.
    #[error("`{section}.{key}` {reason}")]
    Setting {
        section: &'static str,
        key: &'static str,
        reason: &'static str,
    },
}

impl ConfigError {
    pub const fn setting(section: &'static str, key: &'static str, reason: &'static str) -> Self {
        Self::Setting {
            section,
            key,
            reason,
        }
    }
}
