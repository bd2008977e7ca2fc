//! `[sanitize]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[sanitize]` section in mapembed.toml.
///
/// # Example
/// ```toml
/// [sanitize]
/// preserve_originals = true
/// article_path = "/wiki/"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SanitizeConfig {
    /// Keep unrendered `title`/`description` text under `_orig<field>`,
    /// for editors that need the source back.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub preserve_originals: bool,

    /// Prefix for internal links produced from `[[Page]]` markup.
    #[serde(default = "defaults::sanitize::article_path")]
    #[educe(Default = defaults::sanitize::article_path())]
    pub article_path: String,
}
