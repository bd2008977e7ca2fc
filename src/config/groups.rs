//! `[groups]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[groups]` section in mapembed.toml.
///
/// # Example
/// ```toml
/// [groups]
/// named = true   # allow `group = "hotels"` on embeds
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct GroupsConfig {
    /// Allow author-chosen group names. When off, every embed gets a
    /// private, content-hashed group.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub named: bool,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_groups_config() {
        let config: SiteConfig = toml::from_str("[groups]\nnamed = true").unwrap();
        assert!(config.groups.named);

        let config: SiteConfig = toml::from_str("").unwrap();
        assert!(!config.groups.named);
    }
}
