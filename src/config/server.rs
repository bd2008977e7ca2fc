//! `[server]` section configuration.
//!
//! Where normalized `ExternalData` URLs point.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[server]` section in mapembed.toml.
///
/// # Example
/// ```toml
/// [server]
/// map_server = "https://maps.example.org"
/// api_endpoint = "https://wiki.example.org/w/api.php"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL of the map server answering `geoshape`/`geoline`/`geopoint` requests.
    #[serde(default = "defaults::server::map_server")]
    #[educe(Default = defaults::server::map_server())]
    pub map_server: String,

    /// Local API endpoint serving `page` data (`action=jsondata`).
    #[serde(default = "defaults::server::api_endpoint")]
    #[educe(Default = defaults::server::api_endpoint())]
    pub api_endpoint: String,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_server_config() {
        let config = r#"
            [server]
            map_server = "https://maps.example.org"
            api_endpoint = "https://wiki.example.org/w/api.php"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.server.map_server, "https://maps.example.org");
        assert_eq!(config.server.api_endpoint, "https://wiki.example.org/w/api.php");
    }

    #[test]
    fn test_server_config_defaults() {
        let config: SiteConfig = toml::from_str("[server]").unwrap();

        assert_eq!(config.server.map_server, "https://maps.wikimedia.org");
        assert_eq!(config.server.api_endpoint, "/w/api.php");
    }

    #[test]
    fn test_server_unknown_field_rejected() {
        let config = r#"
            [server]
            port = 80
        "#;
        assert!(toml::from_str::<SiteConfig>(config).is_err());
    }
}
