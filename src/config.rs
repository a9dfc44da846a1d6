//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.linkpeek/config.toml` (user)
//! 3. `/etc/linkpeek/config.toml` (system)
//!
//! Every field has a default, so an empty file (or no file at all, via
//! [`Config::load_or_default`]) yields the reference sizing: a 100-entry
//! resolver cache, a 50-entry client cache and a 500 ms hover delay.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::{DEFAULT_CLIENT_CAPACITY, DEFAULT_RESOLVER_CAPACITY};
use crate::fetch::{DEFAULT_RELAY_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::types::{ContentTypes, PreviewAssets, Settings};
use crate::{LinkPeekError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub client: ClientConfig,
    /// Initial settings record.
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub content_types: ContentTypes,
    #[serde(default)]
    pub assets: PreviewAssets,
}

/// Resolver-side configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Authoritative cache capacity (default: 100).
    #[serde(default = "default_resolver_capacity")]
    pub cache_capacity: usize,
    /// Markup relay endpoint (default: allorigins).
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
    /// Transport timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_resolver_capacity(),
            relay_url: default_relay_url(),
            request_timeout_secs: default_timeout(),
        }
    }
}

fn default_resolver_capacity() -> usize {
    DEFAULT_RESOLVER_CAPACITY
}

fn default_relay_url() -> String {
    DEFAULT_RELAY_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

/// Client-side configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Client cache capacity (default: 50).
    #[serde(default = "default_client_capacity")]
    pub cache_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_client_capacity(),
        }
    }
}

fn default_client_capacity() -> usize {
    DEFAULT_CLIENT_CAPACITY
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.linkpeek/config.toml`
    /// 3. `/etc/linkpeek/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?
            .ok_or_else(|| {
                LinkPeekError::Configuration(
                    "No config file found. Create ~/.linkpeek/config.toml or /etc/linkpeek/config.toml"
                        .to_string(),
                )
            })?;
        Self::load_from_file(&path)
    }

    /// Like [`load`](Self::load), but returns defaults when no config file
    /// exists. An explicit path that does not exist is still an error.
    pub fn load_or_default(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LinkPeekError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            LinkPeekError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path, `None` when no candidate exists.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(LinkPeekError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".linkpeek").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/linkpeek/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentCategory;

    #[test]
    fn default_config_has_reference_sizing() {
        let config = Config::default();
        assert_eq!(config.resolver.cache_capacity, 100);
        assert_eq!(config.client.cache_capacity, 50);
        assert_eq!(config.resolver.relay_url, "https://api.allorigins.win/get");
        assert_eq!(config.resolver.request_timeout_secs, 30);
        assert!(config.settings.enabled);
        assert_eq!(config.settings.hover_delay_ms, 500);
    }

    #[test]
    fn parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.resolver.cache_capacity, 100);
        assert_eq!(config.content_types, ContentTypes::default());
        assert_eq!(config.assets, PreviewAssets::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [resolver]
            cache_capacity = 10
            relay_url = "http://localhost:8080/get"
            request_timeout_secs = 5

            [client]
            cache_capacity = 3

            [settings]
            enabled = false
            hover_delay_ms = 250

            [content_types]
            image = ["image/avif"]

            [assets]
            favicon_template = "https://icons.example/{domain}.ico"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.resolver.cache_capacity, 10);
        assert_eq!(config.resolver.relay_url, "http://localhost:8080/get");
        assert_eq!(config.resolver.request_timeout_secs, 5);
        assert_eq!(config.client.cache_capacity, 3);
        assert!(!config.settings.enabled);
        assert_eq!(config.settings.hover_delay_ms, 250);

        assert_eq!(
            config.content_types.classify("image/avif"),
            ContentCategory::Image
        );
        // Unlisted sections keep their defaults.
        assert_eq!(
            config.content_types.classify("image/png"),
            ContentCategory::Html
        );
        assert_eq!(
            config.content_types.classify("application/pdf"),
            ContentCategory::Pdf
        );
        assert_eq!(
            config.assets.favicon_for("a.org"),
            "https://icons.example/a.org.ico"
        );
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn load_from_tempfile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[client]\ncache_capacity = 7\n").unwrap();

        let config = Config::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.client.cache_capacity, 7);
        assert_eq!(config.resolver.cache_capacity, 100);
    }

    #[test]
    fn invalid_toml_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[resolver\ncache_capacity = ").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, LinkPeekError::Configuration(_)));
    }
}
