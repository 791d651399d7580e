//! Application configuration loaded from environment variables.

use std::path::PathBuf;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Shell configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `STOREFRONT_DATA_DIR`: where the cart is saved (default: `".storefront"`)
/// - `STOREFRONT_CART_KEY`: storage key for the cart (default: `"cart"`)
/// - `STOREFRONT_CATALOG`: catalog seed file (default: `"catalog.json"`)
/// - `STOREFRONT_LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub cart_key: String,
    pub catalog_path: PathBuf,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: lookup("STOREFRONT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            cart_key: lookup("STOREFRONT_CART_KEY").unwrap_or(defaults.cart_key),
            catalog_path: lookup("STOREFRONT_CATALOG")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("STOREFRONT_LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.log_format),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".storefront"),
            cart_key: cart::DEFAULT_CART_KEY.to_string(),
            catalog_path: PathBuf::from("catalog.json"),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.data_dir, PathBuf::from(".storefront"));
        assert_eq!(config.cart_key, "cart");
        assert_eq!(config.catalog_path, PathBuf::from("catalog.json"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        assert_eq!(Config::from_vars(|_| None), Config::default());
    }

    #[test]
    fn test_values_from_vars() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("STOREFRONT_DATA_DIR", "/tmp/shop"),
            ("STOREFRONT_CART_KEY", "cart_u1"),
            ("STOREFRONT_CATALOG", "db.json"),
            ("STOREFRONT_LOG_FORMAT", "JSON"),
            ("RUST_LOG", "debug"),
        ]);
        let config = Config::from_vars(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.data_dir, PathBuf::from("/tmp/shop"));
        assert_eq!(config.cart_key, "cart_u1");
        assert_eq!(config.catalog_path, PathBuf::from("db.json"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_log_format_falls_back_to_text() {
        assert_eq!(LogFormat::parse("yaml"), LogFormat::Text);
    }
}
