//! Runtime service configuration loaded from the environment.

use std::path::PathBuf;

/// Default request body limit for uploads, in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 64;

/// Runtime configuration populated from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub max_upload_bytes: usize,
    /// Font used when a job does not upload one.
    pub default_font_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".into(),
            server_port: 8501,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            default_font_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup; unset or unparsable values
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let g = |key: &str| -> String { lookup(key).unwrap_or_default().trim().to_string() };

        let server_host = {
            let h = g("SERVER_HOST");
            if h.is_empty() { defaults.server_host } else { h }
        };
        let max_upload_mb = parse_usize(&g("MAX_UPLOAD_MB"), DEFAULT_MAX_UPLOAD_MB).max(1);
        let default_font_path = Some(g("CARD_FONT_PATH"))
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Self {
            server_host,
            server_port: parse_u16(&g("SERVER_PORT"), defaults.server_port),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            default_font_path,
        }
    }
}

fn parse_u16(s: &str, default: u16) -> u16 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn parse_usize(s: &str, default: usize) -> usize {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 8501);
        assert_eq!(config.max_upload_bytes, 64 * 1024 * 1024);
        assert!(config.default_font_path.is_none());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = config_from(&[
            ("SERVER_HOST", "0.0.0.0"),
            ("SERVER_PORT", "9000"),
            ("MAX_UPLOAD_MB", "8"),
            ("CARD_FONT_PATH", "/fonts/Inter.ttf"),
        ]);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 9000);
        assert_eq!(config.max_upload_bytes, 8 * 1024 * 1024);
        assert_eq!(config.default_font_path, Some(PathBuf::from("/fonts/Inter.ttf")));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[("SERVER_PORT", "http"), ("MAX_UPLOAD_MB", "0")]);
        assert_eq!(config.server_port, 8501);
        assert_eq!(config.max_upload_bytes, 1024 * 1024);
    }
}
