use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const CONFIG_FILE: &str = "identifier.toml";

/// Settings of the identifier app, read from `identifier.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the identity provider
    pub server_url: String,
    /// Origin `continue` URLs must belong to; defaults to `server_url`
    pub origin: Option<String>,
    pub default_language: String,
    /// Sent as the remember flag with each logon
    pub remember_me: bool,
    /// Path the app starts on, including search and hash
    pub start_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: String::from("http://localhost:8777"),
            origin: None,
            default_language: String::from("en-US"),
            remember_me: false,
            start_path: String::from("/identifier"),
        }
    }
}

impl AppConfig {
    /// Load the config file (if any) and apply environment overrides
    pub fn load() -> Result<Self, AppError> {
        let path = config_path();
        let mut config = if path.exists() {
            log::info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            Self::from_toml(&content)?
        } else {
            log::info!("No {} found, using defaults", path.display());
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Apply `IDENTIFIER_*` overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("IDENTIFIER_SERVER_URL").filter(|v| !v.is_empty()) {
            self.server_url = url;
        }
        if let Some(origin) = lookup("IDENTIFIER_ORIGIN").filter(|v| !v.is_empty()) {
            self.origin = Some(origin);
        }
        if let Some(lang) = lookup("IDENTIFIER_LANGUAGE").filter(|v| !v.is_empty()) {
            self.default_language = lang;
        }
        if let Some(path) = lookup("IDENTIFIER_START_PATH").filter(|v| !v.is_empty()) {
            self.start_path = path;
        }
    }

    /// Origin used to vet `continue` URLs
    pub fn effective_origin(&self) -> String {
        match &self.origin {
            Some(origin) => origin.trim_end_matches('/').to_string(),
            None => self.server_url.trim_end_matches('/').to_string(),
        }
    }
}

fn config_path() -> PathBuf {
    std::env::var("IDENTIFIER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml("server_url = \"https://id.example.com\"").unwrap();
        assert_eq!(config.server_url, "https://id.example.com");
        assert_eq!(config.default_language, "en-US");
        assert!(!config.remember_me);
        assert_eq!(config.start_path, "/identifier");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(AppConfig::from_toml("remember_me = \"maybe\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("IDENTIFIER_SERVER_URL", "https://other.example.com"),
            ("IDENTIFIER_LANGUAGE", "de-DE"),
            ("IDENTIFIER_ORIGIN", ""),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server_url, "https://other.example.com");
        assert_eq!(config.default_language, "de-DE");
        assert_eq!(config.origin, None);
    }

    #[test]
    fn test_effective_origin() {
        let mut config = AppConfig::default();
        config.server_url = "https://id.example.com/".to_string();
        assert_eq!(config.effective_origin(), "https://id.example.com");

        config.origin = Some("https://portal.example.com".to_string());
        assert_eq!(config.effective_origin(), "https://portal.example.com");
    }
}
