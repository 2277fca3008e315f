use std::path::PathBuf;
use anyhow::{Context, Result};
use crate::models::ValidationRules;

/// Backend location, credentials and client-side rules.
///
/// Built once at startup and handed to the HTTP client; nothing reads
/// configuration from global state after that.
///
/// Sources are applied in order, later ones winning:
/// defaults, rc file (`~/.stagectl/rc`), environment, command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub rules: ValidationRules,
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            rules: ValidationRules::default(),
        }
    }
}

impl ApiConfig {
    /// Get the configuration file path (`STAGECTL_RC` overrides the default)
    pub fn rc_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("STAGECTL_RC") {
            return Some(PathBuf::from(path));
        }
        dirs::home_dir().map(|home| home.join(".stagectl").join("rc"))
    }

    /// Resolve configuration from rc file and environment
    pub fn resolve() -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::rc_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
                config
                    .apply_rc(&content)
                    .with_context(|| format!("Invalid configuration file: {}", path.display()))?;
            }
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `key=value` lines from an rc file
    pub fn apply_rc(&mut self, content: &str) -> Result<()> {
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                anyhow::bail!("line {}: expected key=value, got '{}'", lineno + 1, line);
            };
            let value = value.trim();
            match key.trim() {
                "api.url" => self.base_url = value.to_string(),
                "api.token" => {
                    self.token = if value.is_empty() { None } else { Some(value.to_string()) }
                }
                "api.timeout" => {
                    self.timeout_secs = value.parse().ok().filter(|secs: &u64| *secs > 0).ok_or_else(|| {
                        anyhow::anyhow!("line {}: api.timeout must be a positive number of seconds, got '{}'", lineno + 1, value)
                    })?;
                }
                "validate.date_order" => {
                    self.rules.require_date_order = parse_bool(value).ok_or_else(|| {
                        anyhow::anyhow!("line {}: validate.date_order must be true or false, got '{}'", lineno + 1, value)
                    })?;
                }
                other => log::debug!("Ignoring unknown configuration key '{}'", other),
            }
        }
        Ok(())
    }

    /// Apply environment overrides. `lookup` is `std::env::var` outside of tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("STAGECTL_API_URL").filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(token) = lookup("STAGECTL_TOKEN").filter(|v| !v.trim().is_empty()) {
            self.token = Some(token.trim().to_string());
        }
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, base_url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(token) = token {
            self.token = Some(token);
        }
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.token, None);
        assert!(!config.rules.require_date_order);
    }

    #[test]
    fn test_apply_rc() {
        let mut config = ApiConfig::default();
        config
            .apply_rc("# backend\napi.url=https://pm.example.org/api\n\napi.token = abc\napi.timeout=5\nvalidate.date_order=yes\nui.theme=dark\n")
            .unwrap();
        assert_eq!(config.base_url, "https://pm.example.org/api");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout_secs, 5);
        assert!(config.rules.require_date_order);
    }

    #[test]
    fn test_apply_rc_rejects_bad_values() {
        let mut config = ApiConfig::default();
        assert!(config.apply_rc("api.timeout=soon").is_err());
        assert!(config.apply_rc("api.timeout=0").is_err());
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.apply_rc("validate.date_order=maybe").is_err());
        assert!(config.apply_rc("just some text").is_err());
    }

    #[test]
    fn test_env_and_flag_precedence() {
        let env: HashMap<&str, &str> = [("STAGECTL_API_URL", "http://env/api"), ("STAGECTL_TOKEN", "env-token")]
            .into_iter()
            .collect();
        let mut config = ApiConfig::default();
        config.apply_rc("api.url=http://rc/api\napi.token=rc-token").unwrap();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.base_url, "http://env/api");
        assert_eq!(config.token.as_deref(), Some("env-token"));

        let config = config.with_overrides(Some("http://flag/api".to_string()), None);
        assert_eq!(config.base_url, "http://flag/api");
        assert_eq!(config.token.as_deref(), Some("env-token"));
    }
}
