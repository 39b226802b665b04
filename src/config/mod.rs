/// Configuration for the classification service endpoint.
///
/// The endpoint is never hardcoded at call sites; it is resolved through
/// a layered chain (highest precedence wins):
///
/// 1. **Built-in defaults** — `http://127.0.0.1:5000`, 30 s timeout.
/// 2. **TOML config file** — `~/.spamguard/config.toml`:
///    ```toml
///    [service]
///    base_url = "http://scanner.internal:5000"
///    timeout_ms = 10000
///    ```
/// 3. **Environment variables** — `SPAMGUARD_URL`, `SPAMGUARD_TIMEOUT_MS`.
///
/// Missing or malformed files fall back to the previous layer.
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

/// Default service endpoint.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default request timeout in milliseconds (transport default; there is
/// no retry or backoff on top of it).
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

// ---------------------------------------------------------------------------
// Public config struct
// ---------------------------------------------------------------------------

/// Fully resolved service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Classification service base URL.
    pub base_url: String,
    /// Request timeout in milliseconds, applied to every call.
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ServiceConfig {
    /// Load the service config using the precedence chain:
    /// built-in defaults → TOML config file → environment variables.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(file_cfg) = FileConfig::load()
            && let Some(service) = file_cfg.service
        {
            service.apply_to(&mut config);
        }

        Self::apply_env_overrides(&mut config);

        config
    }

    /// Apply environment-variable overrides (highest precedence).
    fn apply_env_overrides(config: &mut Self) {
        if let Ok(val) = std::env::var("SPAMGUARD_URL")
            && !val.is_empty()
        {
            config.base_url = val;
        }

        if let Ok(val) = std::env::var("SPAMGUARD_TIMEOUT_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.timeout_ms = ms;
        }
    }
}

// ---------------------------------------------------------------------------
// TOML config file schema
// ---------------------------------------------------------------------------

/// Top-level config file schema (`~/.spamguard/config.toml`).
#[derive(Debug, Deserialize)]
struct FileConfig {
    service: Option<FileService>,
}

/// `[service]` table inside the config file.
///
/// All fields are optional; only present values override the defaults.
#[derive(Debug, Deserialize)]
struct FileService {
    base_url: Option<String>,
    timeout_ms: Option<u64>,
}

impl FileService {
    /// Merge file-level overrides into a [`ServiceConfig`].
    fn apply_to(&self, config: &mut ServiceConfig) {
        if let Some(ref url) = self.base_url {
            config.base_url = url.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout_ms = ms;
        }
    }
}

impl FileConfig {
    /// Attempt to load the config file. Returns `None` if the file
    /// doesn't exist or is malformed.
    fn load() -> Option<Self> {
        let path = config_file_path()?;
        let contents = fs::read_to_string(path).ok()?;
        toml::from_str(&contents).ok()
    }
}

/// Resolve the path to the config file: `~/.spamguard/config.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".spamguard").join("config.toml"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_local_service() {
        let config = ServiceConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.timeout_ms, 30_000);
    }

    #[test]
    fn file_service_apply_partial_overrides() {
        let mut config = ServiceConfig::default();
        let file = FileService {
            base_url: Some("http://scanner.internal:5000".to_string()),
            timeout_ms: None,
        };

        file.apply_to(&mut config);

        assert_eq!(config.base_url, "http://scanner.internal:5000");
        assert_eq!(config.timeout_ms, 30_000); // unchanged
    }

    #[test]
    fn deserialize_config_toml_full() {
        let toml_src = r#"
            [service]
            base_url = "http://10.0.0.8:5000"
            timeout_ms = 5000
        "#;
        let file_cfg: FileConfig = toml::from_str(toml_src).unwrap();
        let service = file_cfg.service.unwrap();
        assert_eq!(service.base_url.as_deref(), Some("http://10.0.0.8:5000"));
        assert_eq!(service.timeout_ms, Some(5000));
    }

    #[test]
    fn deserialize_config_toml_minimal() {
        let toml_src = r#"
            [service]
            base_url = "http://10.0.0.8:5000"
        "#;
        let file_cfg: FileConfig = toml::from_str(toml_src).unwrap();
        let service = file_cfg.service.unwrap();
        assert!(service.timeout_ms.is_none());
    }

    #[test]
    fn deserialize_config_toml_empty() {
        let file_cfg: FileConfig = toml::from_str("").unwrap();
        assert!(file_cfg.service.is_none());
    }
}
