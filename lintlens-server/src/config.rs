//! Server configuration loaded from the environment.

use std::str::FromStr;

use lintlens_core::{ApiConfig, DEFAULT_API_URL, LintLensError, Result};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_UI_ORIGINS: &str = "http://127.0.0.1:3000,http://localhost:3000";

/// Listener, backend and CORS settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Analysis backend the server reads from.
    pub api: ApiConfig,
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Origins allowed by CORS.
    pub ui_origins: Vec<String>,
}

impl ServerConfig {
    /// Build the configuration from `LINTLENS_*` environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("LINTLENS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api = ApiConfig::new(&api_url)?.with_user_agent("lintlens-server");

        let host = lookup("LINTLENS_HOST")
            .map(|host| host.trim().to_string())
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("LINTLENS_PORT") {
            Some(raw) => u16::from_str(raw.trim()).map_err(|_| {
                LintLensError::Other(format!("LINTLENS_PORT must be a u16 number, got {raw}"))
            })?,
            None => DEFAULT_PORT,
        };

        let origins = lookup("LINTLENS_UI_ORIGINS").unwrap_or_else(|| DEFAULT_UI_ORIGINS.to_string());
        let ui_origins = origins
            .split(',')
            .map(|value| value.trim())
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            api,
            host,
            port,
            ui_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config.api.base_url(), DEFAULT_API_URL);
        assert_eq!(config.api.user_agent(), "lintlens-server");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8081);
        assert_eq!(config.ui_origins.len(), 2);
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("LINTLENS_API_URL", " http://backend:8080/ "),
            ("LINTLENS_HOST", "0.0.0.0"),
            ("LINTLENS_PORT", "9090"),
            ("LINTLENS_UI_ORIGINS", "https://ui.example, ,https://admin.example"),
        ]))
        .expect("config");
        assert_eq!(config.api.base_url(), "http://backend:8080");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(
            config.ui_origins,
            vec!["https://ui.example", "https://admin.example"]
        );
    }

    #[test]
    fn rejects_bad_values() {
        let err = ServerConfig::from_lookup(lookup(&[("LINTLENS_PORT", "eighty")]))
            .expect_err("bad port");
        assert!(err.to_string().contains("LINTLENS_PORT"));
        assert!(ServerConfig::from_lookup(lookup(&[("LINTLENS_API_URL", "  ")])).is_err());
    }
}
