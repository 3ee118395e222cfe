mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::debug;

/// Loads configuration from the optional YAML file named by `CONFIG_PATH`
/// (default `config.yaml`), then applies environment overrides. A missing
/// file is not an error; every field has a default.
pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    let mut config = load_from_path(&config_path).await?;

    if let Ok(key) = env::var("GOOGLE_API_KEY") {
        config.gemini.api_key = Some(key);
    }
    if let Ok(model) = env::var("GEMINI_MODEL") {
        config.gemini.model = model;
    }
    if let Ok(port) = env::var("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| Error::config(format!("Invalid PORT value: '{}'", port)))?;
    }

    Ok(config)
}

pub async fn load_from_path(path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", path);

    match tokio::fs::read_to_string(path).await {
        Ok(config_str) => Ok(serde_yaml::from_str(&config_str)?),
        Err(_) => {
            debug!("No config file at {}, using defaults", path);
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_cover_every_field() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.logs.level, "info");
        assert_eq!(config.gemini.api_key, None);
        assert_eq!(config.gemini.model, "gemini-2.5-flash-preview-05-20");
        assert_eq!(
            config.gemini.base_url,
            "https://generativelanguage.googleapis.com"
        );
        assert!(config.gemini.probe_on_startup);
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let yaml = r#"
gemini:
  api_key: "yaml-key"
  model: "gemini-2.0-pro"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.gemini.api_key, Some("yaml-key".to_string()));
        assert_eq!(config.gemini.model, "gemini-2.0-pro");
        assert_eq!(config.server.port, 8080);
        assert!(config.gemini.probe_on_startup);
    }

    #[test]
    fn empty_mapping_yields_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.gemini.model, "gemini-2.5-flash-preview-05-20");
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let config = load_from_path("/nonexistent/config.yaml").await.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.gemini.api_key, None);
    }

    #[tokio::test]
    async fn file_values_are_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(
            &path,
            "server:\n  port: 9001\ngemini:\n  probe_on_startup: false\n",
        )
        .await
        .unwrap();

        let config = load_from_path(path.to_str().unwrap()).await.unwrap();
        assert_eq!(config.server.port, 9001);
        assert!(!config.gemini.probe_on_startup);
    }
}
