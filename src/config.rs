use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, HonyakuError};

/// Environment variable toggling demo mode ("1" enables it)
pub const ENV_DEMO_MODE: &str = "DEMO_MODE";
/// Environment variable overriding the ollama endpoint
pub const ENV_OLLAMA_HOST: &str = "OLLAMA_HOST";
/// Environment variable overriding the model identifier
pub const ENV_TRANSLATOR_MODEL: &str = "TRANSLATOR_MODEL";

// Default values, also used for fields missing from a config file
fn default_demo_mode() -> bool {
    true
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub translator: TranslatorConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Demo mode: answer locally without contacting the model
    #[serde(default = "default_demo_mode")]
    pub demo_mode: bool,
    /// Ollama endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// LLM model used for detection and translation
    #[serde(default = "default_model")]
    pub model: String,
    /// HTTP timeout for a single model call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the translate service listens on
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            demo_mode: default_demo_mode(),
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl TranslatorConfig {
    /// Apply overrides from a variable lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(flag) = lookup(ENV_DEMO_MODE) {
            self.demo_mode = flag.trim() == "1";
        }
        if let Some(host) = lookup(ENV_OLLAMA_HOST).filter(|v| !v.trim().is_empty()) {
            self.endpoint = host.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup(ENV_TRANSLATOR_MODEL).filter(|v| !v.trim().is_empty()) {
            self.model = model.trim().to_string();
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HonyakuError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| HonyakuError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HonyakuError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| HonyakuError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply `DEMO_MODE`, `OLLAMA_HOST` and `TRANSLATOR_MODEL` from the environment
    pub fn apply_env_overrides(&mut self) {
        self.translator.apply_overrides(|key| std::env::var(key).ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.translator.demo_mode);
        assert_eq!(config.translator.endpoint, "http://localhost:11434");
        assert_eq!(config.translator.model, "llama3.1:8b");
        assert_eq!(config.server.bind, "127.0.0.1:8080");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("honyaku.toml");
        std::fs::write(&path, "[translator]\ndemo_mode = false\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(!config.translator.demo_mode);
        assert_eq!(config.translator.model, "llama3.1:8b");
        assert_eq!(config.translator.timeout_secs, 300);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("honyaku.toml");

        let mut config = Config::default();
        config.translator.model = "qwen2.5:7b".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.translator, config.translator);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "translator = [").unwrap();

        assert!(matches!(Config::from_file(&path), Err(HonyakuError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_DEMO_MODE, "0"),
            (ENV_OLLAMA_HOST, "http://gpu-box:11434/"),
            (ENV_TRANSLATOR_MODEL, "mistral:7b"),
        ]
        .into_iter()
        .collect();

        let mut config = TranslatorConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert!(!config.demo_mode);
        assert_eq!(config.endpoint, "http://gpu-box:11434");
        assert_eq!(config.model, "mistral:7b");
    }

    #[test]
    fn test_demo_mode_only_enabled_by_one() {
        let mut config = TranslatorConfig::default();
        config.apply_overrides(|key| (key == ENV_DEMO_MODE).then(|| "true".to_string()));
        assert!(!config.demo_mode);

        config.apply_overrides(|key| (key == ENV_DEMO_MODE).then(|| "1".to_string()));
        assert!(config.demo_mode);
    }

    #[test]
    fn test_missing_overrides_keep_values() {
        let mut config = TranslatorConfig::default();
        config.apply_overrides(|_| None);
        assert_eq!(config, TranslatorConfig::default());
    }
}
