//! Configuration module for wefit.
//!
//! Loads typed configuration from `~/.wefit/config.json`.
//! All fields use `serde` for zero-boilerplate deserialization; secrets
//! may also come from the environment (see [`Config::secret`]).

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub channels: ChannelsConfig,
    pub backends: BackendsConfig,
    pub apis: ApisConfig,
    pub providers: ProvidersConfig,
    pub agents: AgentsConfig,
}

impl Config {
    /// Load configuration from the default path (`~/.wefit/config.json`).
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Get the default config directory path.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".wefit")
    }

    /// Resolve a secret by name: config first, then the environment.
    ///
    /// Character-level secrets take precedence over both and are checked
    /// by the caller (see `character::get_secret`).
    pub fn secret(&self, name: &str) -> Option<String> {
        let from_config = match name {
            "NASA_API_KEY" => Some(self.apis.nasa_api_key.clone()),
            "GOOGLE_GENERATIVE_AI_API_KEY" => Some(self.apis.google_api_key.clone()),
            "HOSPITAL_BEARER_TOKEN" => Some(self.apis.hospital_bearer_token.clone()),
            _ => None,
        }
        .filter(|v| !v.is_empty());

        from_config.or_else(|| std::env::var(name).ok().filter(|v| !v.is_empty()))
    }

    /// Validate the configuration, returning all problems found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Some(tel) = &self.channels.telegram {
            if tel.enabled && tel.token.is_empty() {
                errors.push("channels.telegram.enabled is true but token is empty".to_string());
            }
        }
        if let Some(disc) = &self.channels.discord {
            if disc.enabled && disc.token.is_empty() {
                errors.push("channels.discord.enabled is true but token is empty".to_string());
            }
        }
        if self.backends.users_api_url.is_empty() {
            errors.push("backends.usersApiUrl must not be empty".to_string());
        }
        if self.backends.treatments_api_url.is_empty() {
            errors.push("backends.treatmentsApiUrl must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Write the default config template to disk.
    pub fn write_default_template() -> anyhow::Result<PathBuf> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = serde_json::json!({
            "channels": {
                "telegram": { "enabled": false, "token": "", "allowFrom": [] }
            },
            "backends": {
                "usersApiUrl": "http://localhost:4000",
                "treatmentsApiUrl": "http://localhost:6000"
            },
            "apis": {
                "nasaApiKey": "DEMO_KEY",
                "googleApiKey": ""
            }
        });

        std::fs::write(&path, serde_json::to_string_pretty(&template)?)?;
        Ok(path)
    }
}

// ── Channels Configuration ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChannelsConfig {
    pub telegram: Option<ChannelConfig>,
    pub discord: Option<ChannelConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChannelConfig {
    pub enabled: bool,
    pub token: String,
    pub allow_from: Vec<String>,
}

// ── Backends Configuration ──────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendsConfig {
    pub users_api_url: String,
    pub treatments_api_url: String,
    pub hospital_api_url: String,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            users_api_url: "http://localhost:4000".into(),
            treatments_api_url: "http://localhost:6000".into(),
            hospital_api_url: "http://localhost:5284".into(),
        }
    }
}

// ── Upstream API Keys ───────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApisConfig {
    pub nasa_api_key: String,
    pub google_api_key: String,
    pub hospital_bearer_token: String,
}

impl Default for ApisConfig {
    fn default() -> Self {
        Self {
            nasa_api_key: "DEMO_KEY".into(),
            google_api_key: String::new(),
            hospital_bearer_token: String::new(),
        }
    }
}

// ── LLM Provider Configuration ──────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderEntry {
    pub api_key: String,
    pub api_base: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub openai: Option<ProviderEntry>,
    pub openrouter: Option<ProviderEntry>,
    pub groq: Option<ProviderEntry>,
    pub deepseek: Option<ProviderEntry>,
    pub gemini: Option<ProviderEntry>,
}

impl ProvidersConfig {
    /// Find the first configured provider (has a non-empty API key).
    pub fn find_active(&self) -> Option<(&str, &ProviderEntry)> {
        let candidates: [(&str, &Option<ProviderEntry>); 5] = [
            ("openai", &self.openai),
            ("openrouter", &self.openrouter),
            ("groq", &self.groq),
            ("deepseek", &self.deepseek),
            ("gemini", &self.gemini),
        ];

        for (name, entry) in candidates {
            if let Some(e) = entry {
                if !e.api_key.is_empty() {
                    return Some((name, e));
                }
            }
        }
        None
    }
}

// ── Agent Configuration ─────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentDefaults {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    pub defaults: AgentDefaults,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backends.users_api_url, "http://localhost:4000");
        assert_eq!(config.backends.treatments_api_url, "http://localhost:6000");
        assert_eq!(config.apis.nasa_api_key, "DEMO_KEY");
        assert!(config.providers.find_active().is_none());
    }

    #[test]
    fn test_deserialize_minimal_json() {
        let json = r#"{"apis": {"nasaApiKey": "test-key"}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.apis.nasa_api_key, "test-key");
        // Untouched sections keep their defaults
        assert_eq!(config.backends.hospital_api_url, "http://localhost:5284");
    }

    #[test]
    fn test_find_active_provider() {
        let json = r#"{"providers": {"groq": {"apiKey": "gsk-xxx"}}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let (name, entry) = config.providers.find_active().unwrap();
        assert_eq!(name, "groq");
        assert_eq!(entry.api_key, "gsk-xxx");
    }

    #[test]
    fn test_validate_rejects_enabled_channel_without_token() {
        let json = r#"{"channels": {"telegram": {"enabled": true, "token": ""}}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("telegram"));
    }
}
