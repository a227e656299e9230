//! Explicit plugin registry.
//!
//! Maps capability names from a character file to plugin constructors at
//! startup. Unknown names fail fast instead of being skipped.

use std::sync::Arc;

use reqwest::Client;

use crate::character::{get_secret, Character};
use crate::config::Config;
use crate::plugin::Plugin;
use crate::plugins::alvin::alvin_plugin;
use crate::plugins::ehis::{ehis_plugin, EhisConfig};
use crate::plugins::fitness::{fitness_plugin, store::MemoryStore};
use crate::services::default_http_client;

/// Everything a plugin constructor might need.
pub struct PluginDeps {
    pub http: Client,
    pub nasa_api_key: String,
    pub google_api_key: String,
    pub users_api_url: String,
    pub treatments_api_url: String,
    pub hospital_api_url: String,
    pub hospital_bearer_token: String,
    pub fitness_store: Arc<MemoryStore>,
}

impl PluginDeps {
    /// Resolve dependencies from config + character (secrets may come
    /// from the character file, the config, or the environment).
    pub fn from_config(config: &Config, character: &Character) -> Self {
        Self {
            http: default_http_client(),
            nasa_api_key: get_secret(character, config, "NASA_API_KEY").unwrap_or_default(),
            google_api_key: get_secret(character, config, "GOOGLE_GENERATIVE_AI_API_KEY")
                .unwrap_or_default(),
            users_api_url: config.backends.users_api_url.clone(),
            treatments_api_url: config.backends.treatments_api_url.clone(),
            hospital_api_url: config.backends.hospital_api_url.clone(),
            hospital_bearer_token: get_secret(character, config, "HOSPITAL_BEARER_TOKEN")
                .unwrap_or_default(),
            fitness_store: Arc::new(MemoryStore::new()),
        }
    }
}

/// Instantiate the named plugins. Order is preserved.
pub fn build_plugins(names: &[String], deps: &PluginDeps) -> anyhow::Result<Vec<Plugin>> {
    let mut plugins = Vec::with_capacity(names.len());

    for name in names {
        let plugin = match name.to_lowercase().as_str() {
            "alvin" => alvin_plugin(
                deps.http.clone(),
                &deps.nasa_api_key,
                &deps.users_api_url,
            ),
            "ehis" => ehis_plugin(
                deps.http.clone(),
                &EhisConfig {
                    treatments_api_url: deps.treatments_api_url.clone(),
                    google_api_key: deps.google_api_key.clone(),
                    hospital_api_url: deps.hospital_api_url.clone(),
                    hospital_bearer_token: deps.hospital_bearer_token.clone(),
                },
            ),
            "fitness" => fitness_plugin(Arc::clone(&deps.fitness_store)),
            other => anyhow::bail!(
                "unknown plugin \"{}\" — available plugins: alvin, ehis, fitness",
                other
            ),
        };
        plugins.push(plugin);
    }

    Ok(plugins)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps() -> PluginDeps {
        PluginDeps::from_config(&Config::default(), &Character::default())
    }

    #[test]
    fn test_build_known_plugins() {
        let names = vec!["alvin".to_string(), "ehis".to_string(), "fitness".to_string()];
        let plugins = build_plugins(&names, &deps()).unwrap();
        assert_eq!(plugins.len(), 3);
        assert_eq!(plugins[0].name, "alvin");
        assert_eq!(plugins[1].name, "ehis");
        assert_eq!(plugins[2].name, "fitness");
    }

    #[test]
    fn test_unknown_plugin_fails_fast() {
        let names = vec!["video-generation".to_string()];
        let err = build_plugins(&names, &deps()).unwrap_err();
        assert!(err.to_string().contains("video-generation"));
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let names = vec!["Fitness".to_string()];
        let plugins = build_plugins(&names, &deps()).unwrap();
        assert_eq!(plugins[0].name, "fitness");
    }
}
