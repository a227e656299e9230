//! Character files: the persona object selecting which plugins and chat
//! clients an agent instance runs with.
//!
//! A character is a JSON file passed via `--character`. Plugin names are
//! resolved through the explicit registry in [`crate::plugin::registry`]
//! at startup; unknown names are an error, never a silent skip.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::config::Config;

/// A chatbot persona: name, bio, and the plugin/client selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    pub username: Option<String>,
    /// Short persona lines, joined into the system prompt.
    pub bio: Vec<String>,
    /// Explicit system prompt override; when absent one is built from `bio`.
    pub system: Option<String>,
    /// Plugin names to register (resolved via `plugin::registry`).
    pub plugins: Vec<String>,
    /// Chat clients to start in bot mode ("telegram", "discord").
    pub clients: Vec<String>,
    pub settings: CharacterSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CharacterSettings {
    pub secrets: HashMap<String, String>,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            name: "WeFit".into(),
            username: None,
            bio: vec![
                "A friendly health and fitness assistant.".into(),
                "Can look up NASA imagery, check drug interactions, and build workout plans.".into(),
            ],
            system: None,
            plugins: vec!["alvin".into(), "ehis".into(), "fitness".into()],
            clients: vec!["telegram".into()],
            settings: CharacterSettings::default(),
        }
    }
}

impl Character {
    /// Load a character from a JSON file.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let character: Character = serde_json::from_str(&content)?;
        if character.name.is_empty() {
            anyhow::bail!("character file {} has an empty name", path.display());
        }
        Ok(character)
    }

    /// The system prompt used for LLM fallback replies.
    pub fn system_prompt(&self) -> String {
        if let Some(system) = &self.system {
            return system.clone();
        }
        format!("You are {}. {}", self.name, self.bio.join(" "))
    }

    /// Whether a given client name is selected (case-insensitive).
    pub fn has_client(&self, client: &str) -> bool {
        self.clients.iter().any(|c| c.eq_ignore_ascii_case(client))
    }
}

/// Resolve a secret: character secrets first, then config, then env.
pub fn get_secret(character: &Character, config: &Config, name: &str) -> Option<String> {
    character
        .settings
        .secrets
        .get(name)
        .cloned()
        .filter(|v| !v.is_empty())
        .or_else(|| config.secret(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_character() {
        let c = Character::default();
        assert_eq!(c.name, "WeFit");
        assert_eq!(c.plugins, vec!["alvin", "ehis", "fitness"]);
        assert!(c.has_client("Telegram"));
        assert!(!c.has_client("discord"));
    }

    #[test]
    fn test_parse_character_json() {
        let json = r#"{
            "name": "Ehis",
            "bio": ["A medical assistant."],
            "plugins": ["ehis"],
            "clients": ["discord"],
            "settings": {"secrets": {"GOOGLE_GENERATIVE_AI_API_KEY": "g-key"}}
        }"#;
        let c: Character = serde_json::from_str(json).unwrap();
        assert_eq!(c.name, "Ehis");
        assert_eq!(c.plugins, vec!["ehis"]);
        assert_eq!(
            c.settings.secrets.get("GOOGLE_GENERATIVE_AI_API_KEY"),
            Some(&"g-key".to_string())
        );
    }

    #[test]
    fn test_system_prompt_built_from_bio() {
        let c = Character {
            name: "Astro".into(),
            bio: vec!["Loves space.".into()],
            system: None,
            ..Character::default()
        };
        assert_eq!(c.system_prompt(), "You are Astro. Loves space.");
    }

    #[test]
    fn test_secret_resolution_prefers_character() {
        let mut c = Character::default();
        c.settings
            .secrets
            .insert("NASA_API_KEY".into(), "char-key".into());
        let config = Config::default();
        assert_eq!(
            get_secret(&c, &config, "NASA_API_KEY"),
            Some("char-key".into())
        );
        // Falls back to config when the character has no entry
        let c2 = Character::default();
        assert_eq!(
            get_secret(&c2, &config, "NASA_API_KEY"),
            Some("DEMO_KEY".into())
        );
    }
}
