//! wefit-core: Core library for the WeFit AI assistant.
//!
//! This crate contains the building blocks for a plugin-driven chat
//! assistant:
//!
//! - [`config`] — Typed configuration loading from JSON
//! - [`character`] — Persona files selecting plugins and chat channels
//! - [`plugin`] — Action trait, plugin bundles, and the explicit registry
//! - [`agent`] — Priority-ordered intent dispatch
//! - [`bus`] — Async message bus for channel-agent decoupling
//! - [`gateway`] — Telegram/Discord transports and the agent bridge
//! - [`services`] — Upstream HTTP API clients (NASA, Gemini, hospital, CRUD backends)
//! - [`plugins`] — The built-in plugins: alvin (space + users), ehis (medical), fitness
//! - [`provider`] — Optional LLM fallback for unmatched messages
//!
//! # Quick Start
//!
//! ```no_run
//! use wefit_core::agent::AgentDispatcher;
//! use wefit_core::character::Character;
//! use wefit_core::config::Config;
//! use wefit_core::plugin::registry;
//!
//! let config = Config::load().unwrap();
//! let character = Character::default();
//! let deps = registry::PluginDeps::from_config(&config, &character);
//! let plugins = registry::build_plugins(&character.plugins, &deps).unwrap();
//! let dispatcher = AgentDispatcher::new(character, plugins, None);
//! ```

pub mod agent;
pub mod bus;
pub mod character;
pub mod config;
pub mod gateway;
pub mod plugin;
pub mod plugins;
pub mod provider;
pub mod services;
