//! Agent dispatcher: the core message-processing engine.
//!
//! For each inbound message the dispatcher walks the registered actions
//! in priority order and lets the first one whose `validate` passes
//! handle it. When nothing matches, the configured LLM provider (if any)
//! produces a persona reply; otherwise a static capability listing is
//! returned. One message is processed to completion per call.

use tracing::{debug, info};

use crate::bus::events::InboundMessage;
use crate::character::Character;
use crate::plugin::{Action, ActionOutcome, Plugin};
use crate::provider::ChatProvider;

pub struct AgentDispatcher {
    character: Character,
    plugins: Vec<Plugin>,
    provider: Option<Box<dyn ChatProvider>>,
    /// Indices into (plugin, action), sorted by priority descending.
    order: Vec<(usize, usize)>,
}

impl AgentDispatcher {
    pub fn new(
        character: Character,
        plugins: Vec<Plugin>,
        provider: Option<Box<dyn ChatProvider>>,
    ) -> Self {
        let mut order: Vec<(usize, usize)> = plugins
            .iter()
            .enumerate()
            .flat_map(|(pi, plugin)| (0..plugin.actions.len()).map(move |ai| (pi, ai)))
            .collect();

        order.sort_by(|a, b| {
            let pa = plugins[a.0].actions[a.1].priority();
            let pb = plugins[b.0].actions[b.1].priority();
            pb.partial_cmp(&pa).unwrap_or(std::cmp::Ordering::Equal)
        });

        Self {
            character,
            plugins,
            provider,
            order,
        }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    /// Total number of registered actions.
    pub fn action_count(&self) -> usize {
        self.order.len()
    }

    fn action(&self, slot: (usize, usize)) -> &dyn Action {
        self.plugins[slot.0].actions[slot.1].as_ref()
    }

    /// Process one message to completion and return the outcome.
    ///
    /// Never returns an error: action failures are already localized
    /// user-facing text, and provider failures degrade to the static
    /// fallback reply.
    pub async fn process(&self, msg: &InboundMessage) -> ActionOutcome {
        info!(
            channel = %msg.channel,
            user = %msg.user_id,
            "Processing inbound message"
        );

        for slot in &self.order {
            let action = self.action(*slot);
            if action.validate(msg) {
                debug!(action = action.name(), "Action matched, dispatching");
                let outcome = action.handle(msg).await;
                info!(
                    action = action.name(),
                    success = outcome.success,
                    "Action completed"
                );
                return outcome;
            }
        }

        debug!("No action matched, falling back");
        self.fallback(msg).await
    }

    async fn fallback(&self, msg: &InboundMessage) -> ActionOutcome {
        if let Some(provider) = &self.provider {
            match provider
                .complete(&self.character.system_prompt(), &msg.content)
                .await
            {
                Ok(reply) => return ActionOutcome::ok(reply),
                Err(e) => {
                    debug!("Provider fallback failed: {}", e);
                }
            }
        }

        ActionOutcome::ok(self.capability_reply())
    }

    /// Static help text listing what the registered plugins can do.
    fn capability_reply(&self) -> String {
        let mut text = format!(
            "Hi, I'm {}! I didn't catch that. Here's what I can do:\n",
            self.character.name
        );
        for plugin in &self.plugins {
            text.push_str(&format!("\n**{}** — {}\n", plugin.name, plugin.description));
            for action in &plugin.actions {
                text.push_str(&format!("• {}\n", action.description()));
            }
        }
        text
    }
}
