//! Action system: trait, plugin bundles, and the explicit registry.
//!
//! Every capability the agent has is an [`Action`]: a `validate`
//! predicate over free-text input plus an async handler that produces a
//! user-facing reply. Actions are grouped into named [`Plugin`] bundles,
//! and a character's plugin list is resolved through [`registry`] at
//! startup — a tagged dispatch table, never dynamic loading.

pub mod registry;

use async_trait::async_trait;
use serde_json::Value;

use crate::bus::events::InboundMessage;

/// The result of running an action handler.
///
/// Failure policy: handlers catch everything internally and surface a
/// localized, user-facing message with `success = false`. Nothing is
/// retried.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    /// User-facing reply text.
    pub text: String,
    /// Whether the action accomplished what it set out to do.
    pub success: bool,
    /// Raw data payload for programmatic consumers.
    pub data: Option<Value>,
}

impl ActionOutcome {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
            data: None,
        }
    }

    pub fn ok_with_data(text: impl Into<String>, data: Value) -> Self {
        Self {
            text: text.into(),
            success: true,
            data: Some(data),
        }
    }

    pub fn fail(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
            data: None,
        }
    }
}

/// Trait that all agent actions must implement.
///
/// `validate` is a cheap predicate (keyword/regex membership) that decides
/// whether this action should handle a message; `handle` does the work.
#[async_trait]
pub trait Action: Send + Sync {
    /// Unique action name (e.g., "NASA_GET_APOD").
    fn name(&self) -> &str;

    /// Alternate trigger phrases, used in help output.
    fn similes(&self) -> &[&str] {
        &[]
    }

    /// Human-readable description of what the action does.
    fn description(&self) -> &str;

    /// Dispatch priority; higher wins when several actions validate.
    fn priority(&self) -> f32 {
        0.5
    }

    /// Whether this action should handle the given message.
    fn validate(&self, msg: &InboundMessage) -> bool;

    /// Run the action and produce a reply.
    async fn handle(&self, msg: &InboundMessage) -> ActionOutcome;
}

/// A named bundle of actions registered into the agent.
pub struct Plugin {
    pub name: String,
    pub description: String,
    pub actions: Vec<Box<dyn Action>>,
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("actions", &self.actions.len())
            .finish()
    }
}

impl Plugin {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: Box<dyn Action>) -> Self {
        self.actions.push(action);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyAction;

    #[async_trait]
    impl Action for DummyAction {
        fn name(&self) -> &str {
            "DUMMY"
        }
        fn description(&self) -> &str {
            "A dummy action for testing"
        }
        fn validate(&self, msg: &InboundMessage) -> bool {
            msg.content.contains("dummy")
        }
        async fn handle(&self, _msg: &InboundMessage) -> ActionOutcome {
            ActionOutcome::ok("dummy result")
        }
    }

    #[tokio::test]
    async fn test_action_validate_and_handle() {
        let action = DummyAction;
        assert!(action.validate(&InboundMessage::cli("run the dummy")));
        assert!(!action.validate(&InboundMessage::cli("something else")));

        let outcome = action.handle(&InboundMessage::cli("run the dummy")).await;
        assert!(outcome.success);
        assert_eq!(outcome.text, "dummy result");
    }

    #[test]
    fn test_plugin_bundles_actions() {
        let plugin = Plugin::new("test", "test plugin").with_action(Box::new(DummyAction));
        assert_eq!(plugin.actions.len(), 1);
        assert_eq!(plugin.actions[0].name(), "DUMMY");
    }

    #[test]
    fn test_outcome_constructors() {
        let ok = ActionOutcome::ok("fine");
        assert!(ok.success);
        assert!(ok.data.is_none());

        let fail = ActionOutcome::fail("nope");
        assert!(!fail.success);

        let with_data = ActionOutcome::ok_with_data("data", serde_json::json!({"k": 1}));
        assert_eq!(with_data.data.unwrap()["k"], 1);
    }
}
