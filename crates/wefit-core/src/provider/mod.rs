//! LLM fallback provider.
//!
//! Used only when no action validates against a message: the dispatcher
//! asks the configured provider for a persona-flavored chat reply. One
//! OpenAI-compatible implementation covers every provider the config
//! knows about.

pub mod openai;

use async_trait::async_trait;

/// A minimal chat-completion backend: system prompt + user message in,
/// text out. No tool calling, no history.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> anyhow::Result<String>;

    /// The model identifier used for completions.
    fn model(&self) -> &str;
}
