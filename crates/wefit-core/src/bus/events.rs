//! Message bus event types.
//!
//! Defines the messages that flow between chat channels and the agent.

/// An inbound message from a chat channel to the agent.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Source channel identifier (e.g., "telegram", "cli").
    pub channel: String,
    /// Chat/conversation identifier within the channel.
    pub chat_id: String,
    /// User identifier.
    pub user_id: String,
    /// Message text content.
    pub content: String,
    /// Base64-encoded image attachments (data-URL prefix allowed).
    pub media: Vec<String>,
}

/// An outbound message from the agent to a chat channel.
///
/// Channels should handle both variants:
/// - `Reply`  — final text response, always rendered.
/// - `Typing` — show a "typing…" indicator (best-effort, ignore if unsupported).
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    /// Final text reply from the agent.
    Reply {
        channel: String,
        chat_id: String,
        content: String,
    },
    /// Ask the channel to display a "typing…" indicator.
    Typing { channel: String, chat_id: String },
}

impl OutboundMessage {
    /// Convenience: create a `Reply` message.
    pub fn reply(
        channel: impl Into<String>,
        chat_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::Reply {
            channel: channel.into(),
            chat_id: chat_id.into(),
            content: content.into(),
        }
    }

    /// Convenience: create a `Typing` message.
    pub fn typing(channel: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self::Typing {
            channel: channel.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Extract the channel name regardless of variant.
    pub fn channel(&self) -> &str {
        match self {
            Self::Reply { channel, .. } => channel,
            Self::Typing { channel, .. } => channel,
        }
    }

    /// Extract the chat_id regardless of variant.
    pub fn chat_id(&self) -> &str {
        match self {
            Self::Reply { chat_id, .. } => chat_id,
            Self::Typing { chat_id, .. } => chat_id,
        }
    }
}

impl InboundMessage {
    /// Create a simple CLI inbound message.
    pub fn cli(content: &str) -> Self {
        Self {
            channel: "cli".into(),
            chat_id: "direct".into(),
            user_id: "user".into(),
            content: content.into(),
            media: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_variant() {
        let msg = OutboundMessage::reply("telegram", "chat123", "Hello!");
        assert_eq!(msg.channel(), "telegram");
        assert_eq!(msg.chat_id(), "chat123");
        assert!(matches!(msg, OutboundMessage::Reply { .. }));
    }

    #[test]
    fn test_typing_variant() {
        let msg = OutboundMessage::typing("telegram", "chat123");
        assert_eq!(msg.channel(), "telegram");
        assert!(matches!(msg, OutboundMessage::Typing { .. }));
    }

    #[test]
    fn test_cli_message() {
        let msg = InboundMessage::cli("hello");
        assert_eq!(msg.channel, "cli");
        assert_eq!(msg.chat_id, "direct");
        assert!(msg.media.is_empty());
    }
}
