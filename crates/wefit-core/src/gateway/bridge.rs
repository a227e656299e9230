//! Bridge between the message bus and the agent dispatcher.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::agent::AgentDispatcher;
use crate::bus::events::{InboundMessage, OutboundMessage};
use crate::bus::MessageBus;

/// Consumes inbound messages from the bus, runs them through the
/// dispatcher, and publishes the replies.
pub struct AgentBridge {
    bus: Arc<MessageBus>,
    dispatcher: AgentDispatcher,
    cancel: CancellationToken,
}

impl AgentBridge {
    pub fn new(bus: Arc<MessageBus>, dispatcher: AgentDispatcher, cancel: CancellationToken) -> Self {
        Self {
            bus,
            dispatcher,
            cancel,
        }
    }

    /// Run the bridge loop until the bus closes or cancellation fires.
    pub async fn run(self, mut inbound_rx: mpsc::Receiver<InboundMessage>) -> Result<()> {
        info!("Agent bridge started, waiting for inbound messages...");

        loop {
            let msg = tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("Agent bridge cancelled");
                    break;
                }
                msg = inbound_rx.recv() => match msg {
                    Some(m) => m,
                    None => {
                        info!("Agent bridge shutting down (bus closed)");
                        break;
                    }
                },
            };

            debug!(
                channel = %msg.channel,
                chat_id = %msg.chat_id,
                "Bridge received message"
            );

            // Best-effort typing indicator while the action runs.
            self.bus
                .publish_outbound(OutboundMessage::typing(&msg.channel, &msg.chat_id))
                .await;

            let outcome = self.dispatcher.process(&msg).await;

            self.bus
                .publish_outbound(OutboundMessage::reply(
                    &msg.channel,
                    &msg.chat_id,
                    outcome.text,
                ))
                .await;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Character;

    #[tokio::test]
    async fn test_bridge_replies_through_bus() {
        let (bus, mut receivers) = MessageBus::new(16);
        let bus = Arc::new(bus);

        let dispatcher = AgentDispatcher::new(Character::default(), Vec::new(), None);
        let cancel = CancellationToken::new();
        let bridge = AgentBridge::new(Arc::clone(&bus), dispatcher, cancel.clone());

        let inbound_tx = bus.inbound_sender();
        let handle = tokio::spawn(bridge.run(receivers.inbound_rx));

        inbound_tx
            .send(InboundMessage::cli("hello there"))
            .await
            .unwrap();

        // First a typing indicator, then the reply.
        let first = receivers.outbound_rx.recv().await.unwrap();
        assert!(matches!(first, OutboundMessage::Typing { .. }));

        let second = receivers.outbound_rx.recv().await.unwrap();
        match second {
            OutboundMessage::Reply { content, .. } => {
                assert!(content.contains("WeFit"));
            }
            other => panic!("expected reply, got {:?}", other),
        }

        cancel.cancel();
        let _ = handle.await;
    }
}
