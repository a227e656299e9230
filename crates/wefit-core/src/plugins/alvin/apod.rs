//! NASA Astronomy Picture of the Day action.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::bus::events::InboundMessage;
use crate::plugin::{Action, ActionOutcome};
use crate::services::nasa::NasaClient;

const TRIGGERS: &[&str] = &[
    "picture of the day",
    "image of the day",
    "apod",
    "astronomy picture",
    "nasa picture",
    "nasa image",
    "space picture",
];

pub struct ApodAction {
    nasa: Arc<NasaClient>,
}

impl ApodAction {
    pub fn new(nasa: Arc<NasaClient>) -> Self {
        Self { nasa }
    }
}

#[async_trait]
impl Action for ApodAction {
    fn name(&self) -> &str {
        "NASA_GET_APOD"
    }

    fn similes(&self) -> &[&str] {
        &["ASTRONOMY", "SPACE", "PLANETS"]
    }

    fn description(&self) -> &str {
        "Get the NASA Astronomy Picture of the Day"
    }

    fn validate(&self, msg: &InboundMessage) -> bool {
        let lower = msg.content.to_lowercase();
        TRIGGERS.iter().any(|kw| lower.contains(kw))
    }

    async fn handle(&self, _msg: &InboundMessage) -> ActionOutcome {
        match self.nasa.apod().await {
            Ok(apod) => {
                info!("Successfully fetched APOD");
                ActionOutcome::ok_with_data(
                    format!(
                        "Here is the NASA Astronomy Picture of the Day: {}\n**{}**",
                        apod.url, apod.title
                    ),
                    serde_json::json!({
                        "title": apod.title,
                        "url": apod.url,
                        "explanation": apod.explanation,
                    }),
                )
            }
            Err(e) => {
                error!("Error fetching APOD: {}", e);
                ActionOutcome::fail(format!("Failed to fetch APOD: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    fn action() -> ApodAction {
        ApodAction::new(Arc::new(NasaClient::new(Client::new(), "DEMO_KEY")))
    }

    #[test]
    fn test_validate_triggers() {
        let a = action();
        assert!(a.validate(&InboundMessage::cli(
            "What's the nasa Astronomy picture of the day?"
        )));
        assert!(a.validate(&InboundMessage::cli("show me the APOD")));
        assert!(!a.validate(&InboundMessage::cli("I love space")));
    }
}
