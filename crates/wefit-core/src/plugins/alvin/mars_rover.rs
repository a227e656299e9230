//! Random Mars rover photo action.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::bus::events::InboundMessage;
use crate::plugin::{Action, ActionOutcome};
use crate::services::nasa::NasaClient;

pub struct MarsRoverAction {
    nasa: Arc<NasaClient>,
}

impl MarsRoverAction {
    pub fn new(nasa: Arc<NasaClient>) -> Self {
        Self { nasa }
    }
}

#[async_trait]
impl Action for MarsRoverAction {
    fn name(&self) -> &str {
        "NASA_GET_MARS_ROVER_PHOTO"
    }

    fn similes(&self) -> &[&str] {
        &["MARS", "MARTIAN", "MARS PHOTO"]
    }

    fn description(&self) -> &str {
        "Get a random NASA Mars rover photo"
    }

    fn validate(&self, msg: &InboundMessage) -> bool {
        msg.content.to_lowercase().contains("mars")
    }

    async fn handle(&self, _msg: &InboundMessage) -> ActionOutcome {
        match self.nasa.mars_rover_photo().await {
            Ok(photo) => {
                info!(rover = %photo.rover, sol = photo.sol, "Successfully fetched Mars rover photo");
                ActionOutcome::ok_with_data(
                    format!(
                        "Here is a random Mars rover photo: {} on day {} from the {} camera.\n{}",
                        photo.rover, photo.sol, photo.camera, photo.photo
                    ),
                    serde_json::json!({
                        "photo": photo.photo,
                        "sol": photo.sol,
                        "camera": photo.camera,
                        "rover": photo.rover,
                    }),
                )
            }
            Err(e) => {
                error!("Failed to fetch Mars rover photo: {}", e);
                ActionOutcome::fail(format!("Failed to fetch Mars rover photo: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    #[test]
    fn test_validate_mars_keyword() {
        let action = MarsRoverAction::new(Arc::new(NasaClient::new(Client::new(), "DEMO_KEY")));
        assert!(action.validate(&InboundMessage::cli("I wonder what mars looks like today?")));
        assert!(!action.validate(&InboundMessage::cli("show me the moon")));
    }
}
