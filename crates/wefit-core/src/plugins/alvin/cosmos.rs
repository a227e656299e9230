//! User-record oracle action.
//!
//! Looks up a stored user record through the user-profile service. The
//! email is extracted from the message when present, otherwise the
//! caller is asked for one.

use async_trait::async_trait;
use lazy_regex::regex;
use std::sync::Arc;
use tracing::{error, info};

use crate::bus::events::InboundMessage;
use crate::plugin::{Action, ActionOutcome};
use crate::services::users_api::UsersApi;

const TRIGGERS: &[&str] = &[
    "cosmos",
    "my user record",
    "my account",
    "look up user",
    "find user",
    "user record",
];

pub struct GetUserRecordAction {
    users: Arc<UsersApi>,
}

impl GetUserRecordAction {
    pub fn new(users: Arc<UsersApi>) -> Self {
        Self { users }
    }
}

/// Pull an email address out of free text.
fn extract_email(text: &str) -> Option<String> {
    regex!(r"([^\s,]+@[^\s,]+)")
        .captures(text)
        .map(|caps| caps[1].to_string())
}

#[async_trait]
impl Action for GetUserRecordAction {
    fn name(&self) -> &str {
        "ORACLE_GET_COSMOS_DATA"
    }

    fn similes(&self) -> &[&str] {
        &["COSMOS", "ORACLE", "GET COSMOS", "COSMOS DATA", "USER LOOKUP"]
    }

    fn description(&self) -> &str {
        "Look up a registered user's record by email"
    }

    fn priority(&self) -> f32 {
        0.8
    }

    fn validate(&self, msg: &InboundMessage) -> bool {
        let lower = msg.content.to_lowercase();
        TRIGGERS.iter().any(|kw| lower.contains(kw))
    }

    async fn handle(&self, msg: &InboundMessage) -> ActionOutcome {
        let Some(email) = extract_email(&msg.content) else {
            return ActionOutcome::fail(
                "I need an email address to look up a user record. \
                 Try: \"look up user with email jane@example.com\"",
            );
        };

        match self.users.get(&email).await {
            Ok(record) => {
                info!(email = %email, "Successfully fetched user record");
                ActionOutcome::ok_with_data(format!("Your cosmos data: {record}"), record)
            }
            Err(e) if e.status() == Some(404) => {
                ActionOutcome::fail(format!("No user registered with email {email}."))
            }
            Err(e) => {
                error!("Error connecting to user service: {}", e);
                ActionOutcome::fail(format!("Error connecting to Oracle: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    fn action() -> GetUserRecordAction {
        GetUserRecordAction::new(Arc::new(UsersApi::new(
            Client::new(),
            "http://localhost:4000",
        )))
    }

    #[test]
    fn test_extract_email() {
        assert_eq!(
            extract_email("look up user a@b.com please"),
            Some("a@b.com".to_string())
        );
        assert_eq!(extract_email("no address here"), None);
    }

    #[test]
    fn test_validate_triggers() {
        let a = action();
        assert!(a.validate(&InboundMessage::cli("fetch my cosmos data")));
        assert!(a.validate(&InboundMessage::cli("look up user a@b.com")));
        assert!(!a.validate(&InboundMessage::cli("what's for dinner?")));
    }

    #[tokio::test]
    async fn test_missing_email_is_a_soft_failure() {
        let a = action();
        let outcome = a.handle(&InboundMessage::cli("show cosmos data")).await;
        assert!(!outcome.success);
        assert!(outcome.text.contains("email"));
    }
}
