//! User registration action.
//!
//! Extracts profile fields from free text via regex and creates the user
//! through the user-profile service. The backend fills defaults and
//! rejects duplicate emails with 409.

use async_trait::async_trait;
use lazy_regex::regex;
use std::sync::Arc;
use tracing::{error, info};

use crate::bus::events::InboundMessage;
use crate::plugin::{Action, ActionOutcome};
use crate::services::users_api::{NewUser, UsersApi};

const TRIGGERS: &[&str] = &[
    "create user",
    "register",
    "sign up",
    "signup",
    "add user",
    "new user",
];

pub struct CreateUserAction {
    users: Arc<UsersApi>,
}

impl CreateUserAction {
    pub fn new(users: Arc<UsersApi>) -> Self {
        Self { users }
    }
}

/// Extract user fields from free text. Only the email is required; the
/// backend fills defaults for everything else.
fn extract_user(text: &str) -> Option<NewUser> {
    let email = regex!(r"(?i)email\s+([^\s,]+@[^\s,]+)")
        .captures(text)
        .or_else(|| regex!(r"([^\s,]+@[^\s,]+)").captures(text))
        .map(|caps| caps[1].to_string())?;

    let capture = |re: &regex::Regex| -> String {
        re.captures(text)
            .map(|caps| caps[1].to_string())
            .unwrap_or_default()
    };

    Some(NewUser {
        name: capture(regex!(r"(?i)name\s+(\w+)")),
        email,
        gender: capture(regex!(r"(?i)gender\s+(male|female|other)")).to_lowercase(),
        age: capture(regex!(r"(?i)age\s+(\d+)")),
        weight: capture(regex!(r"(?i)weight\s+(\d+(?:\.\d+)?)")),
        height: capture(regex!(r"(?i)height\s+(\d+(?:\.\d+)?)")),
        wallet: capture(regex!(r"(?i)wallet\s+(0x[a-fA-F0-9]+)")),
    })
}

#[async_trait]
impl Action for CreateUserAction {
    fn name(&self) -> &str {
        "ORACLE_SEND_COSMOS_DATA"
    }

    fn similes(&self) -> &[&str] {
        &["CREATE USER", "REGISTER USER", "ADD USER", "NEW USER", "SIGN UP"]
    }

    fn description(&self) -> &str {
        "Create a new user with the provided information"
    }

    fn validate(&self, msg: &InboundMessage) -> bool {
        let lower = msg.content.to_lowercase();
        TRIGGERS.iter().any(|kw| lower.contains(kw))
    }

    async fn handle(&self, msg: &InboundMessage) -> ActionOutcome {
        let Some(user) = extract_user(&msg.content) else {
            return ActionOutcome::fail(
                "I need at least an email address to create a user. \
                 Please provide an email address.",
            );
        };

        info!(email = %user.email, "Creating new user");

        match self.users.create(&user).await {
            Ok(created) => {
                let name_part = if user.name.is_empty() {
                    String::new()
                } else {
                    format!(" and name {}", user.name)
                };
                ActionOutcome::ok_with_data(
                    format!(
                        "Successfully created a new user with email {}{}. \
                         The user has been registered in our system.",
                        user.email, name_part
                    ),
                    created,
                )
            }
            Err(e) if e.status() == Some(409) => ActionOutcome::fail(format!(
                "A user with email {} is already registered.",
                user.email
            )),
            Err(e) => {
                error!("Error creating user: {}", e);
                ActionOutcome::fail(format!("Sorry, I couldn't create the user. Error: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    #[test]
    fn test_extract_full_user() {
        let user = extract_user(
            "create user with name Jane email jane@example.com gender female age 27 \
             weight 65.5 height 165 wallet 0x6AADC4C00997f1A6",
        )
        .unwrap();
        assert_eq!(user.name, "Jane");
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.gender, "female");
        assert_eq!(user.age, "27");
        assert_eq!(user.weight, "65.5");
        assert_eq!(user.height, "165");
        assert_eq!(user.wallet, "0x6AADC4C00997f1A6");
    }

    #[test]
    fn test_extract_bare_email() {
        let user = extract_user("sign me up: jane@example.com").unwrap();
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.name, "");
        assert_eq!(user.wallet, "");
    }

    #[test]
    fn test_extract_requires_email() {
        assert!(extract_user("register me please").is_none());
    }

    #[test]
    fn test_validate_triggers() {
        let action = CreateUserAction::new(Arc::new(UsersApi::new(
            Client::new(),
            "http://localhost:4000",
        )));
        assert!(action.validate(&InboundMessage::cli("please sign up jane@example.com")));
        assert!(!action.validate(&InboundMessage::cli("good morning")));
    }
}
