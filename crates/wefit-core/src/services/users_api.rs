//! Client for the user-profile REST service.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::ServiceError;

/// Payload for creating a user; every field is stored as a string by the
/// backend, defaults are filled server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub gender: String,
    pub age: String,
    pub weight: String,
    pub height: String,
    pub wallet: String,
}

pub struct UsersApi {
    client: Client,
    base_url: String,
}

impl UsersApi {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// GET /users/{id} — lookup by ObjectId or email.
    pub async fn get(&self, id_or_email: &str) -> Result<Value, ServiceError> {
        let url = format!("{}/users/{}", self.base_url, id_or_email);
        debug!(url = %url, "Fetching user record");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: read_message(resp).await,
            });
        }
        Ok(resp.json().await?)
    }

    /// POST /users — create a user; the backend rejects duplicate emails
    /// with 409.
    pub async fn create(&self, user: &NewUser) -> Result<Value, ServiceError> {
        let url = format!("{}/users", self.base_url);
        debug!(url = %url, email = %user.email, "Creating user record");

        let resp = self.client.post(&url).json(user).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: read_message(resp).await,
            });
        }
        Ok(resp.json().await?)
    }
}

/// Pull the `message` field out of an error body, falling back to raw text.
async fn read_message(resp: reqwest::Response) -> String {
    let status = resp.status();
    match resp.json::<Value>().await {
        Ok(body) => body
            .get("message")
            .and_then(|m| m.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| body.to_string()),
        Err(_) => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_serializes_all_fields() {
        let user = NewUser {
            email: "a@b.com".into(),
            wallet: "0x0".into(),
            ..NewUser::default()
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["wallet"], "0x0");
        assert_eq!(json["name"], "");
    }

    #[test]
    fn test_base_url_normalized() {
        let api = UsersApi::new(Client::new(), "http://localhost:4000/");
        assert_eq!(api.base_url, "http://localhost:4000");
    }
}
