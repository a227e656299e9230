//! Client for the drug-interaction (treatment) lookup service.

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::ServiceError;

pub struct TreatmentsApi {
    client: Client,
    base_url: String,
}

impl TreatmentsApi {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// GET /api/treatments/ingredients — case-insensitive substring match
    /// on one or two active-ingredient names.
    pub async fn by_ingredients(
        &self,
        hoatchat1: &str,
        hoatchat2: Option<&str>,
    ) -> Result<Vec<Value>, ServiceError> {
        let url = format!("{}/api/treatments/ingredients", self.base_url);

        let mut params = vec![("hoatchat1", hoatchat1.to_string())];
        if let Some(h2) = hoatchat2 {
            params.push(("hoatchat2", h2.to_string()));
        }

        debug!(url = %url, hoatchat1, hoatchat2 = hoatchat2.unwrap_or(""), "Querying treatments");

        let resp = self.client.get(&url).query(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let api = TreatmentsApi::new(Client::new(), "http://localhost:6000/");
        assert_eq!(api.base_url, "http://localhost:6000");
    }
}
