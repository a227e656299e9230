//! ThongSo hospital API client (bearer-token authenticated).
//!
//! The hospital system exposes comma-separated code lists for department
//! parameters; the ARV clinic endpoint is the one the medical plugin
//! actually asks for.

use reqwest::Client;
use tracing::debug;

use super::ServiceError;

pub struct HospitalClient {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl HospitalClient {
    pub fn new(client: Client, base_url: &str, bearer_token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: bearer_token.to_string(),
        }
    }

    pub fn has_token(&self) -> bool {
        !self.bearer_token.is_empty()
    }

    /// GET /api/ThongSo/GetPhongKhamARV — ARV clinic department codes.
    pub async fn get_phong_kham_arv(&self) -> Result<String, ServiceError> {
        self.get_text("/api/ThongSo/GetPhongKhamARV").await
    }

    /// GET /api/ThongSo — system parameter codes.
    pub async fn get_thong_so(&self) -> Result<String, ServiceError> {
        self.get_text("/api/ThongSo").await
    }

    async fn get_text(&self, path: &str) -> Result<String, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Calling hospital API");

        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.bearer_token))
            .header("Accept", "*/*")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        Ok(resp.text().await?)
    }
}

/// Parse a comma-separated code list response into clean codes.
///
/// The upstream wraps responses in quotes and pads with whitespace.
pub fn parse_code_list(raw: &str) -> Vec<String> {
    raw.replace('"', "")
        .split(',')
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code_list() {
        assert_eq!(
            parse_code_list("\"K01, K02 ,K03\""),
            vec!["K01", "K02", "K03"]
        );
        assert_eq!(parse_code_list(""), Vec::<String>::new());
        assert_eq!(parse_code_list("\" \""), Vec::<String>::new());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HospitalClient::new(Client::new(), "http://localhost:5284/", "tok");
        assert_eq!(client.base_url, "http://localhost:5284");
        assert!(client.has_token());
    }
}
