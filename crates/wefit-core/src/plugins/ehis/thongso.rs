//! Bearer-token hospital API action (ThongSo department codes).

use async_trait::async_trait;
use std::sync::Arc;
use tracing::error;

use crate::bus::events::InboundMessage;
use crate::plugin::{Action, ActionOutcome};
use crate::services::hospital::{parse_code_list, HospitalClient};
use crate::services::ServiceError;

const TRIGGERS: &[&str] = &[
    "phòng khám arv",
    "phong kham arv",
    "danh sách phòng khám arv",
    "danh sach phong kham arv",
    "mã khoa phòng arv",
    "ma khoa phong arv",
    "api thongso",
    "api thông số",
    "thông số hệ thống",
    "thong so he thong",
];

/// Which hospital endpoint a message is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    PhongKhamArv,
    ThongSo,
}

fn detect_endpoint(text: &str) -> Option<Endpoint> {
    let lower = text.to_lowercase();
    if lower.contains("phòng khám arv")
        || lower.contains("phong kham arv")
        || lower.contains("mã khoa phòng arv")
        || lower.contains("ma khoa phong arv")
    {
        Some(Endpoint::PhongKhamArv)
    } else if lower.contains("thông số") || lower.contains("thong so") {
        Some(Endpoint::ThongSo)
    } else {
        None
    }
}

fn format_codes(codes: &[String], endpoint: Endpoint) -> String {
    let (noun, icon, empty) = match endpoint {
        Endpoint::PhongKhamArv => ("phòng khám ARV", "🏥", "Không có mã phòng khám ARV nào."),
        Endpoint::ThongSo => ("thông số", "📋", "Không có mã thông số nào."),
    };

    if codes.is_empty() {
        return empty.to_string();
    }

    let header = match endpoint {
        Endpoint::PhongKhamArv => "**Mã các phòng khám ARV:**",
        Endpoint::ThongSo => "**Mã thông số hệ thống:**",
    };

    let mut response = format!("{header}\n\n");
    for (index, code) in codes.iter().enumerate() {
        response.push_str(&format!("{icon} **{} {}:** `{code}`\n", label(endpoint), index + 1));
    }
    response.push_str(&format!("\n📊 **Tổng cộng:** {} {noun}", codes.len()));
    response
}

fn label(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::PhongKhamArv => "Phòng",
        Endpoint::ThongSo => "Thông số",
    }
}

fn error_message(err: &ServiceError) -> &'static str {
    match err.status() {
        Some(401) => "Phiên đăng nhập đã hết hạn. Vui lòng đăng nhập lại.",
        Some(403) => "Không có quyền truy cập. Vui lòng kiểm tra phân quyền.",
        Some(404) => "Không tìm thấy dữ liệu yêu cầu.",
        _ => "Không thể kết nối đến hệ thống. Vui lòng thử lại sau.",
    }
}

pub struct ThongSoAction {
    hospital: Arc<HospitalClient>,
}

impl ThongSoAction {
    pub fn new(hospital: Arc<HospitalClient>) -> Self {
        Self { hospital }
    }
}

#[async_trait]
impl Action for ThongSoAction {
    fn name(&self) -> &str {
        "API_CALL_WITH_BEARER"
    }

    fn similes(&self) -> &[&str] {
        &["GỌI API", "PHÒNG KHÁM ARV", "THÔNG SỐ HỆ THỐNG", "TRUY CẬP API"]
    }

    fn description(&self) -> &str {
        "Gọi API với bearer token để lấy mã khoa phòng từ hệ thống y tế"
    }

    fn priority(&self) -> f32 {
        1.0
    }

    fn validate(&self, msg: &InboundMessage) -> bool {
        let lower = msg.content.to_lowercase();
        TRIGGERS.iter().any(|kw| lower.contains(kw))
    }

    async fn handle(&self, msg: &InboundMessage) -> ActionOutcome {
        let Some(endpoint) = detect_endpoint(&msg.content) else {
            return ActionOutcome::fail(
                "Không thể xác định yêu cầu API. Vui lòng thử lại hoặc liên hệ hỗ trợ.",
            );
        };

        if !self.hospital.has_token() {
            return ActionOutcome::fail(
                "Tôi cần thông tin xác thực để truy cập hệ thống. Vui lòng đảm bảo bạn đã đăng nhập.",
            );
        }

        let result = match endpoint {
            Endpoint::PhongKhamArv => self.hospital.get_phong_kham_arv().await,
            Endpoint::ThongSo => self.hospital.get_thong_so().await,
        };

        match result {
            Ok(raw) => {
                let codes = parse_code_list(&raw);
                if codes.is_empty() {
                    return ActionOutcome::fail("Không có dữ liệu trả về từ hệ thống.");
                }
                ActionOutcome::ok_with_data(
                    format_codes(&codes, endpoint),
                    serde_json::json!({ "codes": codes }),
                )
            }
            Err(e) => {
                error!("Hospital API call failed: {}", e);
                ActionOutcome::fail(error_message(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    #[test]
    fn test_detect_endpoint() {
        assert_eq!(
            detect_endpoint("Lấy danh sách phòng khám ARV"),
            Some(Endpoint::PhongKhamArv)
        );
        assert_eq!(detect_endpoint("cho tôi thông số"), Some(Endpoint::ThongSo));
        assert_eq!(detect_endpoint("xin chào"), None);
    }

    #[test]
    fn test_format_codes() {
        let codes = vec!["K01".to_string(), "K02".to_string()];
        let text = format_codes(&codes, Endpoint::PhongKhamArv);
        assert!(text.contains("`K01`"));
        assert!(text.contains("Tổng cộng:** 2"));

        let empty = format_codes(&[], Endpoint::ThongSo);
        assert!(empty.contains("Không có mã thông số"));
    }

    #[tokio::test]
    async fn test_missing_token_asks_for_login() {
        let action = ThongSoAction::new(Arc::new(HospitalClient::new(
            Client::new(),
            "http://localhost:5284",
            "",
        )));
        let outcome = action
            .handle(&InboundMessage::cli("lấy danh sách phòng khám ARV"))
            .await;
        assert!(!outcome.success);
        assert!(outcome.text.contains("xác thực"));
    }

    #[test]
    fn test_error_messages() {
        let unauthorized = ServiceError::Status {
            status: 401,
            message: String::new(),
        };
        assert!(error_message(&unauthorized).contains("hết hạn"));

        let not_found = ServiceError::Status {
            status: 404,
            message: String::new(),
        };
        assert!(error_message(&not_found).contains("Không tìm thấy"));
    }
}
