//! Medical image analysis action, backed by Gemini Vision.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::bus::events::InboundMessage;
use crate::plugin::{Action, ActionOutcome};
use crate::services::gemini::GeminiClient;
use crate::services::ServiceError;

const TRIGGERS: &[&str] = &[
    "phân tích hình ảnh",
    "phan tich hinh anh",
    "đọc hình ảnh",
    "doc hinh anh",
    "chẩn đoán hình ảnh",
    "chan doan hinh anh",
    "xem kết quả",
    "xem ket qua",
    "phân tích x-ray",
    "phân tích ct",
    "phân tích mri",
    "phân tích siêu âm",
    "hình ảnh y tế",
    "hinh anh y te",
];

const DISCLAIMER: &str = "\n\n⚠️ **Lưu ý quan trọng:**\n\
• Kết quả phân tích này chỉ mang tính chất tham khảo\n\
• Không thay thế cho việc khám và tư vấn trực tiếp của bác sĩ chuyên khoa\n\
• Vui lòng liên hệ với bác sĩ để được tư vấn chính xác\n\
• Địa chỉ liên hệ: 20 đường số 11, phường 10, Gò Vấp, TP.HCM - SĐT: 0901234567";

pub struct ImageAnalysisAction {
    gemini: Arc<GeminiClient>,
}

impl ImageAnalysisAction {
    pub fn new(gemini: Arc<GeminiClient>) -> Self {
        Self { gemini }
    }
}

/// Build the radiologist prompt for the given user question and image count.
fn analysis_prompt(user_text: &str, image_count: usize) -> String {
    let subject = if image_count > 1 {
        "những hình ảnh"
    } else {
        "hình ảnh"
    };
    let mut prompt = format!(
        "Bạn là một bác sĩ chuyên về chẩn đoán hình ảnh y tế. Hãy phân tích {subject} y tế được cung cấp một cách chi tiết và chuyên nghiệp.\n\n\
         Yêu cầu phân tích:\n\
         1. Mô tả những gì bạn quan sát được trong hình ảnh\n\
         2. Chỉ ra các dấu hiệu bất thường (nếu có)\n\
         3. Đưa ra các chẩn đoán khả năng\n\
         4. Đề xuất các bước tiếp theo cần thực hiện\n\n\
         Lưu ý quan trọng:\n\
         - Chỉ đưa ra nhận xét dựa trên những gì quan sát được\n\
         - Không thay thế cho việc khám lâm sàng trực tiếp\n\
         - Khuyến cáo bệnh nhân nên tham khảo ý kiến bác sĩ chuyên khoa\n\
         - Trả lời bằng tiếng Việt một cách rõ ràng và dễ hiểu"
    );
    if !user_text.is_empty() {
        prompt.push_str(&format!(
            "\n\nCâu hỏi cụ thể của bệnh nhân: {user_text}"
        ));
    }
    prompt
}

fn format_response(analysis: &str, image_count: usize) -> String {
    format!(
        "🏥 **Kết quả phân tích hình ảnh y tế**\n📊 *Đã phân tích {image_count} hình ảnh*\n\n{analysis}{DISCLAIMER}"
    )
}

/// Map upstream failures to the localized messages the clinic shows.
fn error_message(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::MissingKey(_) => {
            "Xin lỗi, không thể phân tích hình ảnh do thiếu cấu hình API. Vui lòng liên hệ quản trị viên."
        }
        ServiceError::Status { status: 401 | 403, .. } => {
            "Lỗi xác thực API. Vui lòng liên hệ quản trị viên."
        }
        ServiceError::Status { status: 429, .. } => {
            "Đã vượt quá giới hạn sử dụng API. Vui lòng thử lại sau."
        }
        ServiceError::Status { status: 400, .. } => {
            "Hình ảnh không hợp lệ hoặc không thể xử lý. Vui lòng thử với hình ảnh khác."
        }
        _ => "Xin lỗi, không thể phân tích hình ảnh. Vui lòng thử lại sau.",
    }
}

#[async_trait]
impl Action for ImageAnalysisAction {
    fn name(&self) -> &str {
        "ANALYZE_MEDICAL_IMAGE"
    }

    fn similes(&self) -> &[&str] {
        &[
            "PHÂN TÍCH HÌNH ẢNH Y TẾ",
            "ĐỌC HÌNH ẢNH",
            "CHẨN ĐOÁN HÌNH ẢNH",
            "IMAGE_ANALYSIS",
        ]
    }

    fn description(&self) -> &str {
        "Phân tích hình ảnh y tế sử dụng Google Gemini Vision"
    }

    fn priority(&self) -> f32 {
        0.9
    }

    fn validate(&self, msg: &InboundMessage) -> bool {
        let lower = msg.content.to_lowercase();
        TRIGGERS.iter().any(|kw| lower.contains(kw)) || !msg.media.is_empty()
    }

    async fn handle(&self, msg: &InboundMessage) -> ActionOutcome {
        info!("Starting medical image analysis");

        if msg.media.is_empty() {
            return ActionOutcome::fail(
                "Vui lòng tải lên hình ảnh y tế để tôi có thể phân tích. \
                 Tôi có thể hỗ trợ phân tích X-quang, CT scan, MRI, siêu âm và các hình ảnh y tế khác.",
            );
        }

        info!(images = msg.media.len(), "Analyzing medical images");

        let prompt = analysis_prompt(&msg.content, msg.media.len());
        match self.gemini.analyze_images(&prompt, &msg.media).await {
            Ok(analysis) => {
                info!("Successfully analyzed medical images");
                ActionOutcome::ok_with_data(
                    format_response(&analysis, msg.media.len()),
                    serde_json::json!({
                        "analysis": analysis,
                        "imageCount": msg.media.len(),
                    }),
                )
            }
            Err(e) => {
                error!("Medical image analysis error: {}", e);
                ActionOutcome::fail(error_message(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    fn action() -> ImageAnalysisAction {
        ImageAnalysisAction::new(Arc::new(GeminiClient::new(Client::new(), "g-key")))
    }

    fn msg_with_media(content: &str, media: Vec<String>) -> InboundMessage {
        InboundMessage {
            channel: "cli".into(),
            chat_id: "direct".into(),
            user_id: "u1".into(),
            content: content.into(),
            media,
        }
    }

    #[test]
    fn test_validate_keyword_or_media() {
        let a = action();
        assert!(a.validate(&InboundMessage::cli("Phân tích hình ảnh X-quang này giúp tôi")));
        assert!(a.validate(&msg_with_media("", vec!["AAAA".into()])));
        assert!(!a.validate(&InboundMessage::cli("xin chào")));
    }

    #[tokio::test]
    async fn test_missing_images_prompts_upload() {
        let a = action();
        let outcome = a
            .handle(&InboundMessage::cli("phân tích hình ảnh y tế"))
            .await;
        assert!(!outcome.success);
        assert!(outcome.text.contains("tải lên hình ảnh"));
    }

    #[test]
    fn test_prompt_counts_images() {
        assert!(analysis_prompt("", 1).contains("hình ảnh y tế"));
        assert!(analysis_prompt("", 2).contains("những hình ảnh"));
        assert!(analysis_prompt("đau ngực", 1).contains("đau ngực"));
    }

    #[test]
    fn test_error_messages_by_taxonomy() {
        assert!(error_message(&ServiceError::MissingKey("X")).contains("thiếu cấu hình"));
        assert!(error_message(&ServiceError::Status {
            status: 429,
            message: String::new()
        })
        .contains("giới hạn"));
        assert!(error_message(&ServiceError::Status {
            status: 401,
            message: String::new()
        })
        .contains("xác thực"));
    }

    #[test]
    fn test_response_has_header_and_disclaimer() {
        let text = format_response("Phổi bình thường.", 2);
        assert!(text.starts_with("🏥"));
        assert!(text.contains("Đã phân tích 2 hình ảnh"));
        assert!(text.contains("Lưu ý quan trọng"));
    }
}
