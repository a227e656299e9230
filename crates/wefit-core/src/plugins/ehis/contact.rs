//! Static contact-info action.
//!
//! Guarded against the ARV keyword overlap so the bearer-API action
//! keeps precedence on those queries.

use async_trait::async_trait;

use crate::bus::events::InboundMessage;
use crate::plugin::{Action, ActionOutcome};

const CONTACT_KEYWORDS: &[&str] = &[
    "địa chỉ liên hệ",
    "dia chi lien he",
    "thông tin liên hệ",
    "thong tin lien he",
    "số điện thoại liên hệ",
    "so dien thoai lien he",
    "liên hệ với bạn",
    "lien he voi ban",
    "cho tôi địa chỉ",
    "cho toi dia chi",
    "contact",
    "phone number",
];

const ARV_KEYWORDS: &[&str] = &["phòng khám arv", "phong kham arv", "arv", "danh sách"];

pub struct ContactInfoAction;

#[async_trait]
impl Action for ContactInfoAction {
    fn name(&self) -> &str {
        "GET_DIA_CHI"
    }

    fn similes(&self) -> &[&str] {
        &["ĐỊA CHỈ LIÊN HỆ", "LIÊN HỆ", "CONTACT INFO", "ADDRESS"]
    }

    fn description(&self) -> &str {
        "Lấy thông tin liên hệ của bác sĩ"
    }

    fn priority(&self) -> f32 {
        0.7
    }

    fn validate(&self, msg: &InboundMessage) -> bool {
        let lower = msg.content.to_lowercase();
        let has_contact = CONTACT_KEYWORDS.iter().any(|kw| lower.contains(kw));
        let has_arv = ARV_KEYWORDS.iter().any(|kw| lower.contains(kw));
        has_contact && !has_arv
    }

    async fn handle(&self, _msg: &InboundMessage) -> ActionOutcome {
        ActionOutcome::ok_with_data(
            "📍 **Thông tin liên hệ bác sĩ Ehis:**\n\n\
             🏠 **Địa chỉ:** 20 đường số 11, phường 10, Gò Vấp, TP.HCM\n\
             📞 **Số điện thoại:** 0901234567\n\n\
             💡 Bạn có thể liên hệ trực tiếp theo thông tin trên để được tư vấn y tế.",
            serde_json::json!({
                "address": "20 đường số 11 phường 10 Gò Vấp HCM",
                "phone": "0901234567",
            }),
        )
    }
}
