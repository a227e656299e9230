//! Drug-interaction lookup action.
//!
//! Extracts one or two active-ingredient names from Vietnamese free text
//! and queries the treatment service. Extraction is layered: the direct
//! "tương tác X và Y" pattern first, then the numbered "hoạt chất 1/2"
//! patterns, then a generic "X với Y" fallback.

use async_trait::async_trait;
use lazy_regex::regex;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::bus::events::InboundMessage;
use crate::plugin::{Action, ActionOutcome};
use crate::services::treatments_api::TreatmentsApi;

const TRIGGERS: &[&str] = &[
    "tương tác",
    "tuong tac",
    "chống chỉ định",
    "chong chi dinh",
    "hoạt chất",
    "hoat chat",
    "kiểm tra thuốc",
    "kiem tra thuoc",
    "drug interaction",
];

pub struct DrugInteractionAction {
    treatments: Arc<TreatmentsApi>,
}

impl DrugInteractionAction {
    pub fn new(treatments: Arc<TreatmentsApi>) -> Self {
        Self { treatments }
    }
}

/// The extracted ingredient pair; the second is optional.
#[derive(Debug, PartialEq)]
pub struct IngredientQuery {
    pub first: String,
    pub second: Option<String>,
}

/// Strip leading filler words ("tôi", "muốn", "thuốc", ...) that the
/// loose patterns tend to swallow.
fn strip_filler(name: &str) -> String {
    let mut current = name.trim().to_string();
    loop {
        let stripped = regex!(r"(?i)^(?:tôi|muốn|tìm|kiếm|thuốc|của|về)\s+")
            .replace(&current, "")
            .into_owned();
        if stripped == current {
            return current;
        }
        current = stripped;
    }
}

/// A plausible ingredient name: at least three characters, starting
/// alphanumeric.
fn valid_drug_name(name: &str) -> bool {
    name.len() >= 3 && regex!(r"^[A-Za-z0-9]").is_match(name)
}

/// Extract the ingredient query from free text, or `None` when nothing
/// usable is present.
pub fn extract_ingredients(text: &str) -> Option<IngredientQuery> {
    let mut first: Option<String> = None;
    let mut second: Option<String> = None;

    // Direct pair: "tương tác/kiểm tra [thuốc|giữa] X và/với Y"
    let direct = regex!(
        r"(?i)(?:tương\s*tác|kiểm\s*tra)\s*(?:thuốc|giữa)?\s*([A-Za-z0-9]+(?:\s+[A-Za-z0-9]+)*?)\s+(?:và|với)\s+([A-Za-z0-9]+(?:\s+[A-Za-z0-9]+)*)"
    );
    if let Some(caps) = direct.captures(text) {
        first = Some(caps[1].trim().to_string());
        second = Some(caps[2].trim().to_string());
    } else {
        // Numbered: "hoạt chất 1: X", "hoạt chất thứ hai Y"
        let hc1 = regex!(
            r"(?i)hoạt\s*chất\s*(?:1|một|thứ\s*nhất|thứ\s*1)?[:\s]+([A-Za-z0-9]+(?:\s+[A-Za-z0-9]+)*?)(?:\s+(?:với|và|cùng|cùng\s+với)\s+|$|\s*[,.])"
        );
        let hc2 = regex!(
            r"(?i)hoạt\s*chất\s*(?:2|hai|thứ\s*hai|thứ\s*2)[:\s]+([A-Za-z0-9]+(?:\s+[A-Za-z0-9]+)*?)(?:\s+|$|\s*[,.])"
        );
        if let Some(caps) = hc1.captures(text) {
            first = Some(caps[1].trim().to_string());
        }
        if let Some(caps) = hc2.captures(text) {
            second = Some(caps[1].trim().to_string());
        }

        // Generic pair: "X với Y"
        if first.is_none() || second.is_none() {
            let combined = regex!(
                r"(?i)(?:hoạt\s*chất\s+)?([A-Za-z0-9]+(?:\s+[A-Za-z0-9]+)*?)\s+(?:với|và|cùng)\s+(?:hoạt\s*chất\s+)?([A-Za-z0-9]+(?:\s+[A-Za-z0-9]+)*)"
            );
            if let Some(caps) = combined.captures(text) {
                if first.is_none() {
                    first = Some(caps[1].trim().to_string());
                }
                if second.is_none() {
                    second = Some(caps[2].trim().to_string());
                }
            }
        }
    }

    let first = strip_filler(first.as_deref()?);
    let second = second.map(|s| strip_filler(&s)).filter(|s| valid_drug_name(s));

    if !valid_drug_name(&first) {
        return None;
    }

    Some(IngredientQuery { first, second })
}

fn field<'a>(record: &'a Value, name: &str) -> Option<&'a str> {
    record.get(name).and_then(|v| v.as_str()).filter(|s| !s.is_empty())
}

fn severity(record: &Value) -> i64 {
    record.get("MUC").and_then(|v| v.as_i64()).unwrap_or(999)
}

/// Format the lookup result the way the clinic expects it.
fn format_interactions(records: &[Value], query: &IngredientQuery) -> String {
    if let Some(second) = &query.second {
        let data = &records[0];
        return format!(
            "**Thông tin tương tác thuốc**\n\n\
             **Hoạt chất:** {} và {}\n\n\
             **Cơ chế tương tác:**\n{}\n\n\
             **Hậu quả:**\n{}\n\n\
             **Xử trí:**\n{}\n\n\
             **Mức độ:** {}",
            query.first,
            second,
            field(data, "COCHE").unwrap_or("Chưa có thông tin chi tiết về cơ chế"),
            field(data, "HAUQUA").unwrap_or("Chưa có thông tin chi tiết về hậu quả"),
            field(data, "XUTRI").unwrap_or("Cần thận trọng khi phối hợp hai hoạt chất này"),
            data.get("MUC")
                .and_then(|v| v.as_i64())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Chưa phân loại".to_string()),
        );
    }

    let mut sorted: Vec<&Value> = records.iter().collect();
    sorted.sort_by_key(|r| severity(r));

    let mut text = format!(
        "**Thông tin về hoạt chất: {}**\n\nTìm thấy {} tương tác liên quan.\n\n**Tương tác đáng chú ý:**",
        query.first,
        records.len()
    );

    for (index, interaction) in sorted.iter().take(3).enumerate() {
        let first_lower = query.first.to_lowercase();
        let other = match field(interaction, "HOATCHAT1") {
            Some(h1) if h1.to_lowercase().contains(&first_lower) => {
                field(interaction, "HOATCHAT2")
            }
            Some(h1) => Some(h1),
            None => field(interaction, "HOATCHAT2"),
        };

        text.push_str(&format!(
            "\n{}. **Tương tác với {}**\n   - Cơ chế: {}\n   - Hậu quả: {}\n   - Xử trí: {}\n   - Mức độ: {}",
            index + 1,
            other.unwrap_or("hoạt chất khác"),
            field(interaction, "COCHE").unwrap_or("Không có thông tin"),
            field(interaction, "HAUQUA").unwrap_or("Không có thông tin"),
            field(interaction, "XUTRI").unwrap_or("Thận trọng khi phối hợp"),
            interaction
                .get("MUC")
                .and_then(|v| v.as_i64())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Chưa phân loại".to_string()),
        ));
    }

    text
}

#[async_trait]
impl Action for DrugInteractionAction {
    fn name(&self) -> &str {
        "GET_CHONG_CHI_DINH_THUOC"
    }

    fn similes(&self) -> &[&str] {
        &[
            "TƯƠNG TÁC THUỐC",
            "CHỐNG CHỈ ĐỊNH THUỐC",
            "HOẠT CHẤT",
            "KIỂM TRA THUỐC",
        ]
    }

    fn description(&self) -> &str {
        "Kiểm tra tương tác thuốc giữa các hoạt chất"
    }

    fn priority(&self) -> f32 {
        0.8
    }

    fn validate(&self, msg: &InboundMessage) -> bool {
        let lower = msg.content.to_lowercase();
        TRIGGERS.iter().any(|kw| lower.contains(kw))
    }

    async fn handle(&self, msg: &InboundMessage) -> ActionOutcome {
        info!("Xử lý yêu cầu tương tác thuốc: {}", msg.content);

        let Some(query) = extract_ingredients(&msg.content) else {
            return ActionOutcome::fail(
                "Vui lòng cung cấp tên hoạt chất hợp lệ. \
                 Ví dụ: 'Kiểm tra tương tác giữa Paracetamol và Ibuprofen'",
            );
        };

        info!(
            "Hoạt chất đã xác nhận - hoạt chất 1: \"{}\", hoạt chất 2: \"{}\"",
            query.first,
            query.second.as_deref().unwrap_or("không có")
        );

        match self
            .treatments
            .by_ingredients(&query.first, query.second.as_deref())
            .await
        {
            Ok(records) if records.is_empty() => ActionOutcome::fail(not_found_message(&query)),
            Ok(records) => {
                let text = format_interactions(&records, &query);
                ActionOutcome::ok_with_data(text, Value::Array(records))
            }
            Err(e) if e.status() == Some(404) => ActionOutcome::fail(not_found_message(&query)),
            Err(e) => {
                error!("Lỗi khi gọi API: {}", e);
                ActionOutcome::fail(
                    "Xin lỗi, không thể tìm thấy thông tin tương tác thuốc. \
                     Vui lòng kiểm tra lại tên hoạt chất hoặc thử lại sau.",
                )
            }
        }
    }
}

fn not_found_message(query: &IngredientQuery) -> String {
    match &query.second {
        Some(second) => format!(
            "Không tìm thấy thông tin tương tác thuốc giữa {} và {}. Vui lòng kiểm tra lại tên hoạt chất.",
            query.first, second
        ),
        None => format!(
            "Không tìm thấy thông tin tương tác thuốc về {}. Vui lòng kiểm tra lại tên hoạt chất.",
            query.first
        ),
    }
}
