//! Treatment query builders.
//!
//! The `chongchidinhthuoc` collection stores interaction records with
//! uppercase field names: STT, ID, HOATCHAT1, HOATCHAT2, COCHE, HAUQUA,
//! XUTRI, MUC.

use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::Deserialize;

/// Crop-type columns a record can carry text in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropType {
    Coche,
    Hauqua,
    Xutri,
}

impl CropType {
    /// Case-insensitive parse; anything outside the three columns is
    /// rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_uppercase().as_str() {
            "COCHE" => Some(Self::Coche),
            "HAUQUA" => Some(Self::Hauqua),
            "XUTRI" => Some(Self::Xutri),
            _ => None,
        }
    }

    pub fn field(self) -> &'static str {
        match self {
            Self::Coche => "COCHE",
            Self::Hauqua => "HAUQUA",
            Self::Xutri => "XUTRI",
        }
    }
}

/// Records where the crop-type column exists, non-null and non-empty.
pub fn crop_filter(crop: CropType) -> Document {
    doc! {
        crop.field(): { "$exists": true, "$nin": [mongodb::bson::Bson::Null, ""] }
    }
}

/// ObjectId hex first, numeric `ID` fallback.
pub fn id_query(raw: &str) -> Document {
    match ObjectId::parse_str(raw) {
        Ok(oid) => doc! { "_id": oid },
        Err(_) => {
            let numeric = raw.parse::<i64>().unwrap_or(-1);
            doc! { "ID": numeric }
        }
    }
}

/// Case-insensitive substring regex on an ingredient column.
pub fn ingredient_regex(field: &str, needle: &str) -> Document {
    doc! {
        field: { "$regex": needle, "$options": "i" }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "cropType")]
    pub crop_type: Option<String>,
    pub hoatchat1: Option<String>,
    pub hoatchat2: Option<String>,
    pub muc: Option<String>,
    pub stt: Option<String>,
}

impl SearchParams {
    pub fn is_empty(&self) -> bool {
        self.crop_type.is_none()
            && self.hoatchat1.is_none()
            && self.hoatchat2.is_none()
            && self.muc.is_none()
            && self.stt.is_none()
    }
}

/// Combined multi-field search filter. `Err` carries the 400 message for
/// an invalid crop type.
pub fn search_filter(params: &SearchParams) -> Result<Document, &'static str> {
    let mut filter = Document::new();

    if let Some(raw) = &params.crop_type {
        let crop = CropType::parse(raw)
            .ok_or("Invalid crop type. Must be COCHE, HAUQUA, or XUTRI")?;
        filter.extend(crop_filter(crop));
    }

    if let Some(h1) = &params.hoatchat1 {
        filter.extend(ingredient_regex("HOATCHAT1", h1));
    }
    if let Some(h2) = &params.hoatchat2 {
        filter.extend(ingredient_regex("HOATCHAT2", h2));
    }
    if let Some(muc) = &params.muc {
        filter.insert("MUC", muc.parse::<i64>().unwrap_or(-1));
    }
    if let Some(stt) = &params.stt {
        filter.insert("STT", stt.parse::<i64>().unwrap_or(-1));
    }

    Ok(filter)
}

/// Render a stored document as response JSON with `_id` as plain hex.
pub fn document_to_json(document: &Document) -> serde_json::Value {
    let mut value = serde_json::to_value(document).unwrap_or(serde_json::Value::Null);
    if let (Some(obj), Ok(oid)) = (value.as_object_mut(), document.get_object_id("_id")) {
        obj.insert(
            "_id".to_string(),
            serde_json::Value::String(oid.to_hex()),
        );
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_type_parse() {
        assert_eq!(CropType::parse("coche"), Some(CropType::Coche));
        assert_eq!(CropType::parse("HauQua"), Some(CropType::Hauqua));
        assert_eq!(CropType::parse("XUTRI"), Some(CropType::Xutri));
        assert_eq!(CropType::parse("RICE"), None);
        assert_eq!(CropType::parse(""), None);
    }

    #[test]
    fn test_crop_filter_shape() {
        let filter = crop_filter(CropType::Coche);
        let inner = filter.get_document("COCHE").unwrap();
        assert!(inner.get_bool("$exists").unwrap());
        assert!(inner.contains_key("$nin"));
    }

    #[test]
    fn test_id_query_fallback_to_numeric() {
        let by_oid = id_query("67c5ba32b894cffd36db85ba");
        assert!(by_oid.contains_key("_id"));

        let by_numeric = id_query("42");
        assert_eq!(by_numeric.get_i64("ID").unwrap(), 42);

        // Garbage ids become an unmatchable numeric query
        let garbage = id_query("not-an-id");
        assert_eq!(garbage.get_i64("ID").unwrap(), -1);
    }

    #[test]
    fn test_ingredient_regex_is_case_insensitive() {
        let filter = ingredient_regex("HOATCHAT1", "amio");
        let inner = filter.get_document("HOATCHAT1").unwrap();
        assert_eq!(inner.get_str("$regex").unwrap(), "amio");
        assert_eq!(inner.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_search_filter_combines_fields() {
        let params = SearchParams {
            crop_type: Some("coche".to_string()),
            hoatchat1: Some("amio".to_string()),
            muc: Some("2".to_string()),
            ..SearchParams::default()
        };
        let filter = search_filter(&params).unwrap();
        assert!(filter.contains_key("COCHE"));
        assert!(filter.contains_key("HOATCHAT1"));
        assert_eq!(filter.get_i64("MUC").unwrap(), 2);
    }

    #[test]
    fn test_search_filter_rejects_bad_crop() {
        let params = SearchParams {
            crop_type: Some("RICE".to_string()),
            ..SearchParams::default()
        };
        assert!(search_filter(&params).is_err());
    }

    #[test]
    fn test_search_params_empty_detection() {
        assert!(SearchParams::default().is_empty());
        let with_field = SearchParams {
            stt: Some("1".to_string()),
            ..SearchParams::default()
        };
        assert!(!with_field.is_empty());
    }
}
