//! User documents and query builders.
//!
//! Every profile field is stored as a string, matching the collection's
//! existing shape. `_id` lookups accept an ObjectId hex or fall back to
//! the email key.

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Fields a PUT may touch. Anything else in the body is ignored.
pub const ALLOWED_UPDATE_FIELDS: &[&str] = &[
    "name",
    "email",
    "gender",
    "age",
    "level",
    "weight",
    "height",
    "exercise_completed",
    "calories_burned",
    "point",
    "token",
    "wallet",
];

/// Filters accepted on GET /users.
pub const ALLOWED_LIST_FILTERS: &[&str] = &["name", "email", "gender", "level"];

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub wallet: Option<String>,
}

impl CreateUserRequest {
    /// Build the insert document, filling defaults. `None` when the
    /// required email is missing or empty.
    pub fn into_document(self) -> Option<Document> {
        let email = self.email.filter(|e| !e.is_empty())?;

        Some(doc! {
            "name": self.name.unwrap_or_default(),
            "email": email,
            "gender": self.gender.filter(|v| !v.is_empty()).unwrap_or_else(|| "other".to_string()),
            "age": self.age.filter(|v| !v.is_empty()).unwrap_or_else(|| "0".to_string()),
            "level": "0",
            "weight": self.weight.filter(|v| !v.is_empty()).unwrap_or_else(|| "0".to_string()),
            "height": self.height.filter(|v| !v.is_empty()).unwrap_or_else(|| "0".to_string()),
            "exercise_completed": "0",
            "calories_burned": "0",
            "point": "0",
            "token": "0",
            "wallet": self.wallet.filter(|v| !v.is_empty()).unwrap_or_else(|| "0x0".to_string()),
        })
    }
}

/// ObjectId hex first, email fallback.
pub fn id_query(id_or_email: &str) -> Document {
    match ObjectId::parse_str(id_or_email) {
        Ok(oid) => doc! { "_id": oid },
        Err(_) => doc! { "email": id_or_email },
    }
}

/// Equality filter from the allowed query parameters.
pub fn list_filter(params: &std::collections::HashMap<String, String>) -> Document {
    let mut filter = Document::new();
    for field in ALLOWED_LIST_FILTERS {
        if let Some(value) = params.get(*field) {
            filter.insert(*field, value.as_str());
        }
    }
    filter
}

/// `$set` payload restricted to the whitelisted fields.
pub fn update_document(body: &Map<String, Value>) -> Document {
    let mut updates = Document::new();
    for field in ALLOWED_UPDATE_FIELDS {
        if let Some(value) = body.get(*field) {
            if let Ok(bson) = mongodb::bson::to_bson(value) {
                updates.insert(*field, bson);
            }
        }
    }
    updates
}

/// Render a stored document as response JSON with `_id` as plain hex.
pub fn document_to_json(document: &Document) -> Value {
    let mut value = serde_json::to_value(document).unwrap_or(Value::Null);
    if let (Some(obj), Ok(oid)) = (value.as_object_mut(), document.get_object_id("_id")) {
        obj.insert("_id".to_string(), Value::String(oid.to_hex()));
    }
    value
}

/// Like [`document_to_json`] but for a freshly inserted id.
pub fn inserted_id_hex(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_fills_defaults() {
        let req = CreateUserRequest {
            email: Some("a@b.com".to_string()),
            ..CreateUserRequest::default()
        };
        let doc = req.into_document().unwrap();
        assert_eq!(doc.get_str("email").unwrap(), "a@b.com");
        assert_eq!(doc.get_str("name").unwrap(), "");
        assert_eq!(doc.get_str("gender").unwrap(), "other");
        assert_eq!(doc.get_str("age").unwrap(), "0");
        assert_eq!(doc.get_str("level").unwrap(), "0");
        assert_eq!(doc.get_str("wallet").unwrap(), "0x0");
        assert_eq!(doc.get_str("exercise_completed").unwrap(), "0");
    }

    #[test]
    fn test_create_keeps_provided_fields() {
        let req = CreateUserRequest {
            name: Some("Nhat".to_string()),
            email: Some("nhat@example.com".to_string()),
            gender: Some("male".to_string()),
            age: Some("27".to_string()),
            weight: Some("65".to_string()),
            height: Some("165".to_string()),
            wallet: Some("0x6AADC4C0".to_string()),
        };
        let doc = req.into_document().unwrap();
        assert_eq!(doc.get_str("name").unwrap(), "Nhat");
        assert_eq!(doc.get_str("age").unwrap(), "27");
        assert_eq!(doc.get_str("wallet").unwrap(), "0x6AADC4C0");
    }

    #[test]
    fn test_create_requires_email() {
        assert!(CreateUserRequest::default().into_document().is_none());
        let empty_email = CreateUserRequest {
            email: Some(String::new()),
            ..CreateUserRequest::default()
        };
        assert!(empty_email.into_document().is_none());
    }

    #[test]
    fn test_id_query_object_id_or_email() {
        let by_oid = id_query("67c5ba32b894cffd36db85ba");
        assert!(by_oid.contains_key("_id"));

        let by_email = id_query("a@b.com");
        assert_eq!(by_email.get_str("email").unwrap(), "a@b.com");
    }

    #[test]
    fn test_list_filter_ignores_unknown_params() {
        let params: std::collections::HashMap<String, String> = [
            ("gender", "male"),
            ("wallet", "0x1"),
            ("level", "2"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let filter = list_filter(&params);
        assert_eq!(filter.get_str("gender").unwrap(), "male");
        assert_eq!(filter.get_str("level").unwrap(), "2");
        assert!(!filter.contains_key("wallet"));
    }

    #[test]
    fn test_update_document_whitelists() {
        let body = json!({
            "weight": "70",
            "point": "15",
            "_id": "should-not-pass",
            "role": "admin"
        });
        let updates = update_document(body.as_object().unwrap());
        assert_eq!(updates.get_str("weight").unwrap(), "70");
        assert_eq!(updates.get_str("point").unwrap(), "15");
        assert!(!updates.contains_key("_id"));
        assert!(!updates.contains_key("role"));
    }

    #[test]
    fn test_document_to_json_hex_id() {
        let oid = ObjectId::new();
        let doc = doc! { "_id": oid, "email": "a@b.com" };
        let value = document_to_json(&doc);
        assert_eq!(value["_id"], json!(oid.to_hex()));
        assert_eq!(value["email"], json!("a@b.com"));
    }
}
