//! HTTP handlers for the treatment lookup surface.

use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::bson::Document;
use serde_json::{json, Value};

use crate::db::MongoDb;
use crate::model::{
    crop_filter, document_to_json, id_query, ingredient_regex, search_filter, CropType,
    SearchParams,
};

/// GET / — liveness probe.
pub async fn root() -> impl Responder {
    HttpResponse::Ok().body("API is running. Try /api/treatments to get all treatments.")
}

async fn find_all(db: &MongoDb, filter: Document) -> Result<Vec<Value>, mongodb::error::Error> {
    let cursor = db.treatments().find(filter).await?;
    let docs: Vec<Document> = cursor.try_collect().await?;
    Ok(docs.iter().map(document_to_json).collect())
}

/// GET /api/treatments — list all.
pub async fn list_treatments(db: web::Data<MongoDb>) -> impl Responder {
    match find_all(&db, Document::new()).await {
        Ok(treatments) => HttpResponse::Ok().json(treatments),
        Err(e) => {
            tracing::error!("Error fetching treatments: {}", e);
            HttpResponse::InternalServerError()
                .json(json!({"message": "Server error", "error": e.to_string()}))
        }
    }
}

/// GET /api/treatments/id/{id} — ObjectId first, numeric ID fallback.
pub async fn get_treatment(db: web::Data<MongoDb>, path: web::Path<String>) -> impl Responder {
    match db.treatments().find_one(id_query(&path)).await {
        Ok(Some(treatment)) => HttpResponse::Ok().json(document_to_json(&treatment)),
        Ok(None) => HttpResponse::NotFound()
            .json(json!({"message": format!("Treatment with ID {} not found", path)})),
        Err(e) => {
            tracing::error!("Error fetching treatment by ID: {}", e);
            HttpResponse::InternalServerError().json(json!({"message": "Server error"}))
        }
    }
}

/// GET /api/treatments/crop/{cropType} — COCHE/HAUQUA/XUTRI only.
pub async fn by_crop_type(db: web::Data<MongoDb>, path: web::Path<String>) -> impl Responder {
    let Some(crop) = CropType::parse(&path) else {
        return HttpResponse::BadRequest()
            .json(json!({"message": "Invalid crop type. Must be COCHE, HAUQUA, or XUTRI"}));
    };

    match find_all(&db, crop_filter(crop)).await {
        Ok(treatments) if treatments.is_empty() => HttpResponse::NotFound()
            .json(json!({"message": format!("No treatments found for {}", crop.field())})),
        Ok(treatments) => HttpResponse::Ok().json(treatments),
        Err(e) => {
            tracing::error!("Error fetching treatments by crop type: {}", e);
            HttpResponse::InternalServerError().json(json!({"message": "Server error"}))
        }
    }
}

#[derive(serde::Deserialize)]
pub struct IngredientsQuery {
    pub hoatchat1: Option<String>,
    pub hoatchat2: Option<String>,
}

/// GET /api/treatments/ingredients — case-insensitive substring match on
/// one or both ingredient columns.
pub async fn by_ingredients(
    db: web::Data<MongoDb>,
    query: web::Query<IngredientsQuery>,
) -> impl Responder {
    if query.hoatchat1.is_none() && query.hoatchat2.is_none() {
        return HttpResponse::BadRequest()
            .json(json!({"message": "At least one active ingredient parameter is required"}));
    }

    let mut filter = Document::new();
    if let Some(h1) = &query.hoatchat1 {
        filter.extend(ingredient_regex("HOATCHAT1", h1));
    }
    if let Some(h2) = &query.hoatchat2 {
        filter.extend(ingredient_regex("HOATCHAT2", h2));
    }

    match find_all(&db, filter).await {
        Ok(treatments) if treatments.is_empty() => HttpResponse::NotFound()
            .json(json!({"message": "No treatments found with specified ingredients"})),
        Ok(treatments) => HttpResponse::Ok().json(treatments),
        Err(e) => {
            tracing::error!("Error fetching treatments by ingredients: {}", e);
            HttpResponse::InternalServerError().json(json!({"message": "Server error"}))
        }
    }
}

/// GET /api/search — combined multi-field search.
pub async fn search(db: web::Data<MongoDb>, query: web::Query<SearchParams>) -> impl Responder {
    if query.is_empty() {
        return HttpResponse::BadRequest()
            .json(json!({"message": "At least one search parameter is required"}));
    }

    let filter = match search_filter(&query) {
        Ok(filter) => filter,
        Err(message) => return HttpResponse::BadRequest().json(json!({"message": message})),
    };

    match find_all(&db, filter).await {
        Ok(treatments) if treatments.is_empty() => HttpResponse::NotFound()
            .json(json!({"message": "No treatments found matching the criteria"})),
        Ok(treatments) => HttpResponse::Ok().json(treatments),
        Err(e) => {
            tracing::error!("Error in advanced search: {}", e);
            HttpResponse::InternalServerError().json(json!({"message": "Server error"}))
        }
    }
}
