//! HTTP handlers for the user-profile CRUD surface.

use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::db::MongoDb;
use crate::model::{
    document_to_json, id_query, inserted_id_hex, list_filter, update_document, CreateUserRequest,
};

/// GET /users — list with optional name/email/gender/level filters.
pub async fn list_users(
    db: web::Data<MongoDb>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let filter = list_filter(&query);

    let cursor = match db.users().find(filter).await {
        Ok(cursor) => cursor,
        Err(e) => {
            tracing::error!("Error fetching users: {}", e);
            return HttpResponse::InternalServerError().json(json!({"message": "Error fetching users"}));
        }
    };

    match cursor.try_collect::<Vec<Document>>().await {
        Ok(users) => {
            let users: Vec<Value> = users.iter().map(document_to_json).collect();
            HttpResponse::Ok().json(users)
        }
        Err(e) => {
            tracing::error!("Error fetching users: {}", e);
            HttpResponse::InternalServerError().json(json!({"message": "Error fetching users"}))
        }
    }
}

/// GET /users/{id} — ObjectId first, email fallback.
pub async fn get_user(db: web::Data<MongoDb>, path: web::Path<String>) -> impl Responder {
    match db.users().find_one(id_query(&path)).await {
        Ok(Some(user)) => HttpResponse::Ok().json(document_to_json(&user)),
        Ok(None) => HttpResponse::NotFound().json(json!({"message": "User not found"})),
        Err(e) => {
            tracing::error!("Error fetching user: {}", e);
            HttpResponse::InternalServerError().json(json!({"message": "Error fetching user"}))
        }
    }
}

/// POST /users — create with default fills; duplicate email → 409.
pub async fn create_user(
    db: web::Data<MongoDb>,
    body: web::Json<CreateUserRequest>,
) -> impl Responder {
    let Some(new_user) = body.into_inner().into_document() else {
        return HttpResponse::BadRequest().json(json!({"message": "Email is required"}));
    };

    // get_str is infallible here; into_document always sets email.
    let email = new_user.get_str("email").unwrap_or_default().to_string();

    match db.users().find_one(doc! {"email": &email}).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict()
                .json(json!({"message": "User with this email already exists"}));
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Error creating user: {}", e);
            return HttpResponse::InternalServerError()
                .json(json!({"message": "Error creating user"}));
        }
    }

    match db.users().insert_one(&new_user).await {
        Ok(result) => {
            let mut user_json = document_to_json(&new_user);
            if let Some(obj) = user_json.as_object_mut() {
                obj.insert(
                    "_id".to_string(),
                    Value::String(inserted_id_hex(&result.inserted_id)),
                );
            }
            HttpResponse::Created().json(json!({
                "message": "User created successfully",
                "user": user_json,
            }))
        }
        Err(e) => {
            tracing::error!("Error creating user: {}", e);
            HttpResponse::InternalServerError().json(json!({"message": "Error creating user"}))
        }
    }
}

/// PUT /users/{id} — whitelisted updates only.
pub async fn update_user(
    db: web::Data<MongoDb>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> impl Responder {
    let query = id_query(&path);

    match db.users().find_one(query.clone()).await {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(json!({"message": "User not found"})),
        Err(e) => {
            tracing::error!("Error updating user: {}", e);
            return HttpResponse::InternalServerError()
                .json(json!({"message": "Error updating user"}));
        }
    }

    let updates = body
        .as_object()
        .map(update_document)
        .unwrap_or_default();

    if updates.is_empty() {
        return HttpResponse::BadRequest().json(json!({"message": "No valid fields to update"}));
    }

    match db
        .users()
        .update_one(query, doc! {"$set": updates.clone()})
        .await
    {
        Ok(result) => HttpResponse::Ok().json(json!({
            "message": "User updated successfully",
            "modifiedCount": result.modified_count,
            "updatedFields": document_to_json(&updates),
        })),
        Err(e) => {
            tracing::error!("Error updating user: {}", e);
            HttpResponse::InternalServerError().json(json!({"message": "Error updating user"}))
        }
    }
}

/// DELETE /users/{id}.
pub async fn delete_user(db: web::Data<MongoDb>, path: web::Path<String>) -> impl Responder {
    match db.users().delete_one(id_query(&path)).await {
        Ok(result) if result.deleted_count == 0 => {
            HttpResponse::NotFound().json(json!({"message": "User not found"}))
        }
        Ok(result) => HttpResponse::Ok().json(json!({
            "message": "User deleted successfully",
            "deletedCount": result.deleted_count,
        })),
        Err(e) => {
            tracing::error!("Error deleting user: {}", e);
            HttpResponse::InternalServerError().json(json!({"message": "Error deleting user"}))
        }
    }
}
