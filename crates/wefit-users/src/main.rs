//! User-profile REST service.
//!
//! CRUD over the `user` collection: list (filterable), get by
//! ObjectId-or-email, create with default fills (duplicate email → 409),
//! whitelisted update, delete.

mod db;
mod handlers;
mod model;

use actix_web::{middleware::Logger, web, App, HttpServer};
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "4000".to_string());
    let uri =
        env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let db_name = env::var("MONGODB_DATABASE").unwrap_or_else(|_| "wefit365".to_string());

    tracing::info!("Starting user-profile service...");

    // Mongo connection failure at startup is fatal.
    let mongo = match db::MongoDb::new(&uri, &db_name).await {
        Ok(mongo) => mongo,
        Err(e) => {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            std::process::exit(1);
        }
    };

    let db_data = web::Data::new(mongo);

    let port: u16 = port.parse().unwrap_or(4000);
    tracing::info!("Server running on http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(db_data.clone())
            .wrap(Logger::default())
            .route("/users", web::get().to(handlers::list_users))
            .route("/users", web::post().to(handlers::create_user))
            .route("/users/{id}", web::get().to(handlers::get_user))
            .route("/users/{id}", web::put().to(handlers::update_user))
            .route("/users/{id}", web::delete().to(handlers::delete_user))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
