//! Drug-interaction (treatment) lookup REST service.
//!
//! Read-only queries over the `chongchidinhthuoc` collection: list all,
//! get by id, filter by crop-type column, case-insensitive ingredient
//! substring match, and combined multi-field search.

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
    let port = env::var("PORT").unwrap_or_else(|_| "6000".to_string());
    let uri =
        env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let db_name = env::var("MONGODB_DATABASE").unwrap_or_else(|_| "Ehis".to_string());

    tracing::info!("Starting treatment lookup service...");

    // Mongo connection failure at startup is fatal.
    let mongo = match db::MongoDb::new(&uri, &db_name).await {
        Ok(mongo) => mongo,
        Err(e) => {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            std::process::exit(1);
        }
    };

    let db_data = web::Data::new(mongo);

    let port: u16 = port.parse().unwrap_or(6000);
    tracing::info!("Server running on http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(db_data.clone())
            .wrap(Logger::default())
            .route("/", web::get().to(handlers::root))
            .route("/api/treatments", web::get().to(handlers::list_treatments))
            .route(
                "/api/treatments/id/{id}",
                web::get().to(handlers::get_treatment),
            )
            .route(
                "/api/treatments/crop/{cropType}",
                web::get().to(handlers::by_crop_type),
            )
            .route(
                "/api/treatments/ingredients",
                web::get().to(handlers::by_ingredients),
            )
            .route("/api/search", web::get().to(handlers::search))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
