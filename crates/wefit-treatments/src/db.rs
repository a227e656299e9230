//! MongoDB connection manager for the treatment lookup service.

use anyhow::Result;
use mongodb::bson::Document;
use mongodb::{Client, Collection, Database};

pub const TREATMENTS_COLLECTION: &str = "chongchidinhthuoc";

#[derive(Clone)]
pub struct MongoDb {
    client: Client,
    db: Database,
}

impl MongoDb {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        tracing::info!("Connecting to MongoDB at {}", uri);

        let mut options = mongodb::options::ClientOptions::parse(uri).await?;
        options.connect_timeout = Some(std::time::Duration::from_secs(5));
        options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(options)?;
        let db = client.database(db_name);

        // Test the connection
        db.list_collection_names().await?;
        tracing::info!("Successfully connected to MongoDB database: {}", db_name);

        Ok(Self { client, db })
    }

    pub fn treatments(&self) -> Collection<Document> {
        self.db.collection(TREATMENTS_COLLECTION)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
