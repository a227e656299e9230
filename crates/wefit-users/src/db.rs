//! MongoDB connection manager for the user-profile service.

use anyhow::Result;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection, Database, IndexModel};

pub const USERS_COLLECTION: &str = "user";

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

        let mongo = Self { client, db };
        mongo.ensure_indexes().await?;
        Ok(mongo)
    }

    /// Email is the service's lookup key; index it.
    async fn ensure_indexes(&self) -> Result<()> {
        let users = self.users();
        let email_index = IndexModel::builder().keys(doc! { "email": 1 }).build();
        match users.create_index(email_index).await {
            Ok(_) => tracing::info!("Index created: user(email)"),
            Err(e) => tracing::debug!("Index already exists: {}", e),
        }
        Ok(())
    }

    pub fn users(&self) -> Collection<Document> {
        self.db.collection(USERS_COLLECTION)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
