use crate::config::MongoConfig;
use crate::models::identifier_filter;
use crate::services::store::{CveStore, StoreError};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, FindOptions},
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;
use std::time::Duration;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
    collection: String,
}

impl MongoDb {
    /// Builds a client whose server selection is bounded by
    /// `connect_timeout_ms`, then pings the deployment so an unreachable
    /// server fails here rather than on the first request.
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        tracing::info!(uri = %config.uri, "Connecting to MongoDB");
        let timeout = Duration::from_millis(config.connect_timeout_ms);

        let mut options = ClientOptions::parse(&config.uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB URI {}: {}", config.uri, e);
            AppError::from(e)
        })?;
        options.app_name = Some("cve-service".to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client for {}: {}", config.uri, e);
            AppError::from(e)
        })?;
        let db = client.database(&config.database);

        let mongo = Self {
            client,
            db,
            collection: config.collection.clone(),
        };
        mongo.health_check().await?;

        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "Successfully connected to MongoDB database"
        );
        Ok(mongo)
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn cves(&self) -> Collection<Document> {
        self.db.collection(&self.collection)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl CveStore for MongoDb {
    fn database_name(&self) -> &str {
        self.db.name()
    }

    fn collection_name(&self) -> &str {
        &self.collection
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.cves().count_documents(doc! {}, None).await?)
    }

    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<Document>, StoreError> {
        let find_options = FindOptions::builder()
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let cursor = self.cves().find(None, find_options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_identifier(&self, canonical: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .cves()
            .find_one(identifier_filter(canonical), None)
            .await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }
}
