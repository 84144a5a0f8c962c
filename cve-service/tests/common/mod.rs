#![allow(dead_code)]

use anyhow::anyhow;
use async_trait::async_trait;
use cve_service::config::{CorsConfig, CveConfig, MongoConfig, PaginationConfig};
use cve_service::services::{ConnectionManager, CveStore, StoreError};
use cve_service::startup::Application;
use mongodb::bson::{doc, oid::ObjectId, Document};
use service_core::config::Config as CoreConfig;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub const TEST_DATABASE: &str = "nvd_cve_data";
pub const TEST_COLLECTION: &str = "cves";

/// In-memory CVE collection with MongoDB's skip/limit and `$or` lookup semantics.
#[derive(Default)]
pub struct MemoryStore {
    documents: Vec<Document>,
    connection_lost: AtomicBool,
    queries: AtomicUsize,
}

impl MemoryStore {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Default::default()
        }
    }

    /// `n` records keyed `CVE-2023-00000`, `CVE-2023-00001`, ...
    pub fn with_cves(n: usize) -> Self {
        Self::new((0..n).map(sample_cve).collect())
    }

    pub fn lose_connection(&self) {
        self.connection_lost.store(true, Ordering::SeqCst);
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn begin_query(&self) -> Result<(), StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.connection_lost.load(Ordering::SeqCst) {
            Err(StoreError::Connection(anyhow!("connection closed by server")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CveStore for MemoryStore {
    fn database_name(&self) -> &str {
        TEST_DATABASE
    }

    fn collection_name(&self) -> &str {
        TEST_COLLECTION
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.begin_query()?;
        Ok(self.documents.len() as u64)
    }

    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<Document>, StoreError> {
        self.begin_query()?;
        Ok(self
            .documents
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_by_identifier(&self, canonical: &str) -> Result<Option<Document>, StoreError> {
        self.begin_query()?;
        Ok(self
            .documents
            .iter()
            .find(|d| {
                d.get_str("cveId").ok() == Some(canonical) || d.get_str("id").ok() == Some(canonical)
            })
            .cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.begin_query()
    }
}

pub fn sample_cve(i: usize) -> Document {
    doc! {
        "_id": ObjectId::new(),
        "cveId": format!("CVE-2023-{:05}", i),
        "descriptions": [{ "lang": "en", "value": format!("Sample vulnerability {}", i) }],
        "metrics": { "cvssMetricV31": [{ "cvssData": { "baseScore": 7.5 } }] },
    }
}

pub fn test_config() -> CveConfig {
    CveConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            log_level: "debug".to_string(),
        },
        mongodb: MongoConfig {
            uri: std::env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017/".to_string()),
            database: TEST_DATABASE.to_string(),
            collection: TEST_COLLECTION.to_string(),
            connect_timeout_ms: 5000,
        },
        pagination: PaginationConfig {
            default_limit: 10,
            max_limit: None,
        },
        cors: CorsConfig::default(),
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Serves the given store.
    pub async fn spawn_with_store(store: Arc<MemoryStore>) -> Self {
        Self::spawn_with(test_config(), ConnectionManager::with_store(store)).await
    }

    /// Serves with a store that was never reachable.
    pub async fn spawn_unavailable() -> Self {
        let mut config = test_config();
        // Port 1 is never a MongoDB server.
        config.mongodb.uri = "mongodb://127.0.0.1:1/".to_string();
        config.mongodb.connect_timeout_ms = 200;

        let connection = ConnectionManager::connect(&config.mongodb).await;
        assert!(!connection.is_available());
        Self::spawn_with(config, connection).await
    }

    pub async fn spawn_with(config: CveConfig, connection: ConnectionManager) -> Self {
        let app = Application::build_with_connection(config, connection)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_json(&self, path: &str) -> (u16, serde_json::Value) {
        let response = self.get(path).await;
        let status = response.status().as_u16();
        let body = response.json().await.expect("Failed to parse JSON");
        (status, body)
    }
}
