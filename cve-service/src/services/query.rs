use crate::models::{canonical_identifier, CveRecord};
use crate::services::connection::ConnectionManager;
use crate::services::store::{CveStore, StoreError};
use anyhow::anyhow;
use metrics::counter;
use service_core::error::AppError;
use std::sync::Arc;

/// One page of the collection together with the collection-wide total.
#[derive(Debug, Clone, PartialEq)]
pub struct CvePage {
    pub total_count: u64,
    pub records: Vec<CveRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionCount {
    pub database_name: String,
    pub collection_name: String,
    pub total_documents: u64,
}

/// Translates the gateway's three read operations into store queries.
#[derive(Clone)]
pub struct CveQueryService {
    connection: ConnectionManager,
    max_limit: Option<u64>,
}

impl CveQueryService {
    pub fn new(connection: ConnectionManager, max_limit: Option<u64>) -> Self {
        Self {
            connection,
            max_limit,
        }
    }

    pub fn is_available(&self) -> bool {
        self.connection.is_available()
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        let store = self.store("ping")?;
        store
            .ping()
            .await
            .map_err(|e| store_failure("ping", e))
    }

    /// Total count plus up to `limit` records after skipping `skip`.
    ///
    /// `limit` is clamped to the configured maximum when one is set.
    pub async fn list_paginated(&self, skip: u64, limit: u64) -> Result<CvePage, AppError> {
        const OPERATION: &str = "pagination";
        let store = self.store(OPERATION)?;
        let limit = self.max_limit.map_or(limit, |max| limit.min(max));

        let result = async {
            let total_count = store.count().await?;
            // A zero limit means "no limit" to MongoDB.
            let documents = if limit == 0 {
                Vec::new()
            } else {
                store.find_page(skip, limit).await?
            };
            Ok::<_, StoreError>((total_count, documents))
        }
        .await;

        let (total_count, documents) = observe(OPERATION, result)?;
        let records = documents
            .into_iter()
            .map(CveRecord::from_document)
            .collect::<Vec<_>>();

        tracing::debug!(
            skip,
            limit,
            total_count,
            returned = records.len(),
            "Listed CVE page"
        );

        Ok(CvePage {
            total_count,
            records,
        })
    }

    /// Case-insensitive lookup on `cveId` or `id`.
    pub async fn get_by_identifier(&self, id: &str) -> Result<CveRecord, AppError> {
        const OPERATION: &str = "search";
        let store = self.store(OPERATION)?;
        let canonical = canonical_identifier(id);

        let document = observe(OPERATION, store.find_by_identifier(&canonical).await)?
            .ok_or_else(|| {
                tracing::debug!(cve_id = %id, canonical = %canonical, "CVE not found");
                AppError::NotFound(anyhow!("CVE ID '{}' not found in the local database.", id))
            })?;

        Ok(CveRecord::from_document(document))
    }

    pub async fn count(&self) -> Result<CollectionCount, AppError> {
        const OPERATION: &str = "count";
        let store = self.store(OPERATION)?;
        let total_documents = observe(OPERATION, store.count().await)?;

        Ok(CollectionCount {
            database_name: store.database_name().to_string(),
            collection_name: store.collection_name().to_string(),
            total_documents,
        })
    }

    fn store(&self, operation: &'static str) -> Result<&Arc<dyn CveStore>, AppError> {
        self.connection.store().ok_or_else(|| {
            counter!(
                "cve_store_queries_total",
                "operation" => operation,
                "outcome" => "unavailable"
            )
            .increment(1);
            AppError::ServiceUnavailable(anyhow!(
                "Database service is unavailable. Please check the MongoDB server status."
            ))
        })
    }
}

/// Counts the query outcome and converts store failures.
fn observe<T>(operation: &'static str, result: Result<T, StoreError>) -> Result<T, AppError> {
    let outcome = match &result {
        Ok(_) => "success",
        Err(StoreError::Connection(_)) => "connection_error",
        Err(StoreError::Other(_)) => "error",
    };
    counter!(
        "cve_store_queries_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);

    result.map_err(|e| store_failure(operation, e))
}

fn store_failure(operation: &str, err: StoreError) -> AppError {
    match err {
        StoreError::Connection(e) => {
            tracing::warn!(operation, error = %e, "MongoDB query failed");
            AppError::ServiceUnavailable(anyhow!(
                "MongoDB query failed during {}: Database connection lost or query error: {}",
                operation,
                e
            ))
        }
        StoreError::Other(e) => {
            tracing::error!(operation, error = %e, "Unexpected error querying MongoDB");
            AppError::InternalError(anyhow!(
                "An unexpected internal error occurred during {}: {}",
                operation,
                e
            ))
        }
    }
}
