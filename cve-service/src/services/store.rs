//! Read-only access to the CVE collection.

use async_trait::async_trait;
use mongodb::bson::Document;
use mongodb::error::ErrorKind;
use thiserror::Error;

/// Failure reported by a [`CveStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached, the connection dropped, or the server
    /// rejected the command.
    #[error("{0}")]
    Connection(anyhow::Error),

    #[error("{0}")]
    Other(anyhow::Error),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        let is_connection_failure = matches!(
            *err.kind,
            ErrorKind::ServerSelection { .. }
                | ErrorKind::Io(_)
                | ErrorKind::ConnectionPoolCleared { .. }
                | ErrorKind::Command(_)
        );

        if is_connection_failure {
            StoreError::Connection(anyhow::Error::new(err))
        } else {
            StoreError::Other(anyhow::Error::new(err))
        }
    }
}

/// Queries the gateway needs from the document store.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait CveStore: Send + Sync {
    fn database_name(&self) -> &str;

    fn collection_name(&self) -> &str;

    /// Number of documents in the collection, unfiltered.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Documents in store-native order after skipping `skip`, at most `limit`.
    /// Callers never pass `limit == 0`.
    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<Document>, StoreError>;

    /// First document whose `cveId` or `id` equals `canonical`.
    async fn find_by_identifier(&self, canonical: &str) -> Result<Option<Document>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
