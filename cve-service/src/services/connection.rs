use crate::config::MongoConfig;
use crate::services::database::MongoDb;
use crate::services::store::CveStore;
use std::sync::Arc;
use std::time::Duration;

/// Holds the store handle opened at startup.
///
/// Availability is decided once: if the first connection attempt fails the
/// manager stays unavailable for the life of the process.
#[derive(Clone)]
pub struct ConnectionManager {
    store: Option<Arc<dyn CveStore>>,
}

impl ConnectionManager {
    /// Connects to MongoDB within `connect_timeout_ms`. Never fails; a failed
    /// attempt is logged and yields an unavailable manager.
    pub async fn connect(config: &MongoConfig) -> Self {
        let timeout = Duration::from_millis(config.connect_timeout_ms);

        match tokio::time::timeout(timeout, MongoDb::connect(config)).await {
            Ok(Ok(db)) => Self::with_store(Arc::new(db)),
            Ok(Err(e)) => {
                tracing::error!(
                    error = %e,
                    "Could not connect to MongoDB; data endpoints will return 503"
                );
                Self::unavailable()
            }
            Err(_) => {
                tracing::error!(
                    timeout_ms = config.connect_timeout_ms,
                    "Timed out connecting to MongoDB; data endpoints will return 503"
                );
                Self::unavailable()
            }
        }
    }

    pub fn with_store(store: Arc<dyn CveStore>) -> Self {
        Self { store: Some(store) }
    }

    pub fn unavailable() -> Self {
        Self { store: None }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Option<&Arc<dyn CveStore>> {
        self.store.as_ref()
    }
}
