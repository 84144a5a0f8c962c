pub mod connection;
pub mod database;
pub mod metrics;
pub mod query;
pub mod store;

pub use connection::ConnectionManager;
pub use database::MongoDb;
pub use metrics::{get_metrics, init_metrics};
pub use query::{CollectionCount, CvePage, CveQueryService};
pub use store::{CveStore, StoreError};
