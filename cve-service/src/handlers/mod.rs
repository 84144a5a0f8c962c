pub mod cves;
pub mod health;

pub use cves::{count_cves, get_cve, list_cves};
pub use health::{health_check, metrics_handler, readiness_check};
