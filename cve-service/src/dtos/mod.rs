pub mod cves;

pub use cves::{CountResponse, CveListParams, CveListResponse};
