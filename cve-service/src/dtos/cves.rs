use crate::models::CveRecord;
use crate::services::{CollectionCount, CvePage};
use serde::{Deserialize, Serialize};

/// Query string for `GET /cves`. Signed so negative values can be rejected
/// with a clear message instead of a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct CveListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CveListResponse {
    pub total_count: u64,
    pub data: Vec<CveRecord>,
}

impl From<CvePage> for CveListResponse {
    fn from(page: CvePage) -> Self {
        Self {
            total_count: page.total_count,
            data: page.records,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub database_name: String,
    pub collection_name: String,
    pub total_documents: u64,
    pub status: &'static str,
}

impl From<CollectionCount> for CountResponse {
    fn from(count: CollectionCount) -> Self {
        Self {
            database_name: count.database_name,
            collection_name: count.collection_name,
            total_documents: count.total_documents,
            status: "success",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn count_response_uses_camel_case_keys() {
        let body = serde_json::to_value(CountResponse::from(CollectionCount {
            database_name: "nvd_cve_data".to_string(),
            collection_name: "cves".to_string(),
            total_documents: 3,
        }))
        .unwrap();

        assert_eq!(
            body,
            json!({
                "databaseName": "nvd_cve_data",
                "collectionName": "cves",
                "totalDocuments": 3,
                "status": "success"
            })
        );
    }

    #[test]
    fn list_response_wraps_records() {
        let body = serde_json::to_value(CveListResponse::from(CvePage {
            total_count: 25,
            records: vec![],
        }))
        .unwrap();

        assert_eq!(body, json!({ "totalCount": 25, "data": [] }));
    }
}
