use mongodb::bson::{doc, Bson, Document};
use serde::Serialize;
use serde_json::{Map, Value};

/// Store-assigned primary key field.
pub const INTERNAL_ID_FIELD: &str = "_id";
/// A CVE document as returned to callers.
///
/// The stored document is passed through field for field, except that `_id`
/// always holds a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CveRecord(Map<String, Value>);

impl CveRecord {
    pub fn from_document(mut document: Document) -> Self {
        if let Some(id) = document.get(INTERNAL_ID_FIELD) {
            let id = internal_id_to_string(id);
            document.insert(INTERNAL_ID_FIELD, id);
        }

        match Bson::Document(document).into_relaxed_extjson() {
            Value::Object(fields) => Self(fields),
            // A BSON document always renders as a JSON object.
            _ => Self(Map::new()),
        }
    }

    pub fn internal_id(&self) -> Option<&str> {
        self.0.get(INTERNAL_ID_FIELD).and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

fn internal_id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Uppercases a caller-supplied CVE identifier for comparison.
pub fn canonical_identifier(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Matches a document whose `cveId` (NVD ingestion) or `id` (older
/// ingestion runs) equals the canonical identifier.
pub fn identifier_filter(canonical: &str) -> Document {
    doc! {
        "$or": [
            { "cveId": canonical },
            { "id": canonical },
        ]
    }
}
