pub mod cve;

pub use cve::{canonical_identifier, identifier_filter, CveRecord};
