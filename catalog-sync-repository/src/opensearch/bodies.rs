//! Request bodies sent to OpenSearch.

use serde_json::{json, Value};

/// Query matching every document, used to clear an index.
pub fn match_all_query() -> Value {
    json!({
        "query": {
            "match_all": {}
        }
    })
}

/// Stored script body for a mustache search template.
///
/// `params` is sent as `null` when absent.
pub fn search_template_body(source: &Value, params: Option<&Value>) -> Value {
    json!({
        "script": {
            "lang": "mustache",
            "source": source,
            "params": params
        }
    })
}
