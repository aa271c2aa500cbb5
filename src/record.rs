use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ReportError, Result};

/// One work item as the aggregator sees it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    pub group_key: String,
    /// Decimal-hours budget text, e.g. `"1,5"`.
    pub target: Option<String>,
    pub original_estimate: i64,
    pub remaining_estimate: i64,
    pub logged: i64,
}

/// Tracker field ids that carry the group key and the target budget.
#[derive(Debug, Clone)]
pub struct FieldMap {
    pub group: String,
    pub target: String,
}

impl FieldMap {
    pub const ORIGINAL_ESTIMATE: &'static str = "timeoriginalestimate";
    pub const REMAINING_ESTIMATE: &'static str = "timeestimate";
    pub const LOGGED: &'static str = "timespent";

    /// Comma separated `fields` parameter for the search request.
    pub fn request_fields(&self) -> String {
        [
            self.group.as_str(),
            self.target.as_str(),
            Self::ORIGINAL_ESTIMATE,
            Self::REMAINING_ESTIMATE,
            Self::LOGGED,
        ]
        .join(",")
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Issue {
    pub fn to_record(&self, map: &FieldMap) -> Result<RawRecord> {
        let group_key = self
            .fields
            .get(&map.group)
            .and_then(text_of)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ReportError::MissingGroupKey {
                issue: self.key.clone(),
            })?;
        Ok(RawRecord {
            group_key,
            target: self.fields.get(&map.target).and_then(text_of),
            original_estimate: self.seconds(FieldMap::ORIGINAL_ESTIMATE),
            remaining_estimate: self.seconds(FieldMap::REMAINING_ESTIMATE),
            logged: self.seconds(FieldMap::LOGGED),
        })
    }

    fn seconds(&self, field: &str) -> i64 {
        self.fields.get(field).and_then(Value::as_i64).unwrap_or(0)
    }
}

// Custom fields arrive as plain strings, numbers, or select options `{ "value": ... }`.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(o) => o.get("value").and_then(text_of),
        _ => None,
    }
}
