use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

/// Body of the older `POST /chat` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

/// Answer from either query endpoint. `/chat` only fills `response` and
/// `timestamp`; `/query` may attach tabular rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub question: Option<String>,
}

impl QueryResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            response: text.into(),
            ..Default::default()
        }
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        self.data.as_deref().unwrap_or(&[])
    }

    pub fn has_rows(&self) -> bool {
        !self.rows().is_empty()
    }
}
