use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Per-user task counts from the `users_stats` map of `GET /tasks`.
///
/// Counts pass through unchecked; `completed + in_progress + open` is
/// expected, not guaranteed, to stay within `assigned`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatEntry {
    #[serde(default, deserialize_with = "lenient_count")]
    pub assigned: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub completed: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub in_progress: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub open: u64,
}

impl TaskStatEntry {
    pub fn new(assigned: u64, completed: u64, in_progress: u64, open: u64) -> Self {
        Self {
            assigned,
            completed,
            in_progress,
            open,
        }
    }
}

/// Accept integers, floats, and numeric strings; anything else counts as zero.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_count(&value))
}

/// [`lenient_count`] for page-sized fields.
pub fn lenient_page<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_count(&value).min(u64::from(u32::MAX)) as u32)
}

/// `users_stats` map where a null or non-object entry reads as all zeros
/// and a non-object map reads as empty.
fn lenient_stats_map<'de, D>(deserializer: D) -> Result<HashMap<String, TaskStatEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Object(entries) = value else {
        return Ok(HashMap::new());
    };

    Ok(entries
        .into_iter()
        .map(|(user_id, entry)| {
            let stats: TaskStatEntry = serde_json::from_value(entry).unwrap_or_default();
            (user_id, stats)
        })
        .collect())
}

fn coerce_count(value: &serde_json::Value) -> u64 {
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() && n > 0.0 => n.round() as u64,
        _ => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub completed_date: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub blocked_reason: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl Task {
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|t| {
                t.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Query parameters for `GET /tasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl TaskQuery {
    pub fn with_status(status: Option<&str>) -> Self {
        Self {
            status: status.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = &self.status {
            params.push(("status", status.clone()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            params.push(("per_page", per_page.to_string()));
        }
        params
    }
}

/// Body of `GET /tasks`. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskListResponse {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default, deserialize_with = "lenient_stats_map")]
    pub users_stats: HashMap<String, TaskStatEntry>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: u32,
    #[serde(default, deserialize_with = "lenient_page")]
    pub per_page: u32,
    #[serde(default, deserialize_with = "lenient_page")]
    pub pages: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    #[serde(default, deserialize_with = "lenient_count")]
    pub all: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub open: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub in_progress: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub completed: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub blocked: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStat {
    pub project: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub open: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    #[serde(default, deserialize_with = "lenient_count")]
    pub tasks_added: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub tasks_skipped: u64,
    #[serde(default)]
    pub message: Option<String>,
}
