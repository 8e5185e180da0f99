use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PulsevoError;

/// Time window accepted by the overview and AI insight endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeFilter {
    Today,
    Week,
    Month,
    #[default]
    All,
}

impl TimeFilter {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            TimeFilter::Today => "today",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::All => "all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeFilter::Today => "Today",
            TimeFilter::Week => "This week",
            TimeFilter::Month => "This month",
            TimeFilter::All => "All time",
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_query_value())
    }
}

impl FromStr for TimeFilter {
    type Err = PulsevoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(TimeFilter::Today),
            "week" | "7d" => Ok(TimeFilter::Week),
            "month" | "30d" => Ok(TimeFilter::Month),
            "all" | "alltime" => Ok(TimeFilter::All),
            _ => Err(PulsevoError::InvalidFilter(format!(
                "Unknown time filter: {}. Valid filters: today, week, month, all",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "Open")]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Blocked")]
    Blocked,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Open,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Blocked,
    ];

    /// Name the backend stores and filters on.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "Open",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Blocked => "Blocked",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = PulsevoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "open" => Ok(TaskStatus::Open),
            "inprogress" | "ongoing" => Ok(TaskStatus::InProgress),
            "completed" | "done" | "closed" => Ok(TaskStatus::Completed),
            "blocked" => Ok(TaskStatus::Blocked),
            _ => Err(PulsevoError::InvalidFilter(format!(
                "Unknown task status: {}. Valid statuses: all, open, in-progress, completed, blocked",
                s
            ))),
        }
    }
}

/// Status dropdown on the tasks page: everything, or a single status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    /// Value for the `status` query parameter; `None` means "do not send".
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(status.as_str()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All Tasks",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = PulsevoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" | "all tasks" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}
