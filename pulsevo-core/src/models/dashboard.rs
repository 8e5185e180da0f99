//! Payloads of the overview and AI insight endpoints.
//!
//! Every struct defaults field-by-field so a partially populated response
//! still renders with zeros instead of failing the whole page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewMetrics {
    pub open_tasks: u64,
    pub open_change: f64,
    pub in_progress: u64,
    pub progress_change: f64,
    pub completed_today: u64,
    pub today_change: f64,
    pub completed_this_hour: u64,
    pub hour_change: f64,
    pub completion_rate: f64,
    pub rate_change: f64,
    pub blocked_tasks: u64,
    pub total_tasks: u64,
    pub completed_tasks: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionSlice {
    pub name: String,
    pub value: u64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendPoint {
    pub date: String,
    pub created: u64,
    pub completed: u64,
    pub in_progress: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberPerformance {
    pub name: String,
    pub completed: u64,
    pub in_progress: u64,
    pub open: u64,
}

impl MemberPerformance {
    pub fn total(&self) -> u64 {
        self.completed + self.in_progress + self.open
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSummary {
    pub summary: String,
    pub completed_24h: u64,
    pub avg_closure_time: f64,
    pub velocity_change: f64,
    pub blocked_tasks: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosurePerformance {
    pub current_avg: f64,
    pub previous_avg: f64,
    pub blocked_tasks: u64,
    pub blocked_percentage: f64,
}

impl ClosurePerformance {
    /// Positive when closing tasks got slower.
    pub fn delta_hours(&self) -> f64 {
        self.current_avg - self.previous_avg
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DueCompliance {
    pub overdue: u64,
    pub on_time: u64,
    pub active_tasks: u64,
    pub avg_active_time: f64,
}

impl DueCompliance {
    pub fn compliance_rate(&self) -> f64 {
        let finished = self.overdue + self.on_time;
        if finished == 0 {
            0.0
        } else {
            self.on_time as f64 * 100.0 / finished as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Predictions {
    pub sprint_completion: f64,
    pub next_week_workload: String,
    pub expected_tasks: u64,
    pub risk_level: String,
    pub risk_description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamBenchmark {
    pub name: String,
    pub total_tasks: u64,
    pub velocity: f64,
    pub efficiency: f64,
    pub rank: u32,
    pub badge: Option<String>,
}

/// One week of throughput, keyed by team (`your_team`, `alpha_team`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductivityTrend {
    #[serde(default)]
    pub week: String,
    #[serde(flatten)]
    pub teams: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sentiment {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    pub insight: String,
}

impl Sentiment {
    pub fn dominant(&self) -> &'static str {
        if self.positive >= self.neutral && self.positive >= self.negative {
            "positive"
        } else if self.negative > self.neutral {
            "negative"
        } else {
            "neutral"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: Option<String>,
    pub database: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}
