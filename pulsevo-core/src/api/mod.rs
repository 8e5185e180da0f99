//! Access to the PulseVo REST backend.
//!
//! Everything above this module talks to [`DashboardApi`], so tests can
//! swap the HTTP client for an in-memory fake.

mod http;

use async_trait::async_trait;

use crate::error::PulsevoResult;
use crate::models::{
    AiSummary, ClosurePerformance, DistributionSlice, DueCompliance, HealthStatus,
    MemberPerformance, OverviewMetrics, Predictions, ProductivityTrend, ProjectStat,
    QueryResponse, SaveSettingsResponse, Sentiment, Settings, StatusCounts, Task,
    TaskListResponse, TaskQuery, TeamBenchmark, TimeFilter, TrendPoint, UploadSummary, User,
};

pub use http::HttpDashboardClient;

#[async_trait]
pub trait DashboardApi: Send + Sync {
    // Overview
    async fn overview(&self, filter: TimeFilter) -> PulsevoResult<OverviewMetrics>;

    async fn distribution(&self, filter: TimeFilter) -> PulsevoResult<Vec<DistributionSlice>>;

    async fn trends(&self, filter: TimeFilter) -> PulsevoResult<Vec<TrendPoint>>;

    async fn team_performance(&self, filter: TimeFilter) -> PulsevoResult<Vec<MemberPerformance>>;

    // Tasks
    async fn tasks(&self, query: &TaskQuery) -> PulsevoResult<TaskListResponse>;

    async fn task(&self, task_id: &str) -> PulsevoResult<Task>;

    async fn status_counts(&self) -> PulsevoResult<StatusCounts>;

    /// Post a CSV export as multipart field `file`. Callers validate first.
    async fn upload_tasks(&self, file_name: &str, contents: Vec<u8>)
        -> PulsevoResult<UploadSummary>;

    // Users and projects
    async fn users(&self, search: Option<&str>) -> PulsevoResult<Vec<User>>;

    async fn user(&self, user_id: &str) -> PulsevoResult<User>;

    async fn projects(&self) -> PulsevoResult<Vec<String>>;

    async fn project_stats(&self) -> PulsevoResult<Vec<ProjectStat>>;

    // AI insights
    async fn ai_summary(&self, filter: TimeFilter) -> PulsevoResult<AiSummary>;

    async fn closure_performance(&self, filter: TimeFilter) -> PulsevoResult<ClosurePerformance>;

    async fn due_compliance(&self, filter: TimeFilter) -> PulsevoResult<DueCompliance>;

    async fn predictions(&self, filter: TimeFilter) -> PulsevoResult<Predictions>;

    async fn team_benchmarking(&self, filter: TimeFilter) -> PulsevoResult<Vec<TeamBenchmark>>;

    async fn productivity_trends(&self, filter: TimeFilter)
        -> PulsevoResult<Vec<ProductivityTrend>>;

    async fn sentiment(&self, filter: TimeFilter) -> PulsevoResult<Sentiment>;

    // Natural-language query
    async fn send_query(&self, question: &str) -> PulsevoResult<QueryResponse>;

    // Settings
    async fn settings(&self) -> PulsevoResult<Settings>;

    async fn save_settings(&self, settings: &Settings) -> PulsevoResult<SaveSettingsResponse>;

    async fn health(&self) -> PulsevoResult<HealthStatus>;
}
