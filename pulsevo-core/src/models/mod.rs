mod dashboard;
mod filter;
mod query;
mod settings;
mod task;
mod user;

pub use dashboard::{
    AiSummary, ClosurePerformance, DistributionSlice, DueCompliance, HealthStatus,
    MemberPerformance, OverviewMetrics, Predictions, ProductivityTrend, Sentiment, TeamBenchmark,
    TrendPoint,
};
pub use filter::{StatusFilter, TaskStatus, TimeFilter};
pub use query::{ChatRequest, QueryRequest, QueryResponse};
pub use settings::{NotificationSettings, SaveSettingsResponse, Settings};
pub use task::{
    lenient_count, ProjectStat, StatusCounts, Task, TaskListResponse, TaskQuery, TaskStatEntry,
    UploadSummary,
};
pub use user::User;
