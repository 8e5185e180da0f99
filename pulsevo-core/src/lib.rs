#![allow(clippy::manual_range_contains, clippy::derivable_impls, dead_code)]

pub mod api;
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod roster;
pub mod upload;

pub use api::{DashboardApi, HttpDashboardClient};
pub use chat::{
    display_value, ChatMessage, ChatRole, ChatSession, ChatState, PendingQuestion,
    ResultAttachment, SubmitOutcome, TabularResult, FALLBACK_REPLY, GREETING, INLINE_ROW_LIMIT,
};
pub use config::{
    default_config_file, get_config_dir, ApiConfig, ConfigLoadError, DisplayConfig,
    LoggingConfig, PulsevoConfig, QueryEndpoint,
};
pub use dashboard::{
    load_insights, load_overview, InsightsReport, OverviewSnapshot, SectionFailure,
};
pub use error::{CliErrorDisplay, PulsevoError, PulsevoResult};
pub use models::{
    AiSummary, ClosurePerformance, DistributionSlice, DueCompliance, HealthStatus,
    MemberPerformance, NotificationSettings, OverviewMetrics, Predictions, ProductivityTrend,
    ProjectStat, QueryResponse, SaveSettingsResponse, Sentiment, Settings, StatusCounts,
    StatusFilter, Task, TaskListResponse, TaskQuery, TaskStatEntry, TaskStatus, TeamBenchmark,
    TimeFilter, TrendPoint, UploadSummary, User,
};
pub use roster::{
    aggregate_roster, build_roster, completion_percentage, fetch_roster_data, FetchTicket,
    RequestGeneration, RosterAction, RosterController, RosterData, RosterPage, RosterRow,
    RosterViewState, PAGE_SIZE,
};
pub use upload::{upload_tasks, validate_csv_path, NOT_CSV_MESSAGE};
