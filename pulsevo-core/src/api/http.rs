use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, IntoUrl, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::DashboardApi;
use crate::config::{ApiConfig, QueryEndpoint};
use crate::error::{PulsevoError, PulsevoResult};
use crate::models::{
    AiSummary, ChatRequest, ClosurePerformance, DistributionSlice, DueCompliance, HealthStatus,
    MemberPerformance, OverviewMetrics, Predictions, ProductivityTrend, ProjectStat, QueryRequest,
    QueryResponse, SaveSettingsResponse, Sentiment, Settings, StatusCounts, Task,
    TaskListResponse, TaskQuery, TeamBenchmark, TimeFilter, TrendPoint, UploadSummary, User,
};

/// `GET /tasks` has answered both with a paged object and a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum TasksPayload {
    Bare(Vec<Task>),
    Paged(TaskListResponse),
}

impl From<TasksPayload> for TaskListResponse {
    fn from(payload: TasksPayload) -> Self {
        match payload {
            TasksPayload::Paged(resp) => resp,
            TasksPayload::Bare(tasks) => TaskListResponse {
                total: tasks.len() as u64,
                tasks,
                ..Default::default()
            },
        }
    }
}

pub struct HttpDashboardClient {
    client: Client,
    base_url: String,
    query_endpoint: QueryEndpoint,
    timeout_secs: u64,
}

impl HttpDashboardClient {
    pub fn new(config: &ApiConfig) -> PulsevoResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            query_endpoint: config.query_endpoint,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn from_base_url(base_url: impl Into<String>) -> PulsevoResult<Self> {
        let config = ApiConfig {
            base_url: base_url.into(),
            ..Default::default()
        };
        Self::new(&config)
    }

    pub fn with_query_endpoint(mut self, endpoint: QueryEndpoint) -> Self {
        self.query_endpoint = endpoint;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `collection` plus one percent-encoded id segment, e.g. `/tasks/T%2F1`.
    fn resource_url(&self, collection: &str, id: &str) -> PulsevoResult<Url> {
        let mut url = Url::parse(&self.url(collection))
            .map_err(|e| PulsevoError::ApiRequestFailed(format!("{}: {}", collection, e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                PulsevoError::ApiRequestFailed(format!("{}: base URL cannot take a path", collection))
            })?
            .push(id);
        Ok(url)
    }

    fn send_error(&self, err: reqwest::Error) -> PulsevoError {
        if err.is_timeout() {
            PulsevoError::ApiTimeout(self.timeout_secs)
        } else {
            err.into()
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> PulsevoResult<T> {
        self.get_from(path, self.url(path), params).await
    }

    async fn get_from<T: DeserializeOwned>(
        &self,
        path: &str,
        url: impl IntoUrl + Send,
        params: &[(&str, String)],
    ) -> PulsevoResult<T> {
        debug!(path, ?params, "GET");
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        decode(path, response).await
    }

    async fn get_filtered<T: DeserializeOwned>(
        &self,
        path: &str,
        filter: TimeFilter,
    ) -> PulsevoResult<T> {
        self.get_json(path, &[("filter", filter.as_query_value().to_string())])
            .await
    }

    async fn post_json<B: Serialize + ?Sized + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> PulsevoResult<T> {
        debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        decode(path, response).await
    }
}

async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> PulsevoResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PulsevoError::from_status(status.as_u16(), path, body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| PulsevoError::ApiParseError(format!("{}: {}", path, e)))
}

#[async_trait]
impl DashboardApi for HttpDashboardClient {
    async fn overview(&self, filter: TimeFilter) -> PulsevoResult<OverviewMetrics> {
        self.get_filtered("/overview", filter).await
    }

    async fn distribution(&self, filter: TimeFilter) -> PulsevoResult<Vec<DistributionSlice>> {
        self.get_filtered("/distribution", filter).await
    }

    async fn trends(&self, filter: TimeFilter) -> PulsevoResult<Vec<TrendPoint>> {
        self.get_filtered("/trends", filter).await
    }

    async fn team_performance(&self, filter: TimeFilter) -> PulsevoResult<Vec<MemberPerformance>> {
        self.get_filtered("/team-performance", filter).await
    }

    async fn tasks(&self, query: &TaskQuery) -> PulsevoResult<TaskListResponse> {
        let payload: TasksPayload = self.get_json("/tasks", &query.to_params()).await?;
        Ok(payload.into())
    }

    async fn task(&self, task_id: &str) -> PulsevoResult<Task> {
        let url = self.resource_url("/tasks", task_id)?;
        self.get_from(&format!("/tasks/{}", task_id), url, &[]).await
    }

    async fn status_counts(&self) -> PulsevoResult<StatusCounts> {
        self.get_json("/tasks/status-counts", &[]).await
    }

    async fn upload_tasks(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> PulsevoResult<UploadSummary> {
        let path = "/tasks/upload";
        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        info!(file_name, "Uploading task export");
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        decode(path, response).await
    }

    async fn users(&self, search: Option<&str>) -> PulsevoResult<Vec<User>> {
        let params: Vec<(&str, String)> = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| vec![("search", s.to_string())])
            .unwrap_or_default();
        self.get_json("/users", &params).await
    }

    async fn user(&self, user_id: &str) -> PulsevoResult<User> {
        let url = self.resource_url("/users", user_id)?;
        self.get_from(&format!("/users/{}", user_id), url, &[]).await
    }

    async fn projects(&self) -> PulsevoResult<Vec<String>> {
        self.get_json("/projects", &[]).await
    }

    async fn project_stats(&self) -> PulsevoResult<Vec<ProjectStat>> {
        self.get_json("/projects/stats", &[]).await
    }

    async fn ai_summary(&self, filter: TimeFilter) -> PulsevoResult<AiSummary> {
        self.get_filtered("/ai/summary", filter).await
    }

    async fn closure_performance(&self, filter: TimeFilter) -> PulsevoResult<ClosurePerformance> {
        self.get_filtered("/ai/closure-performance", filter).await
    }

    async fn due_compliance(&self, filter: TimeFilter) -> PulsevoResult<DueCompliance> {
        self.get_filtered("/ai/due-compliance", filter).await
    }

    async fn predictions(&self, filter: TimeFilter) -> PulsevoResult<Predictions> {
        self.get_filtered("/ai/predictions", filter).await
    }

    async fn team_benchmarking(&self, filter: TimeFilter) -> PulsevoResult<Vec<TeamBenchmark>> {
        self.get_filtered("/ai/team-benchmarking", filter).await
    }

    async fn productivity_trends(
        &self,
        filter: TimeFilter,
    ) -> PulsevoResult<Vec<ProductivityTrend>> {
        self.get_filtered("/ai/productivity-trends", filter).await
    }

    async fn sentiment(&self, filter: TimeFilter) -> PulsevoResult<Sentiment> {
        self.get_filtered("/ai/sentiment", filter).await
    }

    async fn send_query(&self, question: &str) -> PulsevoResult<QueryResponse> {
        let path = self.query_endpoint.path();
        match self.query_endpoint {
            QueryEndpoint::Query => {
                let body = QueryRequest {
                    question: question.to_string(),
                };
                self.post_json(path, &body).await
            }
            QueryEndpoint::Chat => {
                let body = ChatRequest {
                    query: question.to_string(),
                };
                self.post_json(path, &body).await
            }
        }
    }

    async fn settings(&self) -> PulsevoResult<Settings> {
        self.get_json("/settings", &[]).await
    }

    async fn save_settings(&self, settings: &Settings) -> PulsevoResult<SaveSettingsResponse> {
        let resp: SaveSettingsResponse = self.post_json("/settings", settings).await?;
        info!("Settings saved");
        Ok(resp)
    }

    async fn health(&self) -> PulsevoResult<HealthStatus> {
        self.get_json("/health", &[]).await
    }
}
