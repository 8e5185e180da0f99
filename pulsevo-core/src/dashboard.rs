//! Fan-out loaders for the overview and AI insights pages.
//!
//! Both loaders share one failure policy: a section that fails to load is
//! replaced by its default value and recorded in `failures`. Nothing short of
//! every section failing makes the page unavailable.

use serde::Serialize;
use tracing::{debug, warn};

use crate::api::DashboardApi;
use crate::error::PulsevoResult;
use crate::models::{
    AiSummary, ClosurePerformance, DistributionSlice, DueCompliance, MemberPerformance,
    OverviewMetrics, Predictions, ProductivityTrend, Sentiment, TeamBenchmark, TimeFilter,
    TrendPoint,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionFailure {
    pub section: &'static str,
    pub error: String,
}

fn settle<T: Default>(
    section: &'static str,
    result: PulsevoResult<T>,
    failures: &mut Vec<SectionFailure>,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(
                section,
                error_code = e.error_code(),
                "Section failed to load, using defaults: {}",
                e
            );
            failures.push(SectionFailure {
                section,
                error: e.to_string(),
            });
            T::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewSnapshot {
    pub filter: TimeFilter,
    pub metrics: OverviewMetrics,
    pub distribution: Vec<DistributionSlice>,
    pub trends: Vec<TrendPoint>,
    pub team_performance: Vec<MemberPerformance>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SectionFailure>,
}

impl OverviewSnapshot {
    pub const SECTIONS: usize = 4;

    pub fn is_unavailable(&self) -> bool {
        self.failures.len() >= Self::SECTIONS
    }

    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty() && !self.is_unavailable()
    }
}

pub async fn load_overview(api: &dyn DashboardApi, filter: TimeFilter) -> OverviewSnapshot {
    debug!(filter = %filter, "Loading overview");

    let (metrics, distribution, trends, team_performance) = tokio::join!(
        api.overview(filter),
        api.distribution(filter),
        api.trends(filter),
        api.team_performance(filter),
    );

    let mut failures = Vec::new();
    OverviewSnapshot {
        filter,
        metrics: settle("overview", metrics, &mut failures),
        distribution: settle("distribution", distribution, &mut failures),
        trends: settle("trends", trends, &mut failures),
        team_performance: settle("team-performance", team_performance, &mut failures),
        failures,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsightsReport {
    pub filter: TimeFilter,
    pub summary: AiSummary,
    pub closure_performance: ClosurePerformance,
    pub due_compliance: DueCompliance,
    pub predictions: Predictions,
    pub team_benchmarking: Vec<TeamBenchmark>,
    pub productivity_trends: Vec<ProductivityTrend>,
    pub sentiment: Sentiment,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SectionFailure>,
}

impl InsightsReport {
    pub const SECTIONS: usize = 7;

    pub fn is_unavailable(&self) -> bool {
        self.failures.len() >= Self::SECTIONS
    }

    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty() && !self.is_unavailable()
    }
}

pub async fn load_insights(api: &dyn DashboardApi, filter: TimeFilter) -> InsightsReport {
    debug!(filter = %filter, "Loading AI insights");

    let (summary, closure, due, predictions, benchmarking, productivity, sentiment) = tokio::join!(
        api.ai_summary(filter),
        api.closure_performance(filter),
        api.due_compliance(filter),
        api.predictions(filter),
        api.team_benchmarking(filter),
        api.productivity_trends(filter),
        api.sentiment(filter),
    );

    let mut failures = Vec::new();
    InsightsReport {
        filter,
        summary: settle("summary", summary, &mut failures),
        closure_performance: settle("closure-performance", closure, &mut failures),
        due_compliance: settle("due-compliance", due, &mut failures),
        predictions: settle("predictions", predictions, &mut failures),
        team_benchmarking: settle("team-benchmarking", benchmarking, &mut failures),
        productivity_trends: settle("productivity-trends", productivity, &mut failures),
        sentiment: settle("sentiment", sentiment, &mut failures),
        failures,
    }
}
