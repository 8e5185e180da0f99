//! Task roster: users merged with their task counts, filtered and paged.
//!
//! Aggregation is pure and synchronous. Only the data fetch that feeds it
//! is async, and [`RosterController`] guards that fetch with a request
//! generation so a slow response for an old filter never overwrites a
//! newer one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::DashboardApi;
use crate::error::PulsevoResult;
use crate::models::{StatusFilter, TaskQuery, TaskStatEntry, User};

/// Rows per roster page.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterRow {
    pub user: User,
    pub assigned: u64,
    pub completed: u64,
    pub in_progress: u64,
    pub open: u64,
    pub completion_percentage: u8,
}

impl RosterRow {
    pub fn new(user: &User, stats: &TaskStatEntry) -> Self {
        Self {
            user: user.clone(),
            assigned: stats.assigned,
            completed: stats.completed,
            in_progress: stats.in_progress,
            open: stats.open,
            completion_percentage: completion_percentage(stats.completed, stats.assigned),
        }
    }
}

/// `round(100 * completed / assigned)`, 0 when nothing is assigned, never above 100.
pub fn completion_percentage(completed: u64, assigned: u64) -> u8 {
    if assigned == 0 {
        return 0;
    }
    let pct = (completed as f64 * 100.0 / assigned as f64).round();
    pct.clamp(0.0, 100.0) as u8
}

/// `ceil(count / PAGE_SIZE)`; zero rows means zero pages.
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Clamp a requested page into `[1, max(1, total_pages)]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterPage {
    pub rows: Vec<RosterRow>,
    /// Page actually served after clamping.
    pub page: usize,
    pub filtered_count: usize,
    pub total_pages: usize,
}

impl RosterPage {
    /// True when the "no results" state should be shown.
    pub fn is_empty(&self) -> bool {
        self.filtered_count == 0
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Merge users with their stats and drop anyone with nothing assigned.
///
/// Users missing from `stats` get an all-zero entry, so they drop out too.
pub fn build_roster(users: &[User], stats: &HashMap<String, TaskStatEntry>) -> Vec<RosterRow> {
    let empty = TaskStatEntry::default();
    users
        .iter()
        .map(|user| RosterRow::new(user, stats.get(&user.user_id).unwrap_or(&empty)))
        .filter(|row| row.assigned > 0)
        .collect()
}

/// Build, search, and page the roster in one pass.
pub fn aggregate_roster(
    users: &[User],
    stats: &HashMap<String, TaskStatEntry>,
    search: &str,
    page: usize,
) -> RosterPage {
    let filtered: Vec<RosterRow> = build_roster(users, stats)
        .into_iter()
        .filter(|row| row.user.matches_search(search))
        .collect();

    let filtered_count = filtered.len();
    let total_pages = total_pages(filtered_count);
    let page = clamp_page(page, total_pages);
    let start = (page - 1) * PAGE_SIZE;

    let rows = filtered.into_iter().skip(start).take(PAGE_SIZE).collect();

    RosterPage {
        rows,
        page,
        filtered_count,
        total_pages,
    }
}

// ============================================================================
// View state
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterViewState {
    pub search: String,
    pub status: StatusFilter,
    pub page: usize,
}

impl Default for RosterViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            page: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterAction {
    SetSearch(String),
    SetStatus(StatusFilter),
    NextPage,
    PreviousPage,
    GoToPage(usize),
}

impl RosterViewState {
    /// Pure transition. Changing search or status resets to page 1; page
    /// moves are only bounded below here and clamped by the aggregator.
    pub fn apply(self, action: RosterAction) -> Self {
        match action {
            RosterAction::SetSearch(search) if search != self.search => Self {
                search,
                page: 1,
                ..self
            },
            RosterAction::SetStatus(status) if status != self.status => Self {
                status,
                page: 1,
                ..self
            },
            RosterAction::SetSearch(_) | RosterAction::SetStatus(_) => self,
            RosterAction::NextPage => Self {
                page: self.page.saturating_add(1),
                ..self
            },
            RosterAction::PreviousPage => Self {
                page: self.page.saturating_sub(1).max(1),
                ..self
            },
            RosterAction::GoToPage(page) => Self {
                page: page.max(1),
                ..self
            },
        }
    }
}

// ============================================================================
// Fetch generation
// ============================================================================

/// Monotonic counter identifying the most recently issued fetch.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: u64,
}

impl RequestGeneration {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }
}

/// Handle for one in-flight roster fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub status: StatusFilter,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterData {
    pub users: Vec<User>,
    pub stats: HashMap<String, TaskStatEntry>,
}

/// Fetch users and the status-filtered stats map concurrently.
///
/// Takes no controller borrow so callers may run several tickets at once.
pub async fn fetch_roster_data(
    api: &dyn DashboardApi,
    ticket: &FetchTicket,
) -> PulsevoResult<RosterData> {
    let query = TaskQuery::with_status(ticket.status.query_value());
    let (tasks, users) = tokio::join!(api.tasks(&query), api.users(None));

    Ok(RosterData {
        users: users?,
        stats: tasks?.users_stats,
    })
}

// ============================================================================
// Controller
// ============================================================================

#[derive(Debug, Default)]
pub struct RosterController {
    state: RosterViewState,
    data: RosterData,
    generation: RequestGeneration,
    loaded: bool,
}

impl RosterController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: RosterViewState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    pub fn state(&self) -> &RosterViewState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Apply a view action. Returns true when the backing data must be refetched.
    pub fn dispatch(&mut self, action: RosterAction) -> bool {
        let previous_status = self.state.status;
        let state = std::mem::take(&mut self.state).apply(action);
        self.state = state;

        if self.loaded {
            let served = self.current_page().page;
            self.state.page = served;
        }

        self.state.status != previous_status
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        FetchTicket {
            generation: self.generation.issue(),
            status: self.state.status,
        }
    }

    /// Apply fetched data if `ticket` is still the latest. Returns whether it was applied.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, data: RosterData) -> bool {
        if !self.generation.is_current(ticket.generation) {
            warn!(
                generation = ticket.generation,
                latest = self.generation.latest(),
                "Discarding stale roster response"
            );
            return false;
        }

        debug!(
            generation = ticket.generation,
            users = data.users.len(),
            stats = data.stats.len(),
            "Applying roster data"
        );
        self.data = data;
        self.loaded = true;
        self.state.page = self.current_page().page;
        true
    }

    pub async fn refresh(&mut self, api: &dyn DashboardApi) -> PulsevoResult<RosterPage> {
        let ticket = self.begin_fetch();
        let data = fetch_roster_data(api, &ticket).await.inspect_err(|e| e.log())?;
        self.complete_fetch(ticket, data);
        Ok(self.current_page())
    }

    pub fn current_page(&self) -> RosterPage {
        aggregate_roster(
            &self.data.users,
            &self.data.stats,
            &self.state.search,
            self.state.page,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    fn stats_for(entries: &[(&str, u64, u64)]) -> HashMap<String, TaskStatEntry> {
        entries
            .iter()
            .map(|(id, assigned, completed)| {
                (
                    id.to_string(),
                    TaskStatEntry::new(*assigned, *completed, 0, assigned - completed),
                )
            })
            .collect()
    }

    fn team(n: usize) -> (Vec<User>, HashMap<String, TaskStatEntry>) {
        let users: Vec<User> = (1..=n)
            .map(|i| User::new(format!("U{i:03}"), format!("Member {i}")))
            .collect();
        let stats = users
            .iter()
            .map(|u| (u.user_id.clone(), TaskStatEntry::new(4, 2, 1, 1)))
            .collect();
        (users, stats)
    }

    #[test]
    fn test_ann_and_bo_scenario() {
        let users = vec![User::new("U1", "Ann"), User::new("U2", "Bo")];
        let stats = stats_for(&[("U1", 10, 7), ("U2", 0, 0)]);

        let page = aggregate_roster(&users, &stats, "", 1);

        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].user.name, "Ann");
        assert_eq!(page.rows[0].completion_percentage, 70);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.filtered_count, 1);
    }

    #[test]
    fn test_completion_percentage_bounds() {
        assert_eq!(completion_percentage(0, 0), 0);
        assert_eq!(completion_percentage(5, 0), 0);
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(3, 3), 100);
        assert_eq!(completion_percentage(9, 3), 100);
    }

    #[test]
    fn test_missing_stats_excludes_user() {
        let users = vec![User::new("U1", "Ann"), User::new("U9", "Ghost")];
        let stats = stats_for(&[("U1", 2, 1)]);

        let rows = build_roster(&users, &stats);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user.user_id, "U1");
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let users = vec![
            User::new("U1", "Priya Sharma"),
            User::new("U2", "Sam Harper"),
            User::new("U3", "Lee Chen"),
        ];
        let stats = stats_for(&[("U1", 3, 1), ("U2", 3, 2), ("U3", 3, 3)]);

        let page = aggregate_roster(&users, &stats, "HAR", 1);
        let names: Vec<&str> = page.rows.iter().map(|r| r.user.name.as_str()).collect();
        assert_eq!(names, vec!["Priya Sharma", "Sam Harper"]);

        let all = aggregate_roster(&users, &stats, "", 1);
        assert_eq!(all.filtered_count, 3);

        let padded = aggregate_roster(&users, &stats, " lee", 1);
        assert!(padded.is_empty(), "search text is matched as typed");
    }

    #[test]
    fn test_pagination_counts() {
        let (users, stats) = team(23);

        let first = aggregate_roster(&users, &stats, "", 1);
        assert_eq!(first.rows.len(), 10);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let last = aggregate_roster(&users, &stats, "", 3);
        assert_eq!(last.rows.len(), 3);
        assert_eq!(last.rows[0].user.name, "Member 21");
        assert!(!last.has_next());
    }

    #[test]
    fn test_out_of_range_pages_clamp() {
        let (users, stats) = team(15);

        let high = aggregate_roster(&users, &stats, "", 99);
        assert_eq!(high.page, 2);
        assert_eq!(high.rows.len(), 5);

        let low = aggregate_roster(&users, &stats, "", 0);
        assert_eq!(low.page, 1);
        assert_eq!(low.rows.len(), 10);
    }

    #[test]
    fn test_empty_roster_has_zero_pages() {
        let users = vec![User::new("U1", "Ann")];
        let stats = stats_for(&[("U1", 4, 1)]);

        let page = aggregate_roster(&users, &stats, "nobody", 5);
        assert!(page.is_empty());
        assert!(page.rows.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
    }

    #[test]
    fn test_view_state_transitions() {
        let state = RosterViewState::default()
            .apply(RosterAction::GoToPage(4))
            .apply(RosterAction::NextPage);
        assert_eq!(state.page, 5);

        let state = state.apply(RosterAction::SetSearch("ann".to_string()));
        assert_eq!(state.page, 1);
        assert_eq!(state.search, "ann");

        let state = state
            .apply(RosterAction::GoToPage(3))
            .apply(RosterAction::SetStatus(StatusFilter::Only(TaskStatus::Blocked)));
        assert_eq!(state.page, 1);

        let state = state
            .apply(RosterAction::GoToPage(3))
            .apply(RosterAction::SetSearch("ann".to_string()));
        assert_eq!(state.page, 3, "unchanged search keeps the page");

        let state = RosterViewState::default()
            .apply(RosterAction::PreviousPage)
            .apply(RosterAction::GoToPage(0));
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_view_state_serializes() {
        let state = RosterViewState {
            search: "lee".to_string(),
            status: StatusFilter::Only(TaskStatus::Open),
            page: 2,
        };
        let json = serde_json::to_string(&state).unwrap();
        let back: RosterViewState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let mut controller = RosterController::new();

        let first = controller.begin_fetch();
        controller.dispatch(RosterAction::SetStatus(StatusFilter::Only(
            TaskStatus::Completed,
        )));
        let second = controller.begin_fetch();
        assert!(second.generation > first.generation);
        assert_eq!(second.status, StatusFilter::Only(TaskStatus::Completed));

        let fresh = RosterData {
            users: vec![User::new("U1", "Ann")],
            stats: stats_for(&[("U1", 5, 5)]),
        };
        let stale = RosterData {
            users: vec![User::new("U2", "Bo")],
            stats: stats_for(&[("U2", 5, 1)]),
        };

        assert!(controller.complete_fetch(second, fresh));
        assert!(!controller.complete_fetch(first, stale));

        let page = controller.current_page();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].user.name, "Ann");
    }

    #[test]
    fn test_dispatch_clamps_page_once_loaded() {
        let (users, stats) = team(12);
        let mut controller = RosterController::new();
        let ticket = controller.begin_fetch();
        controller.complete_fetch(ticket, RosterData { users, stats });

        controller.dispatch(RosterAction::NextPage);
        controller.dispatch(RosterAction::NextPage);
        assert_eq!(controller.state().page, 2);

        let refetch = controller.dispatch(RosterAction::SetSearch("member 1".to_string()));
        assert!(!refetch);
        assert_eq!(controller.state().page, 1);

        let refetch =
            controller.dispatch(RosterAction::SetStatus(StatusFilter::Only(TaskStatus::Open)));
        assert!(refetch);
    }
}
