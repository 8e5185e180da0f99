#![allow(dead_code, unused_imports)]

use pulsevo_core::{
    fetch_roster_data, load_insights, load_overview, upload_tasks, ChatRole, ChatSession,
    ChatState, HttpDashboardClient, PulsevoError, RosterAction, RosterController, StatusFilter,
    SubmitOutcome, TaskStatus, TimeFilter, FALLBACK_REPLY,
};
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpDashboardClient {
    HttpDashboardClient::from_base_url(format!("{}/api", server.uri())).unwrap()
}

async fn mount_users(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"user_id": "U1", "name": "Ann Lee", "email": "ann@example.com"},
            {"user_id": "U2", "name": "Bo Park", "email": "bo@example.com"}
        ])))
        .mount(server)
        .await;
}

mod chat_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_network_error_appends_fallback() {
        let client = HttpDashboardClient::from_base_url("http://127.0.0.1:1/api").unwrap();
        let mut session = ChatSession::with_greeting();

        let outcome = session.submit(&client, "How many bugs did we close?").await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(session.state(), ChatState::Idle);

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].text, "How many bugs did we close?");
        assert_eq!(messages[2].role, ChatRole::Bot);
        assert_eq!(
            messages[2].text,
            "Sorry, I'm having trouble processing that request. Please try again."
        );
    }

    #[tokio::test]
    async fn test_server_error_appends_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let mut session = ChatSession::new();
        let outcome = session.submit(&client_for(&server), "velocity?").await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(session.messages().last().unwrap().text, FALLBACK_REPLY);
        assert!(!session.is_awaiting());
    }

    #[tokio::test]
    async fn test_blank_question_never_reaches_backend() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut session = ChatSession::new();
        let outcome = session.submit(&client_for(&server), "   ").await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Rejected(PulsevoError::EmptyQuestion)
        ));
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_large_answer_is_expandable() {
        let server = MockServer::start().await;
        let rows: Vec<_> = (1..=12)
            .map(|i| json!({"status": "Blocked", "task_id": format!("T-{i}")}))
            .collect();
        Mock::given(method("POST"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "12 blocked tasks",
                "data": rows,
                "count": 12
            })))
            .mount(&server)
            .await;

        let mut session = ChatSession::new();
        let outcome = session
            .submit(&client_for(&server), "Show me blocked tasks")
            .await;

        assert!(matches!(outcome, SubmitOutcome::Answered));
        let table = session.latest_expandable().expect("expandable result");
        assert_eq!(table.row_count, 12);
        assert_eq!(table.columns, vec!["status", "task_id"]);
    }
}

mod roster_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_refresh_builds_first_page() {
        let server = MockServer::start().await;
        mount_users(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users_stats": {
                    "U1": {"assigned": 10, "completed": 7, "in_progress": 2, "open": 1},
                    "U2": {"assigned": 0, "completed": 0, "in_progress": 0, "open": 0}
                }
            })))
            .mount(&server)
            .await;

        let mut controller = RosterController::new();
        let page = controller.refresh(&client_for(&server)).await.unwrap();

        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].user.name, "Ann Lee");
        assert_eq!(page.rows[0].completion_percentage, 70);
        assert_eq!(page.total_pages, 1);
        assert!(controller.is_loaded());
    }

    #[tokio::test]
    async fn test_refresh_tolerates_null_stats_entries() {
        let server = MockServer::start().await;
        mount_users(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users_stats": {
                    "U1": {"assigned": 10, "completed": 7},
                    "U2": null
                },
                "total": null,
                "pages": null
            })))
            .mount(&server)
            .await;

        let mut controller = RosterController::new();
        let page = controller.refresh(&client_for(&server)).await.unwrap();

        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].user.user_id, "U1");
        assert_eq!(page.rows[0].completion_percentage, 70);
    }

    #[tokio::test]
    async fn test_slow_stale_response_is_discarded() {
        let server = MockServer::start().await;
        mount_users(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .and(query_param("status", "Open"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(200))
                    .set_body_json(json!({
                        "users_stats": {"U2": {"assigned": 3, "completed": 0}}
                    })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .and(query_param("status", "Blocked"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users_stats": {"U1": {"assigned": 2, "completed": 1}}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut controller = RosterController::new();

        controller.dispatch(RosterAction::SetStatus(StatusFilter::Only(TaskStatus::Open)));
        let slow = controller.begin_fetch();
        controller.dispatch(RosterAction::SetStatus(StatusFilter::Only(
            TaskStatus::Blocked,
        )));
        let fast = controller.begin_fetch();

        let (slow_data, fast_data) = tokio::join!(
            fetch_roster_data(&client, &slow),
            fetch_roster_data(&client, &fast)
        );

        assert!(controller.complete_fetch(fast, fast_data.unwrap()));
        assert!(!controller.complete_fetch(slow, slow_data.unwrap()));

        let page = controller.current_page();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].user.user_id, "U1");
        assert_eq!(page.rows[0].completion_percentage, 50);
    }

    #[tokio::test]
    async fn test_refresh_failure_surfaces_error() {
        let server = MockServer::start().await;
        mount_users(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let mut controller = RosterController::new();
        let err = controller
            .refresh(&client_for(&server))
            .await
            .unwrap_err();

        assert!(err.is_transient());
        assert!(!controller.is_loaded());
        assert!(controller.current_page().is_empty());
    }
}

mod dashboard_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_overview_renders_partial_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/overview"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"open_tasks": 8})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/distribution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Open", "value": 8}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/trends"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/team-performance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let snapshot = load_overview(&client_for(&server), TimeFilter::Today).await;

        assert_eq!(snapshot.metrics.open_tasks, 8);
        assert_eq!(snapshot.distribution.len(), 1);
        assert!(snapshot.trends.is_empty());
        assert_eq!(snapshot.failures.len(), 1);
        assert_eq!(snapshot.failures[0].section, "trends");
        assert!(snapshot.is_partial());
    }

    #[tokio::test]
    async fn test_insights_unavailable_when_backend_down() {
        let client = HttpDashboardClient::from_base_url("http://127.0.0.1:1/api").unwrap();

        let report = load_insights(&client, TimeFilter::All).await;

        assert_eq!(report.failures.len(), 7);
        assert!(report.is_unavailable());
        assert_eq!(report.summary.summary, "");
    }
}

mod upload_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_non_csv_rejected_without_network_call() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tasks.xlsx");
        std::fs::write(&file, "task_id\nT-1\n").unwrap();

        let err = upload_tasks(&client_for(&server), &file).await.unwrap_err();
        assert!(matches!(&err, PulsevoError::InvalidUpload(msg) if msg == "Please upload a CSV file"));
    }

    #[tokio::test]
    async fn test_csv_upload_posts_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tasks/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tasks_added": 2,
                "tasks_skipped": 0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut file = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        writeln!(file, "task_id,task_name\nT-1,Fix login\nT-2,Ship docs").unwrap();

        let summary = upload_tasks(&client_for(&server), file.path()).await.unwrap();
        assert_eq!(summary.tasks_added, 2);
    }

    #[tokio::test]
    async fn test_missing_csv_is_io_error() {
        let server = MockServer::start().await;
        let err = upload_tasks(&client_for(&server), std::path::Path::new("/nope/tasks.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, PulsevoError::IoError(_)));
    }
}
