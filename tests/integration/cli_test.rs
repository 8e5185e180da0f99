use std::path::Path;
use std::process::{Command, Output};

use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNREACHABLE_API: &str = "http://127.0.0.1:1/api";

fn pulsevo_binary() -> &'static str {
    env!("CARGO_BIN_EXE_pulsevo")
}

/// Run the binary in `workdir` with HOME pointed there so no user config leaks in.
fn run_pulsevo_in(workdir: &Path, args: &[&str], env_vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(pulsevo_binary());
    cmd.args(args)
        .current_dir(workdir)
        .env("HOME", workdir)
        .env("XDG_CONFIG_HOME", workdir.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("PULSEVO_API_URL")
        .env_remove("PULSEVO_LOG_LEVEL")
        .env_remove("PULSEVO_QUERY_ENDPOINT")
        .env_remove("RUST_LOG");
    for (key, value) in env_vars {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to execute pulsevo command")
}

fn run_pulsevo(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    run_pulsevo_in(dir.path(), args, &[])
}

fn output_to_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_to_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

mod version_command_tests {
    use super::*;

    #[test]
    fn test_version_command_basic() {
        let output = run_pulsevo(&["version"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "version command should succeed");
        assert!(stdout.contains("pulsevo"), "output should contain 'pulsevo'");
        assert!(
            stdout.contains("0.1.0"),
            "output should contain version number"
        );
    }

    #[test]
    fn test_version_command_detailed() {
        let output = run_pulsevo(&["version", "--detailed"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "version --detailed should succeed");
        assert!(stdout.contains("Version"));
        assert!(stdout.contains("Apache-2.0"));
        assert!(
            stdout.contains("/query"),
            "output should list the query endpoint"
        );
    }
}

mod help_command_tests {
    use super::*;

    #[test]
    fn test_help_lists_commands() {
        let output = run_pulsevo(&["--help"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "--help should succeed");
        assert!(stdout.contains("PulseVo"));
        for command in ["overview", "insights", "tasks", "users", "query", "chat", "settings"] {
            assert!(stdout.contains(command), "help should mention {command}");
        }
    }

    #[test]
    fn test_tasks_help_lists_subcommands() {
        let output = run_pulsevo(&["tasks", "--help"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        for command in ["roster", "list", "counts", "upload"] {
            assert!(stdout.contains(command), "tasks help should mention {command}");
        }
    }

    #[test]
    fn test_unknown_command_fails() {
        let output = run_pulsevo(&["launch"]);
        assert!(!output.status.success());
    }
}

mod upload_command_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_non_csv_upload_rejected_before_network() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tasks.xlsx"), "task_id\nT-1\n").unwrap();
        let api_url = format!("{}/api", server.uri());

        let output = run_pulsevo_in(
            dir.path(),
            &["tasks", "upload", "tasks.xlsx"],
            &[("PULSEVO_API_URL", api_url.as_str())],
        );

        assert!(!output.status.success());
        assert!(
            stderr_to_string(&output).contains("Please upload a CSV file"),
            "stderr: {}",
            stderr_to_string(&output)
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_csv_upload_reports_counts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tasks/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tasks_added": 4,
                "tasks_skipped": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sprint.csv"), "task_id,task_name\nT-1,Fix\n").unwrap();
        let api_url = format!("{}/api", server.uri());

        let output = run_pulsevo_in(
            dir.path(),
            &["--api-url", &api_url, "tasks", "upload", "sprint.csv"],
            &[],
        );

        assert!(output.status.success(), "stderr: {}", stderr_to_string(&output));
        let stdout = output_to_string(&output);
        assert!(stdout.contains("Imported 4 tasks (1 skipped)"));
    }
}

mod roster_command_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_roster_shows_members_with_work() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"user_id": "U1", "name": "Ann Lee"},
                {"user_id": "U2", "name": "Bo Park"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users_stats": {
                    "U1": {"assigned": 10, "completed": 7, "in_progress": 2, "open": 1}
                }
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let api_url = format!("{}/api", server.uri());
        let output = run_pulsevo_in(
            dir.path(),
            &["tasks", "roster", "--format", "json"],
            &[("PULSEVO_API_URL", api_url.as_str())],
        );

        assert!(output.status.success(), "stderr: {}", stderr_to_string(&output));
        let page: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(page["total_pages"], 1);
        assert_eq!(page["rows"][0]["user"]["name"], "Ann Lee");
        assert_eq!(page["rows"][0]["completion_percentage"], 70);
        assert_eq!(page["rows"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_roster_rejects_unknown_status() {
        let output = run_pulsevo(&["tasks", "roster", "--status", "archived"]);
        assert!(!output.status.success());
        assert!(stderr_to_string(&output).contains("E3004"));
    }
}

mod query_command_tests {
    use super::*;

    #[test]
    fn test_query_against_unreachable_backend_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_pulsevo_in(
            dir.path(),
            &["query", "How many bugs did we close?"],
            &[("PULSEVO_API_URL", UNREACHABLE_API)],
        );

        assert!(!output.status.success());
        assert!(stderr_to_string(&output).contains("Error"));
    }
}

mod config_command_tests {
    use super::*;

    #[test]
    fn test_config_show_reflects_api_url() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_pulsevo_in(
            dir.path(),
            &["config", "show"],
            &[("PULSEVO_API_URL", "https://pulse.example.com/api")],
        );

        assert!(output.status.success(), "stderr: {}", stderr_to_string(&output));
        assert!(output_to_string(&output).contains("https://pulse.example.com/api"));
    }

    #[test]
    fn test_invalid_api_url_fails() {
        let output = run_pulsevo(&["--api-url", "localhost:5001", "config", "show"]);
        let stderr = stderr_to_string(&output);

        assert!(!output.status.success());
        assert!(stderr.contains("E1005"), "stderr: {}", stderr);
        assert!(stderr.contains("api.base_url"));
        assert!(stderr.contains("Suggestion"));
    }

    #[test]
    fn test_invalid_config_file_reports_code_and_suggestion() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("pulsevo.toml"),
            "[logging]\nlevel = \"loud\"\n",
        )
        .unwrap();

        let output = run_pulsevo_in(dir.path(), &["config", "show"], &[]);
        let stderr = stderr_to_string(&output);

        assert!(!output.status.success());
        assert!(stderr.contains("E1005"), "stderr: {}", stderr);
        assert!(stderr.contains("logging.level"));
        assert!(stderr.contains("pulsevo config init --force"));
    }

    #[test]
    fn test_config_init_writes_and_protects_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("pulsevo.toml");
        let target_arg = target.to_string_lossy().to_string();

        let first = run_pulsevo_in(dir.path(), &["config", "init", "--path", &target_arg], &[]);
        assert!(first.status.success(), "stderr: {}", stderr_to_string(&first));
        assert!(std::fs::read_to_string(&target)
            .unwrap()
            .contains("base_url"));

        let second = run_pulsevo_in(dir.path(), &["config", "init", "--path", &target_arg], &[]);
        assert!(!second.status.success());
        assert!(stderr_to_string(&second).contains("already exists"));

        let forced = run_pulsevo_in(
            dir.path(),
            &["config", "init", "--path", &target_arg, "--force"],
            &[],
        );
        assert!(forced.status.success());
    }
}
