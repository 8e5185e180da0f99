use std::path::PathBuf;

use clap::Subcommand;
use colored::Colorize;
use comfy_table::{Cell, Color};
use pulsevo_core::{
    upload_tasks, DashboardApi, RosterController, RosterPage, RosterViewState, StatusFilter,
    TaskQuery, TaskStatus,
};

use super::{new_table, or_dash, percent_bar, status_color};
use crate::config::CliContext;

#[derive(Subcommand)]
pub enum TasksCommand {
    #[command(about = "Show each member's assigned, completed and in-progress tasks")]
    Roster {
        #[arg(
            short,
            long,
            default_value = "all",
            help = "Status filter (all, open, in-progress, completed, blocked)"
        )]
        status: String,

        #[arg(short = 'q', long, default_value = "", help = "Filter members by name")]
        search: String,

        #[arg(short, long, default_value = "1", help = "Page number (10 members per page)")]
        page: usize,

        #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
        format: String,
    },

    #[command(about = "List tasks")]
    List {
        #[arg(
            short,
            long,
            default_value = "all",
            help = "Status filter (all, open, in-progress, completed, blocked)"
        )]
        status: String,

        #[arg(short, long, help = "Page number")]
        page: Option<u32>,

        #[arg(long, help = "Tasks per page")]
        per_page: Option<u32>,

        #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
        format: String,
    },

    #[command(about = "Show one task")]
    Show {
        #[arg(help = "Task ID")]
        id: String,

        #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
        format: String,
    },

    #[command(about = "Show task counts per status")]
    Counts {
        #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
        format: String,
    },

    #[command(about = "Import tasks from a CSV export")]
    Upload {
        #[arg(help = "Path to a .csv file")]
        file: PathBuf,

        #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
        format: String,
    },
}

pub async fn handle_tasks_command(
    ctx: &CliContext,
    cmd: Option<TasksCommand>,
) -> anyhow::Result<()> {
    match cmd.unwrap_or(TasksCommand::Roster {
        status: "all".to_string(),
        search: String::new(),
        page: 1,
        format: "text".to_string(),
    }) {
        TasksCommand::Roster {
            status,
            search,
            page,
            format,
        } => cmd_roster(ctx, &status, search, page, &format).await,
        TasksCommand::List {
            status,
            page,
            per_page,
            format,
        } => cmd_list(ctx, &status, page, per_page, &format).await,
        TasksCommand::Show { id, format } => cmd_show(ctx, &id, &format).await,
        TasksCommand::Counts { format } => cmd_counts(ctx, &format).await,
        TasksCommand::Upload { file, format } => cmd_upload(ctx, file, &format).await,
    }
}

async fn cmd_roster(
    ctx: &CliContext,
    status: &str,
    search: String,
    page: usize,
    format: &str,
) -> anyhow::Result<()> {
    let status: StatusFilter = status.parse()?;
    let client = ctx.client()?;

    let mut controller = RosterController::with_state(RosterViewState {
        search,
        status,
        page,
    });
    let roster = controller.refresh(&client).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&roster)?);
        return Ok(());
    }

    print_roster(ctx, controller.state(), &roster);
    Ok(())
}

fn print_roster(ctx: &CliContext, state: &RosterViewState, roster: &RosterPage) {
    println!("{}", "Task Roster".cyan().bold());
    let mut subtitle = format!("Status: {}", state.status.label());
    if !state.search.trim().is_empty() {
        subtitle.push_str(&format!("  Search: \"{}\"", state.search.trim()));
    }
    println!("{}", subtitle.dimmed());
    println!();

    if roster.is_empty() {
        println!("{}", "No team members match these filters.".yellow());
        return;
    }

    let mut table = new_table(
        ctx.compact(),
        &["", "Member", "Assigned", "Completed", "In Progress", "Completion"],
    );
    for row in &roster.rows {
        let pct = row.completion_percentage;
        let color = match pct {
            80..=100 => Color::Green,
            50..=79 => Color::Yellow,
            _ => Color::Red,
        };
        table.add_row(vec![
            Cell::new(row.user.initials()).fg(Color::Cyan),
            Cell::new(&row.user.name),
            Cell::new(row.assigned),
            Cell::new(row.completed),
            Cell::new(row.in_progress),
            Cell::new(format!("{} {:>3}%", percent_bar(pct as f64, 10), pct)).fg(color),
        ]);
    }
    println!("{table}");

    println!(
        "{}",
        format!(
            "Page {} of {} ({} members)",
            roster.page, roster.total_pages, roster.filtered_count
        )
        .dimmed()
    );
}

async fn cmd_list(
    ctx: &CliContext,
    status: &str,
    page: Option<u32>,
    per_page: Option<u32>,
    format: &str,
) -> anyhow::Result<()> {
    let status: StatusFilter = status.parse()?;
    let client = ctx.client()?;
    let query = TaskQuery {
        status: status.query_value().map(str::to_string),
        page,
        per_page,
    };
    let resp = client.tasks(&query).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&resp)?);
        return Ok(());
    }

    println!("{}", format!("Tasks ({})", status.label()).cyan().bold());
    println!();

    if resp.tasks.is_empty() {
        println!("{}", "No tasks found.".yellow());
        return Ok(());
    }

    let mut table = new_table(
        ctx.compact(),
        &["ID", "Task", "Status", "Priority", "Project", "Assignee", "Due"],
    );
    for task in &resp.tasks {
        table.add_row(vec![
            Cell::new(&task.task_id),
            Cell::new(&task.task_name),
            Cell::new(&task.status).fg(status_color(&task.status)),
            Cell::new(or_dash(task.priority.as_deref())),
            Cell::new(or_dash(task.project.as_deref())),
            Cell::new(or_dash(task.assigned_to.as_deref())),
            Cell::new(or_dash(task.due_date.as_deref())),
        ]);
    }
    println!("{table}");

    if resp.pages > 1 {
        println!(
            "{}",
            format!(
                "Page {} of {} ({} tasks)",
                resp.page, resp.pages, resp.total
            )
            .dimmed()
        );
    } else {
        println!("{}", format!("{} tasks", resp.tasks.len()).dimmed());
    }

    Ok(())
}

async fn cmd_show(ctx: &CliContext, id: &str, format: &str) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let task = client.task(id).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&task)?);
        return Ok(());
    }

    println!(
        "{} {}",
        task.task_id.cyan().bold(),
        task.task_name.bold()
    );
    println!("{}", "─".repeat(40).dimmed());
    println!("  {:<12} {}", "Status:", task.status);
    println!("  {:<12} {}", "Priority:", or_dash(task.priority.as_deref()));
    println!("  {:<12} {}", "Project:", or_dash(task.project.as_deref()));
    println!("  {:<12} {}", "Assignee:", or_dash(task.assigned_to.as_deref()));
    println!("  {:<12} {}", "Created:", or_dash(task.created_date.as_deref()));
    println!("  {:<12} {}", "Due:", or_dash(task.due_date.as_deref()));
    println!("  {:<12} {}", "Completed:", or_dash(task.completed_date.as_deref()));
    if let Some(hours) = task.estimated_hours {
        println!("  {:<12} {:.1}h", "Estimate:", hours);
    }
    let tags = task.tag_list();
    if !tags.is_empty() {
        println!("  {:<12} {}", "Tags:", tags.join(", "));
    }
    if let Some(reason) = task.blocked_reason.as_deref().filter(|r| !r.is_empty()) {
        println!("  {:<12} {}", "Blocked:", reason.red());
    }
    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        println!();
        println!("  {}", description);
    }

    Ok(())
}

async fn cmd_counts(ctx: &CliContext, format: &str) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let counts = client.status_counts().await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    println!("{}", "Tasks by Status".cyan().bold());
    println!();

    let mut table = new_table(ctx.compact(), &["Status", "Tasks"]);
    table.add_row(vec![Cell::new("All Tasks"), Cell::new(counts.all)]);
    for (status, count) in [
        (TaskStatus::Open, counts.open),
        (TaskStatus::InProgress, counts.in_progress),
        (TaskStatus::Completed, counts.completed),
        (TaskStatus::Blocked, counts.blocked),
    ] {
        table.add_row(vec![
            Cell::new(status.as_str()).fg(status_color(status.as_str())),
            Cell::new(count),
        ]);
    }
    println!("{table}");

    Ok(())
}

async fn cmd_upload(ctx: &CliContext, file: PathBuf, format: &str) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let summary = upload_tasks(&client, &file).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "✓".green().bold(),
        format!(
            "Imported {} tasks ({} skipped) from {}",
            summary.tasks_added,
            summary.tasks_skipped,
            file.display()
        )
        .green()
    );
    if let Some(message) = summary.message.as_deref().filter(|m| !m.is_empty()) {
        println!("  {}", message.dimmed());
    }

    Ok(())
}
