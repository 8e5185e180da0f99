use clap::Subcommand;
use colored::Colorize;
use comfy_table::{Cell, Color};
use pulsevo_core::DashboardApi;

use super::{new_table, or_dash};
use crate::config::CliContext;

#[derive(Subcommand)]
pub enum UsersCommand {
    #[command(about = "List team members")]
    List {
        #[arg(short = 'q', long, help = "Filter by name")]
        search: Option<String>,

        #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
        format: String,
    },

    #[command(about = "Show one team member")]
    Show {
        #[arg(help = "User ID")]
        id: String,

        #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
        format: String,
    },
}

pub async fn handle_users_command(
    ctx: &CliContext,
    cmd: Option<UsersCommand>,
) -> anyhow::Result<()> {
    match cmd.unwrap_or(UsersCommand::List {
        search: None,
        format: "text".to_string(),
    }) {
        UsersCommand::List { search, format } => cmd_list(ctx, search.as_deref(), &format).await,
        UsersCommand::Show { id, format } => cmd_show(ctx, &id, &format).await,
    }
}

async fn cmd_list(ctx: &CliContext, search: Option<&str>, format: &str) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let users = client.users(search).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    println!("{}", "Team Members".cyan().bold());
    println!();

    if users.is_empty() {
        println!("{}", "No team members found.".yellow());
        return Ok(());
    }

    let mut table = new_table(
        ctx.compact(),
        &["", "ID", "Name", "Email", "Role", "Team"],
    );
    for user in &users {
        table.add_row(vec![
            Cell::new(user.initials()).fg(Color::Cyan),
            Cell::new(&user.user_id),
            Cell::new(&user.name),
            Cell::new(or_dash(user.email.as_deref())),
            Cell::new(or_dash(user.role.as_deref())),
            Cell::new(or_dash(user.team.as_deref())),
        ]);
    }
    println!("{table}");
    println!("{}", format!("{} members", users.len()).dimmed());

    Ok(())
}

async fn cmd_show(ctx: &CliContext, id: &str, format: &str) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let user = client.user(id).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!("{} {}", user.initials().cyan().bold(), user.name.bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("  {:<8} {}", "ID:", user.user_id);
    println!("  {:<8} {}", "Email:", or_dash(user.email.as_deref()));
    println!("  {:<8} {}", "Role:", or_dash(user.role.as_deref()));
    println!("  {:<8} {}", "Team:", or_dash(user.team.as_deref()));
    if let Some(active) = user.is_active {
        let state = if active {
            "active".green()
        } else {
            "inactive".dimmed()
        };
        println!("  {:<8} {}", "Status:", state);
    }

    Ok(())
}

pub async fn cmd_projects(ctx: &CliContext, stats: bool, format: &str) -> anyhow::Result<()> {
    let client = ctx.client()?;

    if stats {
        let projects = client.project_stats().await?;
        if format == "json" {
            println!("{}", serde_json::to_string_pretty(&projects)?);
            return Ok(());
        }

        println!("{}", "Projects".cyan().bold());
        println!();
        if projects.is_empty() {
            println!("{}", "No projects found.".yellow());
            return Ok(());
        }

        let mut table = new_table(ctx.compact(), &["Project", "Total", "Open"]);
        for project in &projects {
            table.add_row(vec![
                Cell::new(&project.project),
                Cell::new(project.total),
                Cell::new(project.open).fg(Color::Yellow),
            ]);
        }
        println!("{table}");
        return Ok(());
    }

    let projects = client.projects().await?;
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    println!("{}", "Projects".cyan().bold());
    println!();
    if projects.is_empty() {
        println!("{}", "No projects found.".yellow());
    }
    for project in &projects {
        println!("  {} {}", "•".blue(), project);
    }

    Ok(())
}
