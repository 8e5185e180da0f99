#![allow(clippy::useless_format, clippy::format_in_format_args)]

use clap::{Parser, Subcommand};
use colored::Colorize;
use pulsevo_core::{CliErrorDisplay, DashboardApi, LoggingConfig, PulsevoError};
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

use commands::{
    cmd_chat, cmd_insights, cmd_overview, cmd_projects, cmd_query, handle_config_command,
    handle_settings_command, handle_tasks_command, handle_users_command, ConfigCommand,
    SettingsCommand, TasksCommand, UsersCommand,
};
use config::CliContext;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Parser)]
#[command(name = "pulsevo")]
#[command(author = "PulseVo Team")]
#[command(version = VERSION)]
#[command(about = "PulseVo - Team productivity analytics from the command line")]
#[command(long_about = r#"
PulseVo reads task and team data from a PulseVo backend and shows the
dashboard overview, the per-member task roster, AI insights, and answers
natural-language questions about your team's work.

Point it at a backend with --api-url or PULSEVO_API_URL, then try
'pulsevo overview' or 'pulsevo tasks roster'.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(
        long,
        global = true,
        env = "PULSEVO_API_URL",
        help = "Backend base URL (default http://localhost:5001/api)"
    )]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Show dashboard metrics, status distribution and team performance")]
    Overview {
        #[arg(
            short = 'r',
            long,
            default_value = "all",
            help = "Time filter (today, week, month, all)"
        )]
        filter: String,

        #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
        format: String,
    },

    #[command(about = "Show AI insights: summary, closure times, predictions, sentiment")]
    Insights {
        #[arg(
            short = 'r',
            long,
            default_value = "all",
            help = "Time filter (today, week, month, all)"
        )]
        filter: String,

        #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
        format: String,
    },

    #[command(about = "Task roster, task lists and CSV import")]
    Tasks {
        #[command(subcommand)]
        action: Option<TasksCommand>,
    },

    #[command(about = "List and inspect team members")]
    Users {
        #[command(subcommand)]
        action: Option<UsersCommand>,
    },

    #[command(about = "List projects")]
    Projects {
        #[arg(short, long, help = "Show task totals per project")]
        stats: bool,

        #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
        format: String,
    },

    #[command(about = "Ask a single natural-language question")]
    Query {
        #[arg(required = true, num_args = 1.., help = "Question text")]
        question: Vec<String>,

        #[arg(short, long, help = "Print every result row instead of the first few")]
        all: bool,

        #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
        format: String,
    },

    #[command(about = "Interactive chat with the AI assistant")]
    Chat,

    #[command(about = "View or change integration settings")]
    Settings {
        #[command(subcommand)]
        action: Option<SettingsCommand>,
    },

    #[command(about = "Show or create the local configuration file")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommand>,
    },

    #[command(about = "Check that the backend is reachable")]
    Health {
        #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
        format: String,
    },

    #[command(about = "Show version information")]
    Version {
        #[arg(short, long)]
        detailed: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let ctx = match CliContext::load(cli.api_url.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            init_logging(cli.verbose, &LoggingConfig::default());
            report_error(&e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.verbose, &ctx.config.logging);
    if !ctx.config.display.color {
        colored::control::set_override(false);
    }

    match run(cli, &ctx).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn report_error(e: &anyhow::Error) {
    match e.downcast_ref::<PulsevoError>() {
        Some(err) => eprint!("{}: {}", "Error".red().bold(), CliErrorDisplay::new(err)),
        None => eprintln!("{}: {:#}", "Error".red().bold(), e),
    }
}

fn init_logging(verbose: bool, logging: &LoggingConfig) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json_format {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

async fn run(cli: Cli, ctx: &CliContext) -> anyhow::Result<()> {
    match cli.command {
        Commands::Overview { filter, format } => cmd_overview(ctx, &filter, &format).await,
        Commands::Insights { filter, format } => cmd_insights(ctx, &filter, &format).await,
        Commands::Tasks { action } => handle_tasks_command(ctx, action).await,
        Commands::Users { action } => handle_users_command(ctx, action).await,
        Commands::Projects { stats, format } => cmd_projects(ctx, stats, &format).await,
        Commands::Query {
            question,
            all,
            format,
        } => cmd_query(ctx, &question.join(" "), all, &format).await,
        Commands::Chat => cmd_chat(ctx).await,
        Commands::Settings { action } => handle_settings_command(ctx, action).await,
        Commands::Config { action } => handle_config_command(ctx, action),
        Commands::Health { format } => cmd_health(ctx, &format).await,
        Commands::Version { detailed } => cmd_version(detailed),
    }
}

async fn cmd_health(ctx: &CliContext, format: &str) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let health = client.health().await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }

    println!("{}", "PulseVo Backend Health".cyan().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();
    println!("  {:<12} {}", "Endpoint:".bold(), ctx.config.api_base_url());

    let status = if health.is_healthy() {
        health.status.green()
    } else {
        health.status.yellow()
    };
    println!("  {:<12} {}", "Status:".bold(), status);

    if let Some(database) = &health.database {
        println!("  {:<12} {}", "Database:".bold(), database);
    }
    if let Some(timestamp) = &health.timestamp {
        println!("  {:<12} {}", "Checked:".bold(), timestamp.dimmed());
    }

    Ok(())
}

fn cmd_version(detailed: bool) -> anyhow::Result<()> {
    if detailed {
        println!("{}", "PulseVo Version Information".cyan().bold());
        println!("{}", "═".repeat(40).dimmed());
        println!("  {:<15} {}", "Version:".bold(), VERSION);
        println!("  {:<15} {}", "Name:".bold(), NAME);
        println!("  {:<15} Apache-2.0", "License:".bold());
        println!();
        println!("  {}", "Backend Endpoints:".bold());
        println!("    ◆ /overview, /distribution, /trends, /team-performance");
        println!("    ◆ /tasks, /users, /projects");
        println!("    ◆ /ai/* insights");
        println!("    ◆ /query (or /chat on older backends)");
        println!("    ◆ /settings");
        println!();
        println!("  {}", "Build Information:".bold());
        println!("    Rust Edition: 2021");
        #[cfg(debug_assertions)]
        println!("    Build:        Debug");
        #[cfg(not(debug_assertions))]
        println!("    Build:        Release");
    } else {
        println!("pulsevo {}", VERSION);
    }

    Ok(())
}
