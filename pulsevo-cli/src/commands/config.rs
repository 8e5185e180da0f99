use std::path::PathBuf;

use anyhow::anyhow;
use clap::Subcommand;
use colored::Colorize;
use pulsevo_core::{default_config_file, PulsevoConfig, PulsevoError};

use crate::config::CliContext;

#[derive(Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Print the effective configuration")]
    Show {
        #[arg(short, long, default_value = "toml", help = "Output format (toml, json)")]
        format: String,
    },

    #[command(about = "Write a starter configuration file")]
    Init {
        #[arg(short, long, help = "Overwrite an existing file")]
        force: bool,

        #[arg(short, long, help = "Target path (default: <config dir>/pulsevo/config.toml)")]
        path: Option<PathBuf>,
    },
}

pub fn handle_config_command(ctx: &CliContext, cmd: Option<ConfigCommand>) -> anyhow::Result<()> {
    match cmd.unwrap_or(ConfigCommand::Show {
        format: "toml".to_string(),
    }) {
        ConfigCommand::Show { format } => cmd_show(ctx, &format),
        ConfigCommand::Init { force, path } => cmd_init(force, path),
    }
}

fn cmd_show(ctx: &CliContext, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&ctx.config)?);
    } else {
        print!("{}", ctx.config.to_toml()?);
    }
    Ok(())
}

fn cmd_init(force: bool, path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path
        .or_else(default_config_file)
        .ok_or_else(|| anyhow!("Could not determine config directory, pass --path"))?;

    PulsevoConfig::default()
        .write_to(&path, force)
        .map_err(PulsevoError::from)?;

    println!(
        "{} {}",
        "✓".green().bold(),
        format!("Wrote {}", path.display()).green()
    );
    println!(
        "  {}",
        "Edit api.base_url to point at your PulseVo backend.".dimmed()
    );
    Ok(())
}
