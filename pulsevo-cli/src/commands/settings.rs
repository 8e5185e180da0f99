use clap::Subcommand;
use colored::Colorize;
use pulsevo_core::{DashboardApi, Settings};

use crate::config::CliContext;

#[derive(Subcommand)]
pub enum SettingsCommand {
    #[command(about = "Show integration tokens and notification preferences")]
    Show {
        #[arg(long, help = "Print tokens unmasked")]
        reveal: bool,

        #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
        format: String,
    },

    #[command(about = "Update settings; unspecified values are kept")]
    Set {
        #[arg(long, help = "GitHub personal access token")]
        github_token: Option<String>,

        #[arg(long, help = "Trello API key")]
        trello_key: Option<String>,

        #[arg(long, help = "Trello API token")]
        trello_token: Option<String>,

        #[arg(long, value_parser = parse_toggle, help = "Task update notifications (on, off)")]
        task_updates: Option<bool>,

        #[arg(long, value_parser = parse_toggle, help = "AI insight notifications (on, off)")]
        ai_insights: Option<bool>,

        #[arg(long, value_parser = parse_toggle, help = "Daily digest email (on, off)")]
        daily_digest: Option<bool>,
    },
}

pub async fn handle_settings_command(
    ctx: &CliContext,
    cmd: Option<SettingsCommand>,
) -> anyhow::Result<()> {
    match cmd.unwrap_or(SettingsCommand::Show {
        reveal: false,
        format: "text".to_string(),
    }) {
        SettingsCommand::Show { reveal, format } => cmd_show(ctx, reveal, &format).await,
        SettingsCommand::Set {
            github_token,
            trello_key,
            trello_token,
            task_updates,
            ai_insights,
            daily_digest,
        } => {
            let update = SettingsUpdate {
                github_token,
                trello_key,
                trello_token,
                task_updates,
                ai_insights,
                daily_digest,
            };
            cmd_set(ctx, update).await
        }
    }
}

fn parse_toggle(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(format!("expected 'on' or 'off', got '{}'", other)),
    }
}

#[derive(Debug, Default)]
struct SettingsUpdate {
    github_token: Option<String>,
    trello_key: Option<String>,
    trello_token: Option<String>,
    task_updates: Option<bool>,
    ai_insights: Option<bool>,
    daily_digest: Option<bool>,
}

impl SettingsUpdate {
    fn is_empty(&self) -> bool {
        self.github_token.is_none()
            && self.trello_key.is_none()
            && self.trello_token.is_none()
            && self.task_updates.is_none()
            && self.ai_insights.is_none()
            && self.daily_digest.is_none()
    }

    fn apply(self, mut settings: Settings) -> Settings {
        if let Some(token) = self.github_token {
            settings.github_token = token;
        }
        if let Some(key) = self.trello_key {
            settings.trello_key = key;
        }
        if let Some(token) = self.trello_token {
            settings.trello_token = token;
        }
        if let Some(on) = self.task_updates {
            settings.notifications.task_updates = on;
        }
        if let Some(on) = self.ai_insights {
            settings.notifications.ai_insights = on;
        }
        if let Some(on) = self.daily_digest {
            settings.notifications.daily_digest = on;
        }
        settings
    }
}

async fn cmd_show(ctx: &CliContext, reveal: bool, format: &str) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let settings = client.settings().await?;
    let settings = if reveal { settings } else { settings.masked() };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    print_settings(&settings);
    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("{}", "Settings".cyan().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("  {}", "Integrations".yellow().bold());
    println!("    GitHub Token:   {}", display_secret(&settings.github_token));
    println!("    Trello Key:     {}", display_secret(&settings.trello_key));
    println!("    Trello Token:   {}", display_secret(&settings.trello_token));
    println!();

    let n = &settings.notifications;
    println!("  {}", "Notifications".yellow().bold());
    println!("    Task Updates:   {}", toggle_label(n.task_updates));
    println!("    AI Insights:    {}", toggle_label(n.ai_insights));
    println!("    Daily Digest:   {}", toggle_label(n.daily_digest));
}

fn display_secret(value: &str) -> String {
    if value.is_empty() {
        "not set".dimmed().to_string()
    } else {
        value.to_string()
    }
}

fn toggle_label(on: bool) -> String {
    if on {
        "on".green().to_string()
    } else {
        "off".dimmed().to_string()
    }
}

async fn cmd_set(ctx: &CliContext, update: SettingsUpdate) -> anyhow::Result<()> {
    if update.is_empty() {
        anyhow::bail!("Nothing to update. Pass at least one option, see 'pulsevo settings set --help'");
    }

    let client = ctx.client()?;
    let current = client.settings().await?;
    let updated = update.apply(current);
    let resp = client.save_settings(&updated).await?;

    println!("{} {}", "✓".green().bold(), resp.message.green());
    println!();
    print_settings(&updated.masked());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toggle() {
        assert_eq!(parse_toggle("on"), Ok(true));
        assert_eq!(parse_toggle("OFF"), Ok(false));
        assert!(parse_toggle("maybe").is_err());
    }

    #[test]
    fn test_update_keeps_unspecified_values() {
        let current = Settings {
            github_token: "ghp_existing".to_string(),
            trello_key: "key".to_string(),
            ..Default::default()
        };

        let update = SettingsUpdate {
            trello_key: Some("new-key".to_string()),
            daily_digest: Some(true),
            ..Default::default()
        };
        assert!(!update.is_empty());

        let updated = update.apply(current);
        assert_eq!(updated.github_token, "ghp_existing");
        assert_eq!(updated.trello_key, "new-key");
        assert!(updated.notifications.daily_digest);
        assert!(updated.notifications.task_updates);
    }

    #[test]
    fn test_empty_update() {
        assert!(SettingsUpdate::default().is_empty());
    }
}
