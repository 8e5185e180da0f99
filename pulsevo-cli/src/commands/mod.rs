pub mod config;
pub mod insights;
pub mod overview;
pub mod query;
pub mod settings;
pub mod tasks;
pub mod users;

pub use config::{handle_config_command, ConfigCommand};
pub use insights::cmd_insights;
pub use overview::cmd_overview;
pub use query::{cmd_chat, cmd_query};
pub use settings::{handle_settings_command, SettingsCommand};
pub use tasks::{handle_tasks_command, TasksCommand};
pub use users::{cmd_projects, handle_users_command, UsersCommand};

use colored::{ColoredString, Colorize};
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS,
    presets::{ASCII_BORDERS_ONLY_CONDENSED, UTF8_FULL},
    Cell, Color, Table,
};

pub(crate) fn new_table(compact: bool, headers: &[&str]) -> Table {
    let mut table = Table::new();
    if compact {
        table.load_preset(ASCII_BORDERS_ONLY_CONDENSED);
    } else {
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);
    }
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::White))
            .collect::<Vec<_>>(),
    );
    table
}

pub(crate) fn status_color(status: &str) -> Color {
    match status.to_lowercase().as_str() {
        "completed" => Color::Green,
        "in progress" => Color::Cyan,
        "blocked" => Color::Red,
        "open" => Color::Yellow,
        _ => Color::White,
    }
}

/// Signed change such as `+4.5%`, green when up and red when down.
pub(crate) fn format_change(change: f64) -> ColoredString {
    let text = format!("{:+.1}%", change);
    if change > 0.0 {
        text.green()
    } else if change < 0.0 {
        text.red()
    } else {
        text.dimmed()
    }
}

/// Table cell variant of [`format_change`].
pub(crate) fn change_cell(change: f64) -> Cell {
    let cell = Cell::new(format!("{:+.1}%", change));
    if change > 0.0 {
        cell.fg(Color::Green)
    } else if change < 0.0 {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

/// Fixed-width bar for a percentage in `[0, 100]`.
pub(crate) fn percent_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub(crate) fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "-",
    }
}
