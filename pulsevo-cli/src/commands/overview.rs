use anyhow::bail;
use colored::Colorize;
use comfy_table::{Cell, Color};
use pulsevo_core::{load_overview, OverviewSnapshot, TimeFilter};

use super::{change_cell, new_table, percent_bar};
use crate::config::CliContext;

pub async fn cmd_overview(ctx: &CliContext, filter: &str, format: &str) -> anyhow::Result<()> {
    let filter: TimeFilter = filter.parse()?;
    let client = ctx.client()?;
    let snapshot = load_overview(&client, filter).await;

    if snapshot.is_unavailable() {
        bail!(
            "Dashboard data is unavailable: {}",
            snapshot
                .failures
                .first()
                .map(|f| f.error.as_str())
                .unwrap_or("no sections loaded")
        );
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_overview(ctx, &snapshot);
    Ok(())
}

fn print_overview(ctx: &CliContext, snapshot: &OverviewSnapshot) {
    println!("{}", "Team Overview".cyan().bold());
    println!(
        "{}",
        format!("Period: {}", snapshot.filter.label()).dimmed()
    );
    println!();

    let m = &snapshot.metrics;
    let mut table = new_table(ctx.compact(), &["Metric", "Value", "Change"]);
    table.add_row(vec![
        Cell::new("Open Tasks"),
        Cell::new(m.open_tasks),
        change_cell(m.open_change),
    ]);
    table.add_row(vec![
        Cell::new("In Progress"),
        Cell::new(m.in_progress),
        change_cell(m.progress_change),
    ]);
    table.add_row(vec![
        Cell::new("Completed Today"),
        Cell::new(m.completed_today),
        change_cell(m.today_change),
    ]);
    table.add_row(vec![
        Cell::new("Completed This Hour"),
        Cell::new(m.completed_this_hour),
        change_cell(m.hour_change),
    ]);
    table.add_row(vec![
        Cell::new("Completion Rate"),
        Cell::new(format!("{:.1}%", m.completion_rate)).fg(Color::Yellow),
        change_cell(m.rate_change),
    ]);
    table.add_row(vec![
        Cell::new("Blocked"),
        Cell::new(m.blocked_tasks).fg(Color::Red),
        Cell::new(""),
    ]);
    println!("{table}");

    if !snapshot.distribution.is_empty() {
        println!();
        println!("  {}", "Status Distribution".yellow().bold());
        let total: u64 = snapshot.distribution.iter().map(|s| s.value).sum();
        for slice in &snapshot.distribution {
            let pct = if total == 0 {
                0.0
            } else {
                slice.value as f64 * 100.0 / total as f64
            };
            println!(
                "    {:<14} {} {:>4} ({:.0}%)",
                slice.name,
                percent_bar(pct, 20),
                slice.value,
                pct
            );
        }
    }

    if !snapshot.team_performance.is_empty() {
        println!();
        println!("  {}", "Team Performance".yellow().bold());
        let mut team = new_table(
            ctx.compact(),
            &["Member", "Completed", "In Progress", "Open", "Total"],
        );
        for member in &snapshot.team_performance {
            team.add_row(vec![
                Cell::new(&member.name),
                Cell::new(member.completed).fg(Color::Green),
                Cell::new(member.in_progress).fg(Color::Cyan),
                Cell::new(member.open),
                Cell::new(member.total()),
            ]);
        }
        println!("{team}");
    }

    if !snapshot.trends.is_empty() {
        println!();
        println!("  {}", "Trends".yellow().bold());
        let mut trends = new_table(ctx.compact(), &["Date", "Created", "Completed", "In Progress"]);
        for point in &snapshot.trends {
            trends.add_row(vec![
                Cell::new(&point.date),
                Cell::new(point.created),
                Cell::new(point.completed),
                Cell::new(point.in_progress),
            ]);
        }
        println!("{trends}");
    }

    print_failures(
        snapshot
            .failures
            .iter()
            .map(|f| f.section)
            .collect::<Vec<_>>(),
    );
}

pub(crate) fn print_failures(sections: Vec<&str>) {
    if sections.is_empty() {
        return;
    }
    println!();
    println!(
        "  {} {}",
        "!".yellow(),
        format!("Could not load: {}. Showing defaults.", sections.join(", ")).yellow()
    );
}
