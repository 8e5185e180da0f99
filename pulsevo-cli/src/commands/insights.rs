use std::collections::BTreeSet;

use anyhow::bail;
use colored::Colorize;
use comfy_table::{Cell, Color};
use pulsevo_core::{load_insights, InsightsReport, TimeFilter};

use super::overview::print_failures;
use super::{format_change, new_table, percent_bar};
use crate::config::CliContext;

pub async fn cmd_insights(ctx: &CliContext, filter: &str, format: &str) -> anyhow::Result<()> {
    let filter: TimeFilter = filter.parse()?;
    let client = ctx.client()?;
    let report = load_insights(&client, filter).await;

    if report.is_unavailable() {
        bail!(
            "AI insights are unavailable: {}",
            report
                .failures
                .first()
                .map(|f| f.error.as_str())
                .unwrap_or("no sections loaded")
        );
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(ctx, &report);
    Ok(())
}

fn print_report(ctx: &CliContext, report: &InsightsReport) {
    println!("{}", "AI Insights".cyan().bold());
    println!("{}", format!("Period: {}", report.filter.label()).dimmed());
    println!();

    let summary = &report.summary;
    if !summary.summary.is_empty() {
        println!("  {}", summary.summary);
        println!();
    }
    println!("  {}", "Summary".yellow().bold());
    println!("    Completed (24h):     {}", summary.completed_24h);
    println!("    Avg Closure Time:    {:.1}h", summary.avg_closure_time);
    println!(
        "    Velocity Change:     {}",
        format_change(summary.velocity_change)
    );
    println!("    Blocked Tasks:       {}", summary.blocked_tasks);

    let closure = &report.closure_performance;
    println!();
    println!("  {}", "Closure Performance".yellow().bold());
    println!(
        "    Current Avg:         {:.1}h (previous {:.1}h, {:+.1}h)",
        closure.current_avg,
        closure.previous_avg,
        closure.delta_hours()
    );
    println!(
        "    Blocked:             {} ({:.1}%)",
        closure.blocked_tasks, closure.blocked_percentage
    );

    let due = &report.due_compliance;
    println!();
    println!("  {}", "Due Date Compliance".yellow().bold());
    println!(
        "    On Time / Overdue:   {} / {}",
        due.on_time.to_string().green(),
        due.overdue.to_string().red()
    );
    println!(
        "    Compliance:          {} {:.1}%",
        percent_bar(due.compliance_rate(), 20),
        due.compliance_rate()
    );
    println!(
        "    Active Tasks:        {} (avg {:.1}h active)",
        due.active_tasks, due.avg_active_time
    );

    let predictions = &report.predictions;
    println!();
    println!("  {}", "Predictions".yellow().bold());
    println!(
        "    Sprint Completion:   {:.0}%",
        predictions.sprint_completion
    );
    if !predictions.next_week_workload.is_empty() {
        println!(
            "    Next Week Workload:  {} ({} tasks expected)",
            predictions.next_week_workload, predictions.expected_tasks
        );
    }
    if !predictions.risk_level.is_empty() {
        let risk = match predictions.risk_level.to_lowercase().as_str() {
            "high" => predictions.risk_level.red(),
            "medium" => predictions.risk_level.yellow(),
            _ => predictions.risk_level.green(),
        };
        println!("    Risk:                {} {}", risk, predictions.risk_description.dimmed());
    }

    if !report.team_benchmarking.is_empty() {
        println!();
        println!("  {}", "Team Benchmarking".yellow().bold());
        let mut table = new_table(
            ctx.compact(),
            &["Rank", "Team", "Tasks", "Velocity", "Efficiency", "Badge"],
        );
        for team in &report.team_benchmarking {
            table.add_row(vec![
                Cell::new(format!("#{}", team.rank)),
                Cell::new(&team.name),
                Cell::new(team.total_tasks),
                Cell::new(format!("{:.1}", team.velocity)),
                Cell::new(format!("{:.0}%", team.efficiency)).fg(Color::Yellow),
                Cell::new(team.badge.as_deref().unwrap_or("")),
            ]);
        }
        println!("{table}");
    }

    if !report.productivity_trends.is_empty() {
        println!();
        println!("  {}", "Productivity Trends".yellow().bold());

        let teams: BTreeSet<&str> = report
            .productivity_trends
            .iter()
            .flat_map(|t| t.teams.keys().map(String::as_str))
            .collect();
        let mut headers = vec!["Week"];
        headers.extend(teams.iter().copied());

        let mut table = new_table(ctx.compact(), &headers);
        for week in &report.productivity_trends {
            let mut row = vec![Cell::new(&week.week)];
            for team in &teams {
                let value = week.teams.get(*team).copied().unwrap_or_default();
                row.push(Cell::new(format!("{:.1}", value)));
            }
            table.add_row(row);
        }
        println!("{table}");
    }

    let sentiment = &report.sentiment;
    println!();
    println!("  {}", "Team Sentiment".yellow().bold());
    println!(
        "    Positive {:.0}%  Neutral {:.0}%  Negative {:.0}%  ({})",
        sentiment.positive,
        sentiment.neutral,
        sentiment.negative,
        sentiment.dominant()
    );
    if !sentiment.insight.is_empty() {
        println!("    {}", sentiment.insight.dimmed());
    }

    print_failures(report.failures.iter().map(|f| f.section).collect());
}
