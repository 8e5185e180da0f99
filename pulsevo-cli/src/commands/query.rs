use std::io::Write;

use colored::Colorize;
use comfy_table::Cell;
use pulsevo_core::{
    ChatMessage, ChatRole, ChatSession, DashboardApi, ResultAttachment, SubmitOutcome,
    TabularResult, INLINE_ROW_LIMIT,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::new_table;
use crate::config::CliContext;

/// One-shot question. Unlike `chat`, backend errors fail the command.
pub async fn cmd_query(
    ctx: &CliContext,
    question: &str,
    all: bool,
    format: &str,
) -> anyhow::Result<()> {
    if question.trim().is_empty() {
        anyhow::bail!("Question is empty");
    }

    let client = ctx.client()?;
    let response = client.send_query(question).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{}", response.response);

    if let Some(table) = TabularResult::from_response(&response) {
        println!();
        let limit = if all { None } else { Some(INLINE_ROW_LIMIT) };
        print_table(ctx, &table, limit);
        if !all && table.rows.len() > INLINE_ROW_LIMIT {
            println!(
                "{}",
                format!(
                    "Showing {} of {} rows. Re-run with --all to see everything.",
                    INLINE_ROW_LIMIT, table.row_count
                )
                .dimmed()
            );
        }
    }

    Ok(())
}

pub async fn cmd_chat(ctx: &CliContext) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let mut session = ChatSession::with_greeting();

    println!("{}", "PulseVo AI Assistant".cyan().bold());
    println!(
        "{}",
        "Type a question, :all to expand the last large result, :quit to exit.".dimmed()
    );
    println!();
    if let Some(greeting) = session.messages().first() {
        print_message(ctx, greeting);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", "you ›".green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match line.trim() {
            ":quit" | ":q" | ":exit" => break,
            ":all" => {
                match session.latest_expandable() {
                    Some(table) => print_table(ctx, table, None),
                    None => println!("{}", "No expanded results yet.".dimmed()),
                }
                continue;
            }
            _ => {}
        }

        match session.submit(&client, &line).await {
            SubmitOutcome::Rejected(e) => {
                debug!("Question rejected: {}", e);
                continue;
            }
            SubmitOutcome::Failed(e) => debug!(error_code = e.error_code(), "Query failed: {}", e),
            SubmitOutcome::Answered => {}
        }

        if let Some(reply) = session.messages().last() {
            print_message(ctx, reply);
        }
    }

    Ok(())
}

fn print_message(ctx: &CliContext, message: &ChatMessage) {
    let speaker = match message.role {
        ChatRole::Bot => "assistant".cyan().bold(),
        ChatRole::User => "you".green().bold(),
    };
    println!("{} {}", speaker, message.timestamp.dimmed());
    println!("{}", message.text);

    match &message.attachment {
        Some(ResultAttachment::Inline(table)) => {
            println!();
            print_table(ctx, table, None);
        }
        Some(ResultAttachment::Expandable(table)) => {
            println!(
                "{}",
                format!("{} results. Type :all to view them.", table.row_count).yellow()
            );
        }
        None => {}
    }
    println!();
}

fn print_table(ctx: &CliContext, result: &TabularResult, limit: Option<usize>) {
    let headers: Vec<&str> = result.columns.iter().map(String::as_str).collect();
    let mut table = new_table(ctx.compact(), &headers);

    let shown = limit.unwrap_or(result.rows.len()).min(result.rows.len());
    for row in 0..shown {
        table.add_row(
            result
                .columns
                .iter()
                .map(|column| Cell::new(result.cell(row, column)))
                .collect::<Vec<_>>(),
        );
    }
    println!("{table}");
}
