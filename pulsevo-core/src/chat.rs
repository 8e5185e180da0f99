//! Natural-language query chat with single-flight submission.

use chrono::Local;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::api::DashboardApi;
use crate::error::{PulsevoError, PulsevoResult};
use crate::models::QueryResponse;

pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble processing that request. Please try again.";

pub const GREETING: &str = "Hello! I'm your AI assistant. Ask me anything about your team's productivity, tasks, or performance metrics.\n\nTry questions like:\n• How many bugs did we close this sprint?\n• What's our team velocity?\n• Show me blocked tasks";

/// Results with more rows than this are kept for the detail view instead of inlined.
pub const INLINE_ROW_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabularResult {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    pub row_count: u64,
}

impl TabularResult {
    /// `None` when the response carries no rows.
    pub fn from_response(response: &QueryResponse) -> Option<Self> {
        let rows = response.data.clone().unwrap_or_default();
        if rows.is_empty() {
            return None;
        }

        let columns = match &response.columns {
            Some(columns) if !columns.is_empty() => columns.clone(),
            _ => rows[0].keys().cloned().collect(),
        };
        let row_count = response.count.unwrap_or(rows.len() as u64);

        Some(Self {
            columns,
            rows,
            row_count,
        })
    }

    /// Cell text for `column` in `row`, empty when absent or null.
    pub fn cell(&self, row: usize, column: &str) -> String {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(display_value)
            .unwrap_or_default()
    }
}

pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum ResultAttachment {
    Inline(TabularResult),
    Expandable(TabularResult),
}

impl ResultAttachment {
    fn for_table(table: TabularResult) -> Self {
        if table.rows.len() > INLINE_ROW_LIMIT {
            ResultAttachment::Expandable(table)
        } else {
            ResultAttachment::Inline(table)
        }
    }

    pub fn table(&self) -> &TabularResult {
        match self {
            ResultAttachment::Inline(table) | ResultAttachment::Expandable(table) => table,
        }
    }

    pub fn is_expandable(&self) -> bool {
        matches!(self, ResultAttachment::Expandable(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<ResultAttachment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    #[default]
    Idle,
    Awaiting,
}

/// Token for the one question currently awaiting an answer.
#[derive(Debug)]
#[must_use = "a pending question must be passed back to ChatSession::finish"]
pub struct PendingQuestion {
    message_id: u64,
    question: String,
}

impl PendingQuestion {
    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn message_id(&self) -> u64 {
        self.message_id
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Nothing was sent and the transcript is unchanged.
    Rejected(PulsevoError),
    Answered,
    /// The fallback reply was appended; the underlying error is kept for logging.
    Failed(PulsevoError),
}

impl SubmitOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, SubmitOutcome::Rejected(_))
    }
}

#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    state: ChatState,
    next_id: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_greeting() -> Self {
        let mut session = Self::new();
        session.push(ChatRole::Bot, GREETING.to_string(), local_timestamp(), None);
        session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn is_awaiting(&self) -> bool {
        self.state == ChatState::Awaiting
    }

    /// Most recent result too large to inline.
    pub fn latest_expandable(&self) -> Option<&TabularResult> {
        self.messages
            .iter()
            .rev()
            .filter_map(|m| m.attachment.as_ref())
            .find(|a| a.is_expandable())
            .map(ResultAttachment::table)
    }

    /// Validate, append the user message, and move to `Awaiting`.
    pub fn begin(&mut self, question: &str) -> PulsevoResult<PendingQuestion> {
        if question.trim().is_empty() {
            return Err(PulsevoError::EmptyQuestion);
        }
        if self.is_awaiting() {
            return Err(PulsevoError::QueryInFlight);
        }

        let message_id = self.push(ChatRole::User, question.to_string(), local_timestamp(), None);
        self.state = ChatState::Awaiting;
        debug!(message_id, "Question submitted");

        Ok(PendingQuestion {
            message_id,
            question: question.to_string(),
        })
    }

    /// Append the bot reply for `pending` and return to `Idle`.
    pub fn finish(
        &mut self,
        pending: PendingQuestion,
        result: PulsevoResult<QueryResponse>,
    ) -> SubmitOutcome {
        self.state = ChatState::Idle;

        match result {
            Ok(response) => {
                let timestamp = response
                    .timestamp
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(local_timestamp);
                let attachment =
                    TabularResult::from_response(&response).map(ResultAttachment::for_table);

                self.push(ChatRole::Bot, response.response, timestamp, attachment);
                SubmitOutcome::Answered
            }
            Err(e) => {
                warn!(
                    message_id = pending.message_id,
                    error_code = e.error_code(),
                    "Query failed: {}",
                    e
                );
                self.push(
                    ChatRole::Bot,
                    FALLBACK_REPLY.to_string(),
                    local_timestamp(),
                    None,
                );
                SubmitOutcome::Failed(e)
            }
        }
    }

    pub async fn submit(&mut self, api: &dyn DashboardApi, question: &str) -> SubmitOutcome {
        let pending = match self.begin(question) {
            Ok(pending) => pending,
            Err(e) => return SubmitOutcome::Rejected(e),
        };

        let result = api.send_query(pending.question()).await;
        self.finish(pending, result)
    }

    fn push(
        &mut self,
        role: ChatRole,
        text: String,
        timestamp: String,
        attachment: Option<ResultAttachment>,
    ) -> u64 {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_id,
            role,
            text,
            timestamp,
            attachment,
        });
        self.next_id
    }
}

fn local_timestamp() -> String {
    Local::now().format("%H:%M").to_string()
}
