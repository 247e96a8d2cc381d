//! Chat widget state: panel visibility, input field, transcript and the
//! source-citation line. Front ends render this; they hold no state of their own.

use serde_json::Value;
use url::Url;

use crate::client::{ClientError, Transport};
use crate::messages::{display_text, AnswerResponse, AskRequest, Message};

/// Source line text while a request is outstanding.
pub const PENDING_PLACEHOLDER: &str = "Thinking…";
/// Bot message when the body carries no usable answer.
pub const FALLBACK_ANSWER: &str = "Sorry, I couldn’t get that.";
/// Bot message when the request or body parse fails.
pub const SERVER_ERROR: &str = "Server error. Please try again.";

pub const SOURCES_PREFIX: &str = "Sources: ";
pub const SOURCES_SEPARATOR: &str = " · ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// A submitted question waiting for its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAsk {
    pub id: u64,
    pub request: AskRequest,
}

#[derive(Debug, Default)]
pub struct ChatWidget {
    panel: PanelState,
    input: String,
    transcript: Vec<Message>,
    sources_line: String,
    next_id: u64,
}

impl ChatWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> PanelState {
        self.panel
    }

    pub fn is_open(&self) -> bool {
        self.panel == PanelState::Open
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn sources_line(&self) -> &str {
        &self.sources_line
    }

    /// Launcher activated. Front ends move focus to the input field on every
    /// activation, including when the panel is already open.
    pub fn open(&mut self) {
        self.panel = PanelState::Open;
    }

    /// Close control activated.
    pub fn close(&mut self) {
        self.panel = PanelState::Closed;
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Synchronous half of a submission: append the user message, clear the
    /// field, show the pending placeholder. `None` if the trimmed input is empty.
    pub fn begin_submit(&mut self, page_context: &str) -> Option<PendingAsk> {
        let question = self.input.trim().to_string();
        if question.is_empty() {
            return None;
        }
        self.transcript.push(Message::user(question.clone()));
        self.input.clear();
        self.sources_line = PENDING_PLACEHOLDER.to_string();

        self.next_id += 1;
        let id = self.next_id;
        tracing::debug!(id, "question submitted");
        Some(PendingAsk {
            id,
            request: AskRequest::new(question, page_context),
        })
    }

    /// Apply the outcome of request `id`. Resolutions are applied in the order
    /// they arrive; a late one overwrites the source line of an earlier one.
    pub fn finish(&mut self, id: u64, outcome: Result<AnswerResponse, ClientError>) {
        match outcome {
            Ok(answer) => {
                let text = answer
                    .answer_text()
                    .unwrap_or_else(|| FALLBACK_ANSWER.to_string());
                self.transcript.push(Message::bot(text));
                self.sources_line = answer
                    .sources
                    .as_ref()
                    .and_then(format_sources)
                    .unwrap_or_default();
                if id != self.next_id {
                    tracing::debug!(id, latest = self.next_id, "stale answer overwrote sources");
                }
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "question failed");
                self.transcript.push(Message::bot(SERVER_ERROR));
                self.sources_line.clear();
            }
        }
    }

    /// Full submission against `transport`. Returns `false` when the input was
    /// empty and nothing was sent.
    pub async fn submit<T>(&mut self, transport: &T, page_context: &str) -> bool
    where
        T: Transport + ?Sized,
    {
        let Some(pending) = self.begin_submit(page_context) else {
            return false;
        };
        let outcome = transport.ask(&pending.request).await;
        self.finish(pending.id, outcome);
        true
    }
}

/// Render the source line for a `sources` value. `None` means the line should
/// be blank: the value is falsy, an empty list, or not a list at all.
pub fn format_sources(sources: &Value) -> Option<String> {
    let entries = match sources {
        Value::Array(entries) if !entries.is_empty() => entries,
        _ => return None,
    };
    let parts: Vec<String> = entries.iter().map(source_label).collect();
    Some(format!("{SOURCES_PREFIX}{}", parts.join(SOURCES_SEPARATOR)))
}

/// An entry whose text is an absolute URL shortens to its path; anything else
/// is shown as its text.
fn source_label(entry: &Value) -> String {
    let text = display_text(entry);
    match Url::parse(&text) {
        Ok(url) => url.path().to_string(),
        Err(_) => text,
    }
}
