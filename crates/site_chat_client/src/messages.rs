//! Wire and transcript message types. Widget ↔ answer endpoint JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Widget → endpoint: one question asked from a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest {
    pub question: String,
    pub page_context: String,
}

impl AskRequest {
    pub fn new(question: impl Into<String>, page_context: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            page_context: page_context.into(),
        }
    }
}

/// Endpoint → widget: answer body. Both fields are optional and loosely typed;
/// interpretation happens in the widget, not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerResponse {
    pub answer: Option<Value>,
    pub sources: Option<Value>,
}

impl AnswerResponse {
    /// Build from a parsed body. `null` is rejected; any other non-object body
    /// carries neither an answer nor sources.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Err("response body is null".into()),
            Value::Object(map) => Ok(Self {
                answer: map.get("answer").cloned(),
                sources: map.get("sources").cloned(),
            }),
            _ => Ok(Self::default()),
        }
    }

    /// The answer text, or `None` when the value is missing or falsy.
    pub fn answer_text(&self) -> Option<String> {
        match self.answer.as_ref()? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            other => Some(display_text(other)),
        }
    }
}

/// Text a browser shows for a JSON value set as `textContent`: `null` is
/// empty, arrays join their items with `,`, objects are `[object Object]`.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Who wrote a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Bot,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub author: Author,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: Author::User,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: Author::Bot,
        }
    }
}

/// `GET /healthz` body of the answer service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    #[serde(default)]
    pub docs: u64,
}
