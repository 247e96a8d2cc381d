//! Shared site chat widget library (wire messages, answer transport, config,
//! widget state). Used by the browser widget and the `site-chat` terminal front end.

pub mod client;
pub mod config;
pub mod messages;
pub mod widget;

#[cfg(not(target_arch = "wasm32"))]
pub use client::HttpTransport;
pub use client::{parse_answer, ClientError, Transport};
pub use config::{default_config_path, ApiSection, Config, ConfigError, WidgetSection};
pub use messages::{AnswerResponse, AskRequest, Author, HealthStatus, Message};
pub use widget::{format_sources, ChatWidget, PanelState, PendingAsk};
