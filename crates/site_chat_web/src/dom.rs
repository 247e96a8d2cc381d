//! DOM construction and rendering of a [`ChatWidget`].

use site_chat_client::{Author, ChatWidget, PanelState};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

pub const TITLE: &str = "Site Assistant";
pub const LAUNCHER_LABEL: &str = "Chat with us";
pub const INPUT_PLACEHOLDER: &str = "Ask me anything about this site…";

pub const CLOSE_ID: &str = "sc-close";

const STYLE: &str = r#"
#sc-launcher{position:fixed;right:20px;bottom:20px;z-index:2147483000;padding:10px 16px;border:none;border-radius:20px;background:#1f2937;color:#fff;font:14px sans-serif;cursor:pointer}
#sc-panel{position:fixed;right:20px;bottom:70px;z-index:2147483000;width:340px;height:460px;flex-direction:column;background:#fff;border-radius:12px;box-shadow:0 8px 24px rgba(0,0,0,.2);font:14px sans-serif;overflow:hidden}
#sc-header{display:flex;justify-content:space-between;align-items:center;padding:10px 12px;background:#1f2937;color:#fff}
#sc-close{background:none;border:none;color:#fff;font-size:18px;cursor:pointer}
#sc-messages{flex:1;overflow-y:auto;padding:10px}
.sc-msg{margin:6px 0;padding:8px 10px;border-radius:8px;white-space:pre-wrap;max-width:85%}
.sc-user{margin-left:auto;background:#dbeafe}
.sc-bot{background:#f3f4f6}
#sc-sources{padding:0 10px 6px;color:#6b7280;font-size:12px;min-height:1em}
#sc-inputbar{display:flex;border-top:1px solid #e5e7eb}
#sc-input{flex:1;border:none;padding:10px;font:inherit;outline:none}
#sc-send{border:none;background:#1f2937;color:#fff;padding:0 14px;cursor:pointer}
"#;

fn el(document: &Document, tag: &str, id: Option<&str>, text: Option<&str>) -> Result<Element, JsValue> {
    let e = document.create_element(tag)?;
    if let Some(id) = id {
        e.set_id(id);
    }
    if let Some(text) = text {
        e.set_text_content(Some(text));
    }
    Ok(e)
}

/// The widget's nodes. Built once, detached until [`WidgetDom::attach`].
pub struct WidgetDom {
    document: Document,
    pub launcher: HtmlElement,
    pub panel: HtmlElement,
    pub messages: Element,
    pub sources: Element,
    pub input: HtmlInputElement,
    pub send: HtmlElement,
}

impl WidgetDom {
    pub fn build(document: &Document) -> Result<Self, JsValue> {
        let launcher: HtmlElement = el(document, "button", Some("sc-launcher"), Some(LAUNCHER_LABEL))?.dyn_into()?;
        let panel: HtmlElement = el(document, "div", Some("sc-panel"), None)?.dyn_into()?;
        panel.style().set_property("display", "none")?;

        let header = el(document, "div", Some("sc-header"), None)?;
        header.append_child(&(el(document, "span", None, Some(TITLE))? as Element))?;
        header.append_child(&(el(document, "button", Some(CLOSE_ID), Some("×"))? as Element))?;

        let messages = el(document, "div", Some("sc-messages"), None)?;
        let sources = el(document, "div", Some("sc-sources"), None)?;

        let inputbar = el(document, "div", Some("sc-inputbar"), None)?;
        let input: HtmlInputElement = el(document, "input", Some("sc-input"), None)?.dyn_into()?;
        input.set_type("text");
        input.set_placeholder(INPUT_PLACEHOLDER);
        let send: HtmlElement = el(document, "button", Some("sc-send"), Some("Send"))?.dyn_into()?;
        inputbar.append_child(&input)?;
        inputbar.append_child(&send)?;

        panel.append_child(&header)?;
        panel.append_child(&messages)?;
        panel.append_child(&sources)?;
        panel.append_child(&inputbar)?;

        Ok(Self {
            document: document.clone(),
            launcher,
            panel,
            messages,
            sources,
            input,
            send,
        })
    }

    /// Add the stylesheet to `<head>` and the launcher and panel to `<body>`.
    pub fn attach(&self) -> Result<(), JsValue> {
        if let Some(head) = self.document.head() {
            let style = el(&self.document, "style", Some("sc-style"), Some(STYLE))?;
            head.append_child(&style)?;
        }
        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        body.append_child(&self.launcher)?;
        body.append_child(&self.panel)?;
        Ok(())
    }

    /// Bring the nodes in line with `widget`. `rendered` counts transcript
    /// entries already in the message list and is advanced past new ones.
    pub fn render(&self, widget: &ChatWidget, rendered: &mut usize) -> Result<(), JsValue> {
        let display = match widget.panel() {
            PanelState::Open => "flex",
            PanelState::Closed => "none",
        };
        self.panel.style().set_property("display", display)?;

        for msg in widget.transcript().iter().skip(*rendered) {
            let node = el(&self.document, "div", None, Some(&msg.text))?;
            node.set_class_name(match msg.author {
                Author::User => "sc-msg sc-user",
                Author::Bot => "sc-msg sc-bot",
            });
            self.messages.append_child(&node)?;
            self.messages.set_scroll_top(self.messages.scroll_height());
            *rendered += 1;
        }

        // The field mirrors the widget through `input` events; only a submit
        // makes them differ.
        if self.input.value() != widget.input() {
            self.input.set_value(widget.input());
        }
        self.sources.set_text_content(Some(widget.sources_line()));
        Ok(())
    }
}
