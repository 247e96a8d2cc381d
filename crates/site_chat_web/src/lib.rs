//! Embeddable site chat widget. Loading the wasm module mounts a launcher
//! button and a chat panel into the page body once the document has loaded.
//!
//! The endpoint comes from `window.SITE_CHAT_API` when set, else the
//! local-development default.

pub mod dom;
pub mod transport;

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use site_chat_client::config::{self, ENDPOINT_OVERRIDE};
use site_chat_client::{ChatWidget, Transport};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, EventTarget, KeyboardEvent, Window};

use dom::{WidgetDom, CLOSE_ID};
use transport::FetchTransport;

/// One widget instance per page.
struct App {
    window: Window,
    widget: RefCell<ChatWidget>,
    dom: WidgetDom,
    rendered: Cell<usize>,
    transport: Box<dyn Transport>,
}

impl App {
    fn render(&self) {
        let mut rendered = self.rendered.get();
        if let Err(e) = self.dom.render(&self.widget.borrow(), &mut rendered) {
            tracing::error!(error = ?e, "render failed");
        }
        self.rendered.set(rendered);
    }

    fn page_url(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }
}

fn endpoint_override(window: &Window) -> Option<String> {
    js_sys::Reflect::get(window, &JsValue::from_str(ENDPOINT_OVERRIDE))
        .ok()
        .and_then(|v| v.as_string())
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

fn submit(app: &Rc<App>) {
    let pending = {
        let mut widget = app.widget.borrow_mut();
        widget.set_input(app.dom.input.value());
        match widget.begin_submit(&app.page_url()) {
            Some(pending) => pending,
            None => return,
        }
    };
    app.render();

    let app = Rc::clone(app);
    spawn_local(async move {
        let outcome = app.transport.ask(&pending.request).await;
        app.widget.borrow_mut().finish(pending.id, outcome);
        app.render();
    });
}

fn wire(app: &Rc<App>) -> Result<(), JsValue> {
    let a = Rc::clone(app);
    listen(&app.dom.launcher, "click", move |_: Event| {
        a.widget.borrow_mut().open();
        a.render();
        let _ = a.dom.input.focus();
    })?;

    let a = Rc::clone(app);
    listen(&app.dom.panel, "click", move |e: Event| {
        let on_close = e
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .is_some_and(|t| t.id() == CLOSE_ID);
        if on_close {
            a.widget.borrow_mut().close();
            a.render();
        }
    })?;

    let a = Rc::clone(app);
    listen(&app.dom.input, "input", move |_: Event| {
        a.widget.borrow_mut().set_input(a.dom.input.value());
    })?;

    let a = Rc::clone(app);
    listen(&app.dom.send, "click", move |_: Event| submit(&a))?;

    let a = Rc::clone(app);
    listen(&app.dom.input, "keydown", move |e: Event| {
        let enter = e
            .dyn_ref::<KeyboardEvent>()
            .is_some_and(|k| k.key() == "Enter");
        if enter {
            submit(&a);
        }
    })?;
    Ok(())
}

/// A mounted widget.
#[derive(Clone)]
pub struct WidgetHandle {
    app: Rc<App>,
}

impl WidgetHandle {
    pub fn widget(&self) -> Ref<'_, ChatWidget> {
        self.app.widget.borrow()
    }
}

/// Mount into `window`'s document, asking `window.SITE_CHAT_API` or the
/// default endpoint.
pub fn mount(window: Window) -> Result<WidgetHandle, JsValue> {
    let endpoint = config::resolve_endpoint(endpoint_override(&window).as_deref(), None);
    tracing::debug!(%endpoint, "mounting chat widget");
    mount_with_transport(window, Box::new(FetchTransport::new(endpoint)))
}

/// Mount into `window`'s document with a given transport.
pub fn mount_with_transport(
    window: Window,
    transport: Box<dyn Transport>,
) -> Result<WidgetHandle, JsValue> {
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))?;
    let dom = WidgetDom::build(&document)?;
    dom.attach()?;
    let app = Rc::new(App {
        window,
        widget: RefCell::new(ChatWidget::new()),
        dom,
        rendered: Cell::new(0),
        transport,
    });
    wire(&app)?;
    Ok(WidgetHandle { app })
}

/// Mount now if the document has finished loading, else on `DOMContentLoaded`.
pub fn mount_when_ready(window: Window) -> Result<(), JsValue> {
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))?;

    if document.ready_state() != "loading" {
        return mount(window).map(drop);
    }
    listen(&document, "DOMContentLoaded", move |_: Event| {
        if let Err(e) = mount(window.clone()) {
            tracing::error!(error = ?e, "failed to mount chat widget");
        }
    })
}

/// Entry point run when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    mount_when_ready(window)
}
