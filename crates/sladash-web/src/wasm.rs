#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use sladash_core::{Engine, EngineConfig, Key, UiEvent};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{AddEventListenerOptions, Element, Event, EventTarget, KeyboardEvent, Window};
use web_time::Instant;

use crate::dom::WebDocument;
use crate::fetch::WindowFetch;
use crate::registry::{ListenerRegistry, Registration};
use crate::storage::LocalStorage;

/// One `addEventListener` call and the closure it installed.
struct DomListener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Registration for DomListener {
    fn unregister(self) {
        let func: &js_sys::Function = self.closure.as_ref().unchecked_ref();
        if let Err(err) = self.target.remove_event_listener_with_callback(self.kind, func) {
            tracing::trace!(kind = self.kind, error = ?err, "removeEventListener failed");
        }
    }
}

/// State shared by every installed callback.
struct Shared {
    window: Window,
    doc: WebDocument,
    engine: RefCell<Engine<WebDocument, LocalStorage>>,
    epoch: Instant,
    width: Cell<u32>,
    timer: Cell<Option<i32>>,
    timer_fn: RefCell<Option<js_sys::Function>>,
}

impl Shared {
    fn now(&self) -> Duration {
        Instant::now().duration_since(self.epoch)
    }

    fn dispatch(&self, event: UiEvent<Element>) -> bool {
        let now = self.now();
        // A re-entrant callback (e.g. an event fired synchronously from a DOM
        // write) is dropped rather than panicking on the borrow.
        let Ok(mut engine) = self.engine.try_borrow_mut() else {
            tracing::trace!("engine busy, dropping re-entrant event");
            return false;
        };
        let out = engine.dispatch(&self.doc, event, now);
        drop(engine);
        self.schedule_tick();
        out.prevent_default
    }

    fn tick(&self) {
        self.timer.set(None);
        if let Ok(mut engine) = self.engine.try_borrow_mut() {
            engine.tick(&self.doc, self.now());
        }
        self.schedule_tick();
    }

    /// Arm one timeout for the debouncer's pending deadline.
    fn schedule_tick(&self) {
        let deadline = self.engine.try_borrow().ok().and_then(|e| e.resize_deadline());
        let Some(deadline) = deadline else {
            return;
        };
        if let Some(handle) = self.timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        let Some(func) = self.timer_fn.borrow().clone() else {
            return;
        };
        let delay = deadline.saturating_sub(self.now()).as_millis();
        let delay = i32::try_from(delay).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&func, delay)
        {
            Ok(handle) => self.timer.set(Some(handle)),
            Err(_) => tracing::debug!("setTimeout failed, resize stays pending"),
        }
    }

    fn cancel_timer(&self) {
        if let Some(handle) = self.timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

fn window_width(window: &Window) -> u32 {
    window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .map_or(0, |w| w.max(0.0) as u32)
}

fn event_target(event: &Event) -> Option<Element> {
    event.target().and_then(|t| t.dyn_into::<Element>().ok())
}

/// Live dashboard bound to the current page.
///
/// The listeners live as long as this handle. Dropping it (`free()` or the
/// JS finalizer) tears them down the same way `destroy()` does.
#[wasm_bindgen]
pub struct SlaDashboard {
    shared: Rc<Shared>,
    listeners: ListenerRegistry<DomListener>,
    timer_closure: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl SlaDashboard {
    /// Last window width reported to the engine, in CSS pixels.
    #[wasm_bindgen(js_name = viewportWidth)]
    pub fn viewport_width(&self) -> u32 {
        self.shared.width.get()
    }

    /// Remove every listener and cancel a pending resize. Idempotent.
    pub fn destroy(&mut self) {
        self.shared.cancel_timer();
        self.shared.timer_fn.borrow_mut().take();
        self.timer_closure = None;
        if self.listeners.is_empty() {
            return;
        }
        self.listeners.clear();
        tracing::debug!("dashboard listeners removed");
    }
}

impl Drop for SlaDashboard {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Bind every controller on `window.document` and install listeners.
///
/// `config` is an optional JSON object overriding [`EngineConfig`] defaults.
#[wasm_bindgen]
pub fn boot(config: Option<String>) -> Result<SlaDashboard, JsValue> {
    let config = match config.as_deref() {
        Some(json) => {
            EngineConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?
        }
        None => EngineConfig::default(),
    };
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let doc = WebDocument::new(document);
    let storage = LocalStorage::from_window(&window);
    let width = window_width(&window);
    let engine = Engine::bind(&doc, storage, config, width);
    let metrics = engine.metrics().cloned();

    let shared = Rc::new(Shared {
        window: window.clone(),
        doc: doc.clone(),
        engine: RefCell::new(engine),
        epoch: Instant::now(),
        width: Cell::new(width),
        timer: Cell::new(None),
        timer_fn: RefCell::new(None),
    });

    let timer_closure = {
        let shared = Rc::clone(&shared);
        Closure::wrap(Box::new(move || shared.tick()) as Box<dyn FnMut()>)
    };
    let timer_fn: &js_sys::Function = timer_closure.as_ref().unchecked_ref();
    *shared.timer_fn.borrow_mut() = Some(timer_fn.clone());

    let mut dashboard = SlaDashboard {
        shared: Rc::clone(&shared),
        listeners: ListenerRegistry::new(),
        timer_closure: Some(timer_closure),
    };

    let doc_target: EventTarget = doc.inner().clone().into();
    let win_target: EventTarget = window.clone().into();

    dashboard.listen(&doc_target, "click", None, {
        let shared = Rc::clone(&shared);
        move |ev: Event| {
            if shared.dispatch(UiEvent::Click { target: event_target(&ev) }) {
                ev.prevent_default();
            }
        }
    })?;
    dashboard.listen(&doc_target, "input", None, {
        let shared = Rc::clone(&shared);
        move |ev: Event| {
            shared.dispatch(UiEvent::Input { target: event_target(&ev) });
        }
    })?;
    dashboard.listen(&doc_target, "keydown", None, {
        let shared = Rc::clone(&shared);
        move |ev: Event| {
            let Some(kev) = ev.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let key = Key::from_dom_key(&kev.key());
            shared.dispatch(UiEvent::KeyDown { target: event_target(&ev), key });
        }
    })?;

    let passive = AddEventListenerOptions::new();
    passive.set_passive(true);
    dashboard.listen(&win_target, "resize", Some(&passive), {
        let shared = Rc::clone(&shared);
        move |_ev: Event| {
            let width = window_width(&shared.window);
            shared.width.set(width);
            shared.dispatch(UiEvent::Resize { width });
        }
    })?;

    if let Some(panel) = metrics {
        spawn_local(async move {
            panel.load_best_effort(&doc, &WindowFetch).await;
        });
    }

    Ok(dashboard)
}

impl SlaDashboard {
    fn listen<F>(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        options: Option<&AddEventListenerOptions>,
        handler: F,
    ) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let func: &js_sys::Function = closure.as_ref().unchecked_ref();
        match options {
            Some(opts) => target
                .add_event_listener_with_callback_and_add_event_listener_options(kind, func, opts)?,
            None => target.add_event_listener_with_callback(kind, func)?,
        }
        self.listeners.push(DomListener {
            target: target.clone(),
            kind,
            closure,
        });
        Ok(())
    }
}
