use std::cell::RefCell;
use std::rc::Rc;

use tier_core::{ContainerId, ItemId, Session};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, DragEvent, Element, Event, EventTarget, HtmlElement, MouseEvent, Node, Window,
};

pub mod board;
pub mod canvas;
pub mod config;
pub mod constants;
pub mod export;
pub mod renderer;
pub mod state;
pub mod utils;

use crate::board::Board;
use crate::config::HostConfig;
use crate::state::State;
use crate::utils::{log, read_host_config, set_verbose, warn};

pub type Shared = Rc<RefCell<State>>;

fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let cb = Closure::<dyn FnMut(Event)>::wrap(Box::new(handler));
    target.add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

/// Run `f` on the next turn of the event loop.
fn defer(window: &Window, f: impl FnOnce() + 'static) {
    let cb = Closure::once_into_js(f);
    if let Err(e) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), 0)
    {
        warn(&format!("Failed to schedule callback: {e:?}"));
    }
}

fn set_drop_effect(e: &Event, effect: &str) {
    if let Some(dt) = e.dyn_ref::<DragEvent>().and_then(|d| d.data_transfer()) {
        dt.set_drop_effect(effect);
    }
}

fn attach_item(state: &Shared, id: &ItemId, el: &HtmlElement) -> Result<(), JsValue> {
    // Tap to arm / disarm. Never reaches the enclosing dropzone.
    {
        let st = state.clone();
        let id = id.clone();
        listen(el, "click", move |e: Event| {
            e.stop_propagation();
            let mut s = st.borrow_mut();
            let r = s.session.tap_item(&id);
            s.commit(r);
        })?;
    }
    {
        let st = state.clone();
        let id = id.clone();
        listen(el, "dragstart", move |e: Event| {
            if let Some(dt) = e.dyn_ref::<DragEvent>().and_then(|d| d.data_transfer()) {
                if let Err(e) = dt.set_data("text/plain", id.as_str()) {
                    warn(&format!("Failed to set drag data for {id}: {e:?}"));
                }
                dt.set_effect_allowed("move");
            }
            let window = {
                let mut s = st.borrow_mut();
                let r = s.session.drag_start(id.clone());
                s.commit(r);
                s.window.clone()
            };
            // The drag image is captured after this handler returns; mark the
            // item only afterwards.
            let st2 = st.clone();
            let id2 = id.clone();
            defer(&window, move || {
                let mut s = st2.borrow_mut();
                let r = s.session.reveal_drag_mark(&id2);
                s.commit(Ok(r));
            });
        })?;
    }
    {
        let st = state.clone();
        listen(el, "dragend", move |_e: Event| {
            let mut s = st.borrow_mut();
            let r = s.session.drag_end();
            s.commit(Ok(r));
        })?;
    }
    Ok(())
}

fn attach_zone(state: &Shared, id: &ContainerId, el: &HtmlElement) -> Result<(), JsValue> {
    let item_selector = state.borrow().config.item_selector.clone();
    {
        let st = state.clone();
        let id = id.clone();
        listen(el, "click", move |e: Event| {
            let on_item = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|t| t.closest(&item_selector).ok().flatten())
                .is_some();
            if on_item {
                log("Click landed on an item; handled by the item");
                return;
            }
            let mut s = st.borrow_mut();
            let r = s.session.tap_container(&id);
            s.commit(r);
        })?;
    }
    for kind in ["dragover", "dragenter"] {
        let st = state.clone();
        let id = id.clone();
        listen(el, kind, move |e: Event| {
            e.prevent_default();
            set_drop_effect(&e, "move");
            let mut s = st.borrow_mut();
            let r = s.session.drag_over(&id);
            s.commit(Ok(r));
        })?;
    }
    {
        let st = state.clone();
        let id = id.clone();
        let zone: Node = el.clone().into();
        listen(el, "dragleave", move |e: Event| {
            let from_zone = e
                .target()
                .and_then(|t| t.dyn_into::<Node>().ok())
                .is_some_and(|t| t.is_same_node(Some(&zone)));
            let related = e
                .dyn_ref::<MouseEvent>()
                .and_then(|m| m.related_target())
                .and_then(|t| t.dyn_into::<Node>().ok());
            let left = from_zone || !zone.contains(related.as_ref());
            let mut s = st.borrow_mut();
            let r = s.session.drag_leave(&id, left);
            s.commit(Ok(r));
        })?;
    }
    {
        let st = state.clone();
        let id = id.clone();
        listen(el, "drop", move |e: Event| {
            e.prevent_default();
            let mut s = st.borrow_mut();
            let r = s.session.drop_on(&id);
            s.commit(r);
        })?;
    }
    Ok(())
}

fn attach_ui(state: Shared) -> Result<(), JsValue> {
    let (items, zones, save_button) = {
        let s = state.borrow();
        let items: Vec<(ItemId, HtmlElement)> = s
            .board
            .items()
            .map(|(id, el)| (id.clone(), el.clone()))
            .collect();
        let zones: Vec<(ContainerId, HtmlElement)> = s
            .board
            .zones()
            .map(|(id, el)| (id.clone(), el.clone()))
            .collect();
        let save_button = s.document.get_element_by_id(&s.config.save_button_id);
        (items, zones, save_button)
    };
    for (id, el) in &items {
        attach_item(&state, id, el)?;
    }
    for (id, el) in &zones {
        attach_zone(&state, id, el)?;
    }

    // Export PNG
    match save_button {
        Some(btn) => {
            let st = state.clone();
            listen(&btn, "click", move |_e: Event| {
                wasm_bindgen_futures::spawn_local(export::export_tier_list(st.clone()));
            })?;
        }
        None => warn("Save button not found; export is unavailable"),
    }
    Ok(())
}

/// Bind the host markup to a new session and wire every handler once.
/// Returns `None` when the page has no tier list.
pub fn mount(
    window: Window,
    document: Document,
    config: HostConfig,
) -> Result<Option<Shared>, JsValue> {
    if document.get_element_by_id(&config.tiers_container_id).is_none() {
        log("No tier list markup found");
        return Ok(None);
    }

    let (board, model) = Board::scan(&document, &config)?;
    log(&format!(
        "Board: {} items in {} containers",
        model.item_count(),
        model.containers().count()
    ));
    let state = Rc::new(RefCell::new(State {
        window,
        document,
        config,
        board,
        session: Session::new(model),
        exporting: false,
    }));

    // Initial setup: no stale selected/dragging classes from the markup.
    state.borrow().sync_marks();
    attach_ui(state.clone())?;
    log("Tier list app initialized");
    Ok(Some(state))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let config = read_host_config(&window);
    set_verbose(config.debug);
    mount(window, document, config)?;
    Ok(())
}
