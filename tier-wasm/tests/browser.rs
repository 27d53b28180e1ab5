#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::io::Cursor;

use snapshot_core::RenderOptions;
use tier_core::{ContainerId, ItemId, Session};
use tier_wasm::Shared;
use tier_wasm::board::Board;
use tier_wasm::config::HostConfig;
use tier_wasm::constants::{CANDIDATE_CLASS, DRAGGING_CLASS, SELECTED_CLASS, SNAPSHOT_COPY_ATTR};
use tier_wasm::export::{ExportError, ExportTarget, capture_png, export_snapshot, run_export};
use tier_wasm::renderer::{Notifier, RasterRenderer};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{
    Document, DragEvent, DragEventInit, EventTarget, HtmlCanvasElement, HtmlElement, Window,
};

wasm_bindgen_test_configure!(run_in_browser);

const MARKUP: &str = r#"
<div id="tiers-container">
  <div class="tier-row"><div class="dropzone" id="tier-s"></div></div>
  <div class="tier-row"><div class="dropzone" id="tier-a"><span class="hint">drop here</span></div></div>
</div>
<div class="dropzone" id="item-bank">
  <div class="item" data-id="cat" draggable="true"><img alt=""><span class="item-label">Cat</span></div>
  <div class="item" data-id="dog" draggable="true"><img alt=""><span class="item-label">Dog</span></div>
</div>
"#;

/// Tier zones without ids, and an item left outside every zone.
const ANONYMOUS_ZONES: &str = r#"
<div id="tiers-container">
  <div class="dropzone" data-tier="s"><div class="item" data-id="owl"><img alt=""><span>Owl</span></div></div>
  <div class="dropzone" data-tier="a"></div>
</div>
<div class="item" data-id="yak"><img alt=""><span>Yak</span></div>
<div class="dropzone" id="item-bank">
  <div class="item" data-id="cat"><img alt=""><span>Cat</span></div>
</div>
"#;

/// A `.tier-list-app` subtree mounted into the page body, removed on drop.
struct Fixture {
    window: Window,
    document: Document,
    app: HtmlElement,
}

impl Fixture {
    fn mount(max_width: &str) -> Self {
        Self::with_markup(max_width, MARKUP)
    }

    fn with_markup(max_width: &str, markup: &str) -> Self {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        let app: HtmlElement = document
            .create_element("div")
            .unwrap()
            .dyn_into()
            .unwrap();
        app.set_class_name("tier-list-app");
        app.style().set_property("max-width", max_width).unwrap();
        app.set_inner_html(markup);
        document.body().unwrap().append_child(&app).unwrap();
        Fixture {
            window,
            document,
            app,
        }
    }

    /// Wire the fixture the way the page start-up does.
    fn wire(&self) -> Shared {
        tier_wasm::mount(
            self.window.clone(),
            self.document.clone(),
            HostConfig::default(),
        )
        .unwrap()
        .expect("fixture has a tier list")
    }

    fn element(&self, selector: &str) -> HtmlElement {
        self.app
            .query_selector(selector)
            .unwrap()
            .unwrap_or_else(|| panic!("{selector} not in fixture"))
            .dyn_into()
            .unwrap()
    }

    fn parent_id(&self, selector: &str) -> String {
        self.element(selector).parent_element().unwrap().id()
    }

    fn child_ids(&self, selector: &str) -> Vec<String> {
        let children = self
            .app
            .query_selector_all(&format!("{selector} > [data-id]"))
            .unwrap();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
            .filter_map(|el| el.get_attribute("data-id"))
            .collect()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.app.remove();
    }
}

fn copies_in(document: &Document) -> u32 {
    document
        .query_selector_all(&format!("[{SNAPSHOT_COPY_ATTR}]"))
        .unwrap()
        .length()
}

/// Dispatch a bubbling, cancelable drag event. Returns `false` when a
/// listener called `preventDefault`.
fn fire(target: &EventTarget, kind: &str, related: Option<&HtmlElement>) -> bool {
    let init = DragEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_related_target(related.map(|el| {
        let t: &EventTarget = el;
        t
    }));
    let event = DragEvent::new_with_event_init_dict(kind, &init).unwrap();
    target.dispatch_event(&event).unwrap()
}

/// Let zero-delay timeouts run.
async fn next_tick(window: &Window) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 10)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn has_class(el: &HtmlElement, class: &str) -> bool {
    el.class_list().contains(class)
}

#[wasm_bindgen_test]
fn scan_reads_initial_placement() {
    let fx = Fixture::mount("none");
    let (board, model) = Board::scan(&fx.document, &HostConfig::default()).unwrap();

    let containers: Vec<_> = model.containers().cloned().collect();
    assert_eq!(
        containers,
        vec![
            ContainerId::zone("tier-s"),
            ContainerId::zone("tier-a"),
            ContainerId::Bank
        ]
    );
    assert_eq!(
        model.items_in(&ContainerId::Bank).unwrap(),
        [ItemId::new("cat"), ItemId::new("dog")].as_slice()
    );
    assert!(board.item(&ItemId::new("dog")).is_some());
    model.check_invariant().unwrap();
}

#[wasm_bindgen_test]
fn zones_without_ids_get_their_own_containers() {
    let fx = Fixture::with_markup("none", ANONYMOUS_ZONES);
    let (_board, model) = Board::scan(&fx.document, &HostConfig::default()).unwrap();

    let containers: Vec<_> = model.containers().cloned().collect();
    assert_eq!(
        containers,
        vec![
            ContainerId::zone("zone-0"),
            ContainerId::zone("zone-1"),
            ContainerId::Bank
        ]
    );
    assert_eq!(
        model.container_of(&ItemId::new("owl")),
        Some(&ContainerId::zone("zone-0"))
    );
    model.check_invariant().unwrap();
}

#[wasm_bindgen_test]
fn stray_items_join_the_end_of_the_bank() {
    let fx = Fixture::with_markup("none", ANONYMOUS_ZONES);
    let (_board, model) = Board::scan(&fx.document, &HostConfig::default()).unwrap();

    assert_eq!(fx.child_ids("#item-bank"), ["cat", "yak"]);
    assert_eq!(
        model.items_in(&ContainerId::Bank).unwrap(),
        [ItemId::new("cat"), ItemId::new("yak")].as_slice()
    );
}

#[wasm_bindgen_test]
fn id_less_zone_is_the_bank_when_no_zone_has_the_bank_id() {
    let fx = Fixture::with_markup(
        "none",
        r#"<div id="tiers-container"><div class="dropzone" id="tier-s"></div></div>
           <div class="dropzone"><div class="item" data-id="cat"></div></div>"#,
    );
    let (_board, model) = Board::scan(&fx.document, &HostConfig::default()).unwrap();
    assert_eq!(
        model.container_of(&ItemId::new("cat")),
        Some(&ContainerId::Bank)
    );
}

#[wasm_bindgen_test]
fn taps_work_on_zones_without_ids() {
    let fx = Fixture::with_markup("none", ANONYMOUS_ZONES);
    let _state = fx.wire();

    fx.element("[data-id=cat]").click();
    fx.element("[data-tier=a]").click();
    assert_eq!(
        fx.element("[data-id=cat]")
            .parent_element()
            .unwrap()
            .get_attribute("data-tier")
            .as_deref(),
        Some("a")
    );
}

#[wasm_bindgen_test]
fn place_and_marks_follow_the_session() {
    let fx = Fixture::mount("none");
    let (board, model) = Board::scan(&fx.document, &HostConfig::default()).unwrap();
    let mut session = Session::new(model);
    let cat = ItemId::new("cat");

    session.tap_item(&cat).unwrap();
    board.apply_marks(&session.marks()).unwrap();
    assert!(has_class(&fx.element("[data-id=cat]"), SELECTED_CLASS));

    session.tap_container(&ContainerId::zone("tier-a")).unwrap();
    board.place(&cat, &ContainerId::zone("tier-a")).unwrap();
    board.apply_marks(&session.marks()).unwrap();
    assert_eq!(fx.parent_id("[data-id=cat]"), "tier-a");
    assert!(!has_class(&fx.element("[data-id=cat]"), SELECTED_CLASS));
}

#[wasm_bindgen_test]
fn taps_move_items_between_zones() {
    let fx = Fixture::mount("none");
    let state = fx.wire();

    let cat = fx.element("[data-id=cat]");
    cat.click();
    assert!(has_class(&cat, SELECTED_CLASS));

    // The item handler stops propagation, so the bank does not take the tap.
    assert_eq!(fx.parent_id("[data-id=cat]"), "item-bank");

    fx.element("#tier-s").click();
    assert_eq!(fx.parent_id("[data-id=cat]"), "tier-s");
    assert!(!has_class(&cat, SELECTED_CLASS));
    assert_eq!(
        state.borrow().session.model().container_of(&ItemId::new("cat")),
        Some(&ContainerId::zone("tier-s"))
    );

    // Tapping a zone with nothing armed changes nothing.
    fx.element("#tier-a").click();
    assert_eq!(fx.parent_id("[data-id=cat]"), "tier-s");

    // Second tap on the armed item disarms it.
    let dog = fx.element("[data-id=dog]");
    dog.click();
    dog.click();
    assert!(!has_class(&dog, SELECTED_CLASS));
    fx.element("#tier-a").click();
    assert_eq!(fx.parent_id("[data-id=dog]"), "item-bank");
}

#[wasm_bindgen_test(async)]
async fn drag_highlights_one_candidate_and_drops() {
    let fx = Fixture::mount("none");
    let state = fx.wire();
    let (cat, dog) = (fx.element("[data-id=cat]"), fx.element("[data-id=dog]"));
    let (tier_s, tier_a, bank) = (
        fx.element("#tier-s"),
        fx.element("#tier-a"),
        fx.element("#item-bank"),
    );

    // Starting a drag disarms the tapped item.
    dog.click();
    fire(&cat, "dragstart", None);
    assert!(!has_class(&dog, SELECTED_CLASS));
    assert!(!has_class(&cat, DRAGGING_CLASS));
    next_tick(&fx.window).await;
    assert!(has_class(&cat, DRAGGING_CLASS));

    assert!(!fire(&tier_s, "dragenter", None));
    assert!(has_class(&tier_s, CANDIDATE_CLASS));

    // Home zone accepts the event but is never highlighted.
    assert!(!fire(&bank, "dragover", None));
    assert!(!has_class(&bank, CANDIDATE_CLASS));

    assert!(!fire(&tier_a, "dragover", None));
    assert!(has_class(&tier_a, CANDIDATE_CLASS));
    assert!(!has_class(&tier_s, CANDIDATE_CLASS));

    // Crossing onto a child of the zone keeps the highlight.
    fire(&fx.element("#tier-a .hint"), "dragleave", Some(&tier_a));
    assert!(has_class(&tier_a, CANDIDATE_CLASS));
    fire(&tier_a, "dragleave", Some(&fx.document.body().unwrap()));
    assert!(!has_class(&tier_a, CANDIDATE_CLASS));

    fire(&tier_a, "dragover", None);
    assert!(!fire(&tier_a, "drop", None));
    assert_eq!(fx.parent_id("[data-id=cat]"), "tier-a");
    assert!(!has_class(&tier_a, CANDIDATE_CLASS));
    assert!(!has_class(&cat, DRAGGING_CLASS));

    fire(&cat, "dragend", None);
    assert!(state.borrow().session.drag().dragging().is_none());
    // A repeated drag-end is harmless.
    fire(&cat, "dragend", None);
    assert!(state.borrow().session.drag().dragging().is_none());
    state.borrow().session.check_invariants().unwrap();
}

#[wasm_bindgen_test]
fn drop_on_home_zone_changes_nothing() {
    let fx = Fixture::mount("none");
    let state = fx.wire();
    let (cat, bank) = (fx.element("[data-id=cat]"), fx.element("#item-bank"));

    fire(&cat, "dragstart", None);
    fire(&bank, "dragover", None);
    assert!(!fire(&bank, "drop", None));
    fire(&cat, "dragend", None);

    assert_eq!(fx.child_ids("#item-bank"), ["cat", "dog"]);
    assert_eq!(
        state.borrow().session.model().items_in(&ContainerId::Bank).unwrap(),
        [ItemId::new("cat"), ItemId::new("dog")].as_slice()
    );
    assert!(state.borrow().session.drag().dragging().is_none());
}

#[derive(Default)]
struct RejectingRenderer {
    saw_attached_copy: Cell<bool>,
    width: Cell<u32>,
}

impl RasterRenderer for RejectingRenderer {
    async fn render(
        &self,
        element: &HtmlElement,
        options: &RenderOptions,
    ) -> Result<HtmlCanvasElement, ExportError> {
        self.saw_attached_copy
            .set(element.is_connected() && element.has_attribute(SNAPSHOT_COPY_ATTR));
        self.width.set(options.width);
        Err(ExportError::Render("rejected".to_string()))
    }
}

/// Returns a blank canvas of the requested output size.
#[derive(Default)]
struct BlankRenderer {
    copy_width: RefCell<String>,
}

impl RasterRenderer for BlankRenderer {
    async fn render(
        &self,
        element: &HtmlElement,
        options: &RenderOptions,
    ) -> Result<HtmlCanvasElement, ExportError> {
        *self.copy_width.borrow_mut() = element.style().get_property_value("width")?;
        let document = web_sys::window().unwrap().document().unwrap();
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into().unwrap();
        canvas.set_width(options.output_width());
        canvas.set_height(24);
        Ok(canvas)
    }
}

/// Records what the live board looked like while the render ran.
struct WatchingRenderer {
    state: Shared,
    item: HtmlElement,
    item_was_selected: Cell<Option<bool>>,
    exporting: Cell<bool>,
}

impl RasterRenderer for WatchingRenderer {
    async fn render(
        &self,
        _element: &HtmlElement,
        _options: &RenderOptions,
    ) -> Result<HtmlCanvasElement, ExportError> {
        self.item_was_selected
            .set(Some(has_class(&self.item, SELECTED_CLASS)));
        self.exporting.set(self.state.borrow().exporting);
        Err(ExportError::Render("rejected".to_string()))
    }
}

#[derive(Default)]
struct CountingNotifier(Cell<usize>);

impl Notifier for CountingNotifier {
    fn notify(&self, _message: &str) {
        self.0.set(self.0.get() + 1);
    }
}

#[wasm_bindgen_test(async)]
async fn rejected_render_removes_copy_and_notifies_once() {
    let fx = Fixture::mount("640px");
    let target = ExportTarget::locate(&fx.window, &fx.document, &HostConfig::default()).unwrap();
    let renderer = RejectingRenderer::default();
    let notifier = CountingNotifier::default();

    let result = export_snapshot(&target, &renderer, &notifier).await;

    assert!(matches!(result, Err(ExportError::Render(_))));
    assert!(renderer.saw_attached_copy.get());
    assert_eq!(renderer.width.get(), 640);
    assert_eq!(notifier.0.get(), 1);
    assert_eq!(copies_in(&fx.document), 0);
}

#[wasm_bindgen_test(async)]
async fn export_run_clears_selection_before_capture() {
    let fx = Fixture::mount("640px");
    let state = fx.wire();
    let cat = fx.element("[data-id=cat]");
    cat.click();
    assert!(has_class(&cat, SELECTED_CLASS));

    let renderer = WatchingRenderer {
        state: state.clone(),
        item: cat.clone(),
        item_was_selected: Cell::new(None),
        exporting: Cell::new(false),
    };
    let notifier = CountingNotifier::default();
    let result = run_export(&state, &renderer, &notifier).await;

    assert!(matches!(result, Err(ExportError::Render(_))));
    assert_eq!(renderer.item_was_selected.get(), Some(false));
    assert!(renderer.exporting.get());
    assert!(!state.borrow().exporting);
    assert!(state.borrow().session.selection().armed().is_none());
    assert_eq!(notifier.0.get(), 1);
    // Placement is untouched by a failed export.
    assert_eq!(fx.parent_id("[data-id=cat]"), "item-bank");
}

#[wasm_bindgen_test(async)]
async fn export_run_while_busy_is_refused() {
    let fx = Fixture::mount("640px");
    let state = fx.wire();
    state.borrow_mut().exporting = true;

    let renderer = RejectingRenderer::default();
    let notifier = CountingNotifier::default();
    let result = run_export(&state, &renderer, &notifier).await;

    assert!(matches!(result, Err(ExportError::Busy)));
    assert_eq!(renderer.width.get(), 0);
    assert_eq!(notifier.0.get(), 0);
    assert_eq!(copies_in(&fx.document), 0);
    assert!(state.borrow().exporting);
}

#[wasm_bindgen_test(async)]
async fn capture_renders_at_twice_the_app_width() {
    let fx = Fixture::mount("640px");
    let target = ExportTarget::locate(&fx.window, &fx.document, &HostConfig::default()).unwrap();
    let renderer = BlankRenderer::default();

    let png = capture_png(&target, &renderer).await.unwrap();

    assert_eq!(renderer.copy_width.borrow().as_str(), "640px");
    assert_eq!(copies_in(&fx.document), 0);
    // The live board is never restyled.
    assert_eq!(fx.element("#tiers-container").style().get_property_value("width").unwrap(), "");

    let decoder = png::Decoder::new(Cursor::new(png));
    let reader = decoder.read_info().unwrap();
    assert_eq!(reader.info().width, 1280);
    assert_eq!(reader.info().height, 24);
}

#[wasm_bindgen_test(async)]
async fn capture_falls_back_when_app_width_is_unbounded() {
    let fx = Fixture::mount("none");
    let target = ExportTarget::locate(&fx.window, &fx.document, &HostConfig::default()).unwrap();
    let renderer = BlankRenderer::default();

    let png = capture_png(&target, &renderer).await.unwrap();

    assert_eq!(renderer.copy_width.borrow().as_str(), "1000px");
    let reader = png::Decoder::new(Cursor::new(png)).read_info().unwrap();
    assert_eq!(reader.info().width, 2000);
}
