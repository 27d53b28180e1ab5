use std::cell::RefCell;
use std::rc::Rc;

use snapshot_core::{CapturePlan, Declarations, SnapshotError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::board::query_all;
use crate::canvas::read_raster;
use crate::config::HostConfig;
use crate::constants::{EXPORT_FAILED_MESSAGE, SNAPSHOT_COPY_ATTR};
use crate::renderer::{Html2Canvas, Notifier, RasterRenderer, WindowAlert};
use crate::state::State;
use crate::utils::{describe, log, save_bytes_as_file, warn};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("DOM operation failed: {0}")]
    Dom(String),
    #[error("renderer failed: {0}")]
    Render(String),
    #[error("canvas unavailable: {0}")]
    Canvas(String),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("an export is already in progress")]
    Busy,
}

impl From<JsValue> for ExportError {
    fn from(v: JsValue) -> Self {
        ExportError::Dom(describe(&v))
    }
}

/// The live page elements a snapshot is taken from.
pub struct ExportTarget {
    pub window: Window,
    pub document: Document,
    /// The subtree holding every dropzone and item.
    pub source: HtmlElement,
    /// Element whose computed `max-width` sets the capture width.
    pub app: Option<Element>,
    pub config: HostConfig,
}

impl ExportTarget {
    pub fn locate(window: &Window, document: &Document, config: &HostConfig) -> Result<Self, ExportError> {
        let source = document
            .get_element_by_id(&config.tiers_container_id)
            .ok_or_else(|| ExportError::Dom(format!("#{} not found", config.tiers_container_id)))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| ExportError::Dom("tiers container is not an HTML element".to_string()))?;
        let app = document.query_selector(&config.app_selector)?;
        Ok(ExportTarget {
            window: window.clone(),
            document: document.clone(),
            source,
            app,
            config: config.clone(),
        })
    }

    /// Build the capture plan from the page's computed styles.
    pub fn plan(&self) -> Result<CapturePlan, ExportError> {
        let max_width = match &self.app {
            Some(app) => computed(&self.window, app, "max-width")?,
            None => String::new(),
        };
        let padding = computed(&self.window, &self.source, "padding")?;
        Ok(CapturePlan::new(&self.config.capture, &max_width, &padding))
    }
}

fn computed(window: &Window, el: &Element, property: &str) -> Result<String, ExportError> {
    Ok(match window.get_computed_style(el)? {
        Some(style) => style.get_property_value(property)?,
        None => String::new(),
    })
}

fn apply(el: &HtmlElement, decls: &Declarations) -> Result<(), JsValue> {
    let style = el.style();
    for (name, value) in decls {
        style.set_property(name, value)?;
    }
    Ok(())
}

/// Normalized deep copy of the board, attached off-screen for as long as
/// this value lives.
pub struct OffscreenCopy {
    element: HtmlElement,
}

impl OffscreenCopy {
    pub fn attach(target: &ExportTarget, plan: &CapturePlan) -> Result<Self, ExportError> {
        let element = target
            .source
            .clone_node_with_deep(true)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| ExportError::Dom("copy is not an HTML element".to_string()))?;
        element.set_attribute(SNAPSHOT_COPY_ATTR, "")?;
        element.set_attribute("aria-hidden", "true")?;
        apply(&element, &plan.root)?;

        let cfg = &target.config;
        for zone in query_all(&element, &cfg.zone_selector)? {
            apply(&zone, &plan.zone)?;
        }
        for item in query_all(&element, &cfg.item_selector)? {
            apply(&item, &plan.item)?;
            for img in query_all(&item, &cfg.image_selector)? {
                apply(&img, &plan.image)?;
            }
            for label in query_all(&item, &cfg.label_selector)? {
                apply(&label, &plan.label)?;
            }
        }

        let body = target
            .document
            .body()
            .ok_or_else(|| ExportError::Dom("document has no body".to_string()))?;
        body.append_child(&element)?;
        log("Off-screen copy created and styled");
        Ok(OffscreenCopy { element })
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl Drop for OffscreenCopy {
    fn drop(&mut self) {
        self.element.remove();
        log("Off-screen copy removed");
    }
}

async fn wait_for_fonts(document: &Document) {
    match document.fonts().ready() {
        Ok(ready) => {
            if let Err(e) = JsFuture::from(ready).await {
                warn(&format!("Font loading failed: {}", describe(&e)));
            }
        }
        Err(e) => warn(&format!("Font loading status unavailable: {}", describe(&e))),
    }
}

/// Render the board at the configured width and return PNG bytes. The
/// off-screen copy is removed on every path out of this function.
pub async fn capture_png<R: RasterRenderer>(
    target: &ExportTarget,
    renderer: &R,
) -> Result<Vec<u8>, ExportError> {
    let plan = target.plan()?;
    log(&format!("Target capture width: {}px", plan.target_width));
    let copy = OffscreenCopy::attach(target, &plan)?;
    wait_for_fonts(&target.document).await;
    let canvas = renderer.render(copy.element(), &plan.options).await?;
    log(&format!("Canvas generated: {}x{}", canvas.width(), canvas.height()));
    let raster = read_raster(&canvas)?;
    Ok(raster.encode_png()?)
}

/// Capture and download the board. Failures are reported through
/// `notifier` exactly once and returned.
pub async fn export_snapshot<R: RasterRenderer, N: Notifier>(
    target: &ExportTarget,
    renderer: &R,
    notifier: &N,
) -> Result<(), ExportError> {
    let result = match capture_png(target, renderer).await {
        Ok(png) => save_bytes_as_file(
            &target.document,
            &target.config.capture.file_name,
            "image/png",
            &png,
        )
        .map_err(ExportError::from),
        Err(e) => Err(e),
    };
    match &result {
        Ok(()) => log("Download triggered"),
        Err(e) => {
            warn(&format!("Error generating image: {e}"));
            notifier.notify(EXPORT_FAILED_MESSAGE);
        }
    }
    result
}

/// One export run against the shared state. Clears the selection first so
/// it does not show up in the image. Returns `Busy` without touching
/// anything when another run has not finished yet.
pub async fn run_export<R: RasterRenderer, N: Notifier>(
    state: &Rc<RefCell<State>>,
    renderer: &R,
    notifier: &N,
) -> Result<(), ExportError> {
    let target = {
        let mut s = state.borrow_mut();
        if s.exporting {
            return Err(ExportError::Busy);
        }
        if let Some(item) = s.session.clear_selection() {
            log(&format!("Selection cleared: {item}"));
        }
        s.sync_marks();
        match ExportTarget::locate(&s.window, &s.document, &s.config) {
            Ok(t) => t,
            Err(e) => {
                warn(&format!("Cannot export: {e}"));
                notifier.notify(EXPORT_FAILED_MESSAGE);
                return Err(e);
            }
        }
    };
    state.borrow_mut().exporting = true;
    let result = export_snapshot(&target, renderer, notifier).await;
    state.borrow_mut().exporting = false;
    result
}

/// Export button handler.
pub async fn export_tier_list(state: Rc<RefCell<State>>) {
    let notifier = WindowAlert(state.borrow().window.clone());
    match run_export(&state, &Html2Canvas, &notifier).await {
        Err(ExportError::Busy) => log("Export already in progress"),
        Err(e) => log(&format!("Export failed: {e}")),
        Ok(()) => {}
    }
}
