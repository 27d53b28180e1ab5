use snapshot_core::RenderOptions;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, HtmlElement, Window};

use crate::export::ExportError;
use crate::utils::describe;

#[wasm_bindgen]
extern "C" {
    /// Provided by the host page.
    #[wasm_bindgen(catch, js_name = html2canvas)]
    fn html2canvas_js(element: &HtmlElement, options: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

/// Turns an attached DOM subtree into a canvas.
#[allow(async_fn_in_trait)]
pub trait RasterRenderer {
    async fn render(
        &self,
        element: &HtmlElement,
        options: &RenderOptions,
    ) -> Result<HtmlCanvasElement, ExportError>;
}

/// Shows the user a failure message.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// The global `html2canvas` function.
pub struct Html2Canvas;

impl RasterRenderer for Html2Canvas {
    async fn render(
        &self,
        element: &HtmlElement,
        options: &RenderOptions,
    ) -> Result<HtmlCanvasElement, ExportError> {
        let opts = js_sys::JSON::parse(&options.to_json()?)?;
        let promise =
            html2canvas_js(element, &opts).map_err(|e| ExportError::Render(describe(&e)))?;
        let value = JsFuture::from(promise)
            .await
            .map_err(|e| ExportError::Render(describe(&e)))?;
        value
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| ExportError::Render("renderer did not return a canvas".to_string()))
    }
}

/// `window.alert`.
pub struct WindowAlert(pub Window);

impl Notifier for WindowAlert {
    fn notify(&self, message: &str) {
        let _ = self.0.alert_with_message(message);
    }
}
