use snapshot_core::Raster;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::export::ExportError;

/// Read the full RGBA contents of a rendered canvas.
pub fn read_raster(canvas: &HtmlCanvasElement) -> Result<Raster, ExportError> {
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| ExportError::Canvas("2D context not available".to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| ExportError::Canvas("unexpected context type".to_string()))?;
    let (w, h) = (canvas.width(), canvas.height());
    if w == 0 || h == 0 {
        return Err(ExportError::Canvas(format!("renderer returned an empty canvas ({w}x{h})")));
    }
    let data = ctx.get_image_data(0.0, 0.0, w as f64, h as f64)?;
    Ok(Raster::new(w, h, data.data().0)?)
}
