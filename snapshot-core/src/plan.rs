use serde::Serialize;

use crate::config::{CaptureConfig, ItemBox};
use crate::error::SnapshotError;

/// CSS property/value pairs applied with `style.setProperty`.
pub type Declarations = Vec<(&'static str, String)>;

/// Resolve the capture width from a computed `max-width` value.
///
/// Only pixel lengths are honoured; `none`, empty values, percentages and
/// other units fall back to `fallback`.
pub fn resolve_target_width(max_width: &str, fallback: u32) -> u32 {
    let v = max_width.trim();
    let Some(num) = v.strip_suffix("px") else {
        return fallback;
    };
    match num.trim().parse::<f64>() {
        Ok(px) if px.is_finite() && px >= 1.0 => px.round().min(u32::MAX as f64) as u32,
        _ => fallback,
    }
}

/// Options for the DOM-to-raster renderer, serialized with the renderer's
/// own field names.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub background_color: String,
    pub logging: bool,
    #[serde(rename = "useCORS")]
    pub use_cors: bool,
    pub allow_taint: bool,
    pub width: u32,
    pub window_width: u32,
    pub scroll_x: i32,
    pub scroll_y: i32,
    pub scale: f64,
    pub image_timeout: u32,
}

impl RenderOptions {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Pixel width of the raster the renderer should return.
    pub fn output_width(&self) -> u32 {
        (self.width as f64 * self.scale).round() as u32
    }
}

/// Everything the browser side needs to take one snapshot: the target width,
/// the styles that normalize the detached copy, and the renderer options.
#[derive(Clone, Debug, PartialEq)]
pub struct CapturePlan {
    pub target_width: u32,
    pub root: Declarations,
    pub zone: Declarations,
    pub item: Declarations,
    pub image: Declarations,
    pub label: Declarations,
    pub options: RenderOptions,
}

impl CapturePlan {
    /// `max_width` and `padding` are computed style values read from the
    /// live page.
    pub fn new(config: &CaptureConfig, max_width: &str, padding: &str) -> Self {
        let target_width = resolve_target_width(max_width, config.fallback_width);
        CapturePlan {
            target_width,
            root: root_declarations(config, target_width, padding),
            zone: vec![
                ("border", config.zone_border.clone()),
                ("background-color", config.zone_background.clone()),
            ],
            item: item_declarations(&config.item),
            image: image_declarations(&config.item),
            label: label_declarations(&config.item),
            options: RenderOptions {
                background_color: config.background.clone(),
                logging: config.logging,
                use_cors: true,
                allow_taint: false,
                width: target_width,
                window_width: target_width,
                scroll_x: 0,
                scroll_y: 0,
                scale: config.scale,
                image_timeout: config.image_timeout_ms,
            },
        }
    }
}

fn px(v: impl std::fmt::Display) -> String {
    format!("{v}px")
}

fn root_declarations(config: &CaptureConfig, width: u32, padding: &str) -> Declarations {
    let mut out: Declarations = vec![
        ("position", "absolute".into()),
        ("left", px(config.offscreen_left_px)),
        ("top", px(0)),
        ("width", px(width)),
        ("height", "auto".into()),
        ("display", "block".into()),
        ("background-color", config.background.clone()),
        ("box-shadow", "none".into()),
    ];
    let padding = padding.trim();
    if !padding.is_empty() {
        out.push(("padding", padding.to_string()));
    }
    out
}

fn item_declarations(b: &ItemBox) -> Declarations {
    vec![
        ("box-sizing", "border-box".into()),
        ("width", px(b.width)),
        ("height", px(b.height)),
        ("padding", px(b.padding)),
        ("display", "flex".into()),
        ("flex-direction", "column".into()),
        ("align-items", "center".into()),
        ("justify-content", "flex-start".into()),
        ("gap", px(b.gap)),
        ("overflow", "hidden".into()),
    ]
}

fn image_declarations(b: &ItemBox) -> Declarations {
    vec![
        ("display", "block".into()),
        ("width", px(b.image)),
        ("height", px(b.image)),
        ("object-fit", "cover".into()),
        ("flex-shrink", "0".into()),
    ]
}

fn label_declarations(b: &ItemBox) -> Declarations {
    vec![
        ("display", "block".into()),
        ("width", "100%".into()),
        ("max-height", px(b.label_height)),
        ("font-size", px(b.font_size)),
        ("line-height", "1.2".into()),
        ("text-align", "center".into()),
        ("white-space", "normal".into()),
        ("word-wrap", "break-word".into()),
        ("overflow-wrap", "break-word".into()),
        ("overflow", "hidden".into()),
        ("text-overflow", "ellipsis".into()),
    ]
}
