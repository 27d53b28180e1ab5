use serde::{Deserialize, Serialize};

/// Width used when the host layout sets no pixel `max-width`.
pub const DEFAULT_TARGET_WIDTH: u32 = 1000;
/// Supersampling factor handed to the renderer.
pub const DEFAULT_SCALE: f64 = 2.0;
pub const DEFAULT_IMAGE_TIMEOUT_MS: u32 = 15_000;
pub const DEFAULT_FILE_NAME: &str = "tier-list.png";

/// Settings for one snapshot. Every field has a default, so hosts only
/// need to override what differs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub fallback_width: u32,
    pub scale: f64,
    pub image_timeout_ms: u32,
    /// Horizontal offset that keeps the copy out of view.
    pub offscreen_left_px: i32,
    pub background: String,
    pub zone_border: String,
    pub zone_background: String,
    pub item: ItemBox,
    pub file_name: String,
    /// Forwarded to the renderer's own console output.
    pub logging: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            fallback_width: DEFAULT_TARGET_WIDTH,
            scale: DEFAULT_SCALE,
            image_timeout_ms: DEFAULT_IMAGE_TIMEOUT_MS,
            offscreen_left_px: -9999,
            background: "#ffffff".to_string(),
            zone_border: "1px solid #eee".to_string(),
            zone_background: "#fdfdfd".to_string(),
            item: ItemBox::default(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            logging: false,
        }
    }
}

/// Fixed geometry of one item in the snapshot (CSS pixels).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemBox {
    pub width: u32,
    pub height: u32,
    pub image: u32,
    pub label_height: u32,
    pub font_size: u32,
    pub padding: u32,
    pub gap: u32,
}

impl Default for ItemBox {
    fn default() -> Self {
        ItemBox {
            width: 100,
            height: 124,
            image: 80,
            label_height: 30,
            font_size: 12,
            padding: 4,
            gap: 2,
        }
    }
}
