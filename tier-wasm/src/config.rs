use serde::Deserialize;
use snapshot_core::CaptureConfig;

/// Where the host markup lives and how to snapshot it. Hosts may override
/// any field through `window.__TIER_LIST_CONFIG`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub item_selector: String,
    pub zone_selector: String,
    /// Dropzone id of the bank. A dropzone without an id is the bank too.
    pub bank_id: String,
    pub tiers_container_id: String,
    pub app_selector: String,
    pub save_button_id: String,
    pub image_selector: String,
    pub label_selector: String,
    pub debug: bool,
    pub capture: CaptureConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            item_selector: ".item".to_string(),
            zone_selector: ".dropzone".to_string(),
            bank_id: "item-bank".to_string(),
            tiers_container_id: "tiers-container".to_string(),
            app_selector: ".tier-list-app".to_string(),
            save_button_id: "save-button".to_string(),
            image_selector: "img".to_string(),
            label_selector: ".item-label, span, p".to_string(),
            debug: false,
            capture: CaptureConfig::default(),
        }
    }
}

impl HostConfig {
    /// Parse host overrides given as JSON; missing fields keep defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
