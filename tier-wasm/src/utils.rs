use std::cell::Cell;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlElement, Window};

use crate::config::HostConfig;
use crate::constants::HOST_CONFIG_GLOBAL;

thread_local! {
    static VERBOSE: Cell<bool> = const { Cell::new(false) };
}

pub fn set_verbose(on: bool) {
    VERBOSE.with(|v| v.set(on));
}

/// Log a message to the browser console when debug output is on.
pub fn log(s: &str) {
    if VERBOSE.with(Cell::get) {
        web_sys::console::log_1(&JsValue::from_str(s));
    }
}

/// Always-on console warning.
pub fn warn(s: &str) {
    web_sys::console::warn_1(&JsValue::from_str(s));
}

/// Best-effort text for a thrown JS value.
pub fn describe(v: &JsValue) -> String {
    if let Some(s) = v.as_string() {
        return s;
    }
    if let Some(e) = v.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    format!("{v:?}")
}

/// Read `window.__TIER_LIST_CONFIG`, set by the host page, and merge it
/// over the defaults. `?debug=1` in the page URL forces debug output on.
pub fn read_host_config(window: &Window) -> HostConfig {
    let mut config = js_sys::Reflect::get(window, &JsValue::from_str(HOST_CONFIG_GLOBAL))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
        .and_then(|v| js_sys::JSON::stringify(&v).ok())
        .and_then(|s| s.as_string())
        .map(|text| match HostConfig::from_json(&text) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn(&format!("Ignoring invalid {HOST_CONFIG_GLOBAL}: {e}"));
                HostConfig::default()
            }
        })
        .unwrap_or_default();
    if let Ok(search) = window.location().search()
        && let Some(v) = get_query_param(&search, "debug")
    {
        config.debug = matches!(v.as_str(), "1" | "true" | "on");
    }
    if config.debug {
        config.capture.logging = true;
    }
    config
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}

/// Offer `bytes` to the user as a file download.
pub fn save_bytes_as_file(
    document: &Document,
    filename: &str,
    mime: &str,
    bytes: &[u8],
) -> Result<(), JsValue> {
    let array = js_sys::Array::new();
    array.push(&js_sys::Uint8Array::from(bytes));
    let props = BlobPropertyBag::new();
    props.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&array, &props)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    let a = document.create_element("a")?.dyn_into::<HtmlElement>()?;
    a.set_attribute("href", &url)?;
    a.set_attribute("download", filename)?;
    a.click();
    web_sys::Url::revoke_object_url(&url)?;
    Ok(())
}
