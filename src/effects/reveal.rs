use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::js_sys::Reflect;
use web_sys::Window;

use crate::config::RevealConfig;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = AOS, js_name = init)]
    fn aos_init(options: &JsValue) -> Result<(), JsValue>;
}

fn library_loaded(window: &Window) -> bool {
    Reflect::get(window, &JsValue::from_str("AOS"))
        .map(|aos| !aos.is_undefined() && !aos.is_null())
        .unwrap_or(false)
}

/// Starts the animate-on-scroll library when the page ships it.
pub fn init(window: &Window, config: &RevealConfig) -> bool {
    if !library_loaded(window) {
        return false;
    }
    let options = match serde_wasm_bindgen::to_value(config) {
        Ok(options) => options,
        Err(e) => {
            warn!("Failed to build AOS options: {}", e);
            return false;
        }
    };
    match aos_init(&options) {
        Ok(()) => true,
        Err(e) => {
            warn!("AOS.init failed: {:?}", e);
            false
        }
    }
}
