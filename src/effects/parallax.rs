use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, Window};

use crate::config::PageConfig;
use crate::listener::Listener;

/// Vertical shift of the hero image, only while the hero is still on screen.
pub fn shift_for(scrolled: f64, viewport_height: f64, rate: f64) -> Option<f64> {
    (scrolled < viewport_height).then(|| scrolled * rate)
}

pub fn transform(shift: f64) -> String {
    format!("translateY({}px)", shift)
}

pub fn mount(window: &Window, document: &Document, config: &PageConfig) -> Option<Listener> {
    let image = document
        .query_selector(".hero-image img")
        .ok()
        .flatten()?
        .dyn_into::<HtmlElement>()
        .ok()?;
    let rate = config.parallax_rate;

    let win = window.clone();
    Listener::new(window, "scroll", move |_: Event| {
        let scrolled = win.page_y_offset().unwrap_or(0.0);
        let height = win
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0);
        if let Some(shift) = shift_for(scrolled, height, rate) {
            let _ = image.style().set_property("transform", &transform(shift));
        }
    })
}
