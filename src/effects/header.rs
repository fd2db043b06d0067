use web_sys::{Document, Element, Event, Window};

use crate::config::PageConfig;
use crate::listener::Listener;

pub fn is_scrolled(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

fn apply(window: &Window, header: &Element, threshold: f64) {
    let offset = window.page_y_offset().unwrap_or(0.0);
    let _ = header
        .class_list()
        .toggle_with_force("scrolled", is_scrolled(offset, threshold));
}

/// Toggles `scrolled` on the page `header` as the window scrolls.
pub fn mount(window: &Window, document: &Document, config: &PageConfig) -> Option<Listener> {
    let header = document.query_selector("header").ok().flatten()?;
    let threshold = config.header_threshold;
    apply(window, &header, threshold);

    let win = window.clone();
    Listener::new(window, "scroll", move |_: Event| apply(&win, &header, threshold))
}
