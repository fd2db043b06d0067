use log::debug;
use web_sys::{Document, Event, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::listener::{elements, Listener};

/// Selector for an in-page link, `None` for a bare `#`.
pub fn target_selector(href: &str) -> Option<&str> {
    let href = href.trim();
    (href.len() > 1 && href.starts_with('#')).then_some(href)
}

fn scroll_to_target(document: &Document, href: &str) {
    let Some(selector) = target_selector(href) else {
        return;
    };
    // ids like "#1st" are not valid selectors, query_selector errors on those
    match document.query_selector(selector) {
        Ok(Some(target)) => {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            target.scroll_into_view_with_scroll_into_view_options(&options);
        }
        Ok(None) => debug!("No anchor target for {}", selector),
        Err(_) => debug!("Invalid anchor selector {}", selector),
    }
}

/// Smooth-scrolls every `a[href^="#"]` to its target instead of jumping.
pub fn mount(document: &Document) -> Option<Vec<Listener>> {
    let anchors = elements(document.query_selector_all(r##"a[href^="#"]"##));
    if anchors.is_empty() {
        return None;
    }
    let listeners = anchors
        .into_iter()
        .filter_map(|anchor| {
            let document = document.clone();
            let link = anchor.clone();
            Listener::new(&anchor, "click", move |event: Event| {
                event.prevent_default();
                if let Some(href) = link.get_attribute("href") {
                    scroll_to_target(&document, &href);
                }
            })
        })
        .collect();
    Some(listeners)
}
