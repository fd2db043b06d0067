use std::cell::RefCell;

use log::{debug, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

mod config;
mod listener;
mod carousel {
    pub mod coordinator;
    pub mod geometry;
    pub mod page;
}
mod effects {
    pub mod anchors;
    pub mod counters;
    pub mod header;
    pub mod parallax;
    pub mod reveal;
    pub mod tilt;
}

use carousel::page::CarouselHandle;
use config::PageConfig;
use effects::counters::CountersHandle;
use listener::Listener;

/// Everything mounted on the page, kept alive until navigation.
#[allow(dead_code)]
struct Page {
    header: Option<Listener>,
    anchors: Option<Vec<Listener>>,
    counters: Option<CountersHandle>,
    parallax: Option<Listener>,
    tilt: Option<Vec<Listener>>,
    carousel: Option<CarouselHandle>,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = RefCell::new(None);
}

fn report<T>(feature: &str, handle: Option<T>) -> Option<T> {
    match handle {
        Some(_) => info!("Mounted {}", feature),
        None => debug!("No {} on this page", feature),
    }
    handle
}

fn still_loading(ready_state: &str) -> bool {
    ready_state == "loading"
}

fn mount_page() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    let page_config: PageConfig = document
        .body()
        .map(|body| config::from_attribute(&body, "data-page-fx"))
        .unwrap_or_default();

    if effects::reveal::init(&window, &page_config.reveal) {
        info!("Mounted reveal animations");
    }

    let page = Page {
        header: report("header", effects::header::mount(&window, &document, &page_config)),
        anchors: report("anchor scrolling", effects::anchors::mount(&document)),
        counters: report("stat counters", effects::counters::mount(&window, &document, &page_config)),
        parallax: report("hero parallax", effects::parallax::mount(&window, &document, &page_config)),
        tilt: report("card tilt", effects::tilt::mount(&document)),
        carousel: report("testimonial carousel", carousel::page::mount(&window, &document)),
    };

    PAGE.with(|slot| *slot.borrow_mut() = Some(page));
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting page effects");

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if still_loading(&document.ready_state()) {
        let ready = Closure::once_into_js(mount_page);
        let _ = document.add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref());
    } else {
        mount_page();
    }
}
