use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Number};
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    Window,
};

use crate::config::PageConfig;
use crate::listener::elements;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStyle {
    /// `98%`
    Percent,
    /// `1,500+`
    Plus,
}

/// A stat heading whose number counts up from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    pub end: u64,
    pub style: CounterStyle,
}

impl Counter {
    /// Recognises `N%` and `N+` (with optional thousands commas). Anything
    /// else, like `24-7`, is not animated.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (digits, style) = if let Some(digits) = text.strip_suffix('%') {
            (digits, CounterStyle::Percent)
        } else if let Some(digits) = text.strip_suffix('+') {
            (digits, CounterStyle::Plus)
        } else {
            return None;
        };
        let digits: String = digits.chars().filter(|c| *c != ',').collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let end = digits.parse().ok()?;
        Some(Self { end, style })
    }

    pub fn value_at(&self, elapsed: f64, duration: f64) -> u64 {
        (progress(elapsed, duration) * self.end as f64).floor() as u64
    }

    /// `localize` formats plus counters with the reader's digit grouping.
    pub fn render<F>(&self, value: u64, localize: F) -> String
    where
        F: FnOnce(u64) -> String,
    {
        match self.style {
            CounterStyle::Percent => format!("{}%", value),
            CounterStyle::Plus => format!("{}+", localize(value)),
        }
    }
}

pub fn progress(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

fn to_locale(window: &Window, value: u64) -> String {
    let locale = window.navigator().language().unwrap_or_else(|| "en-US".to_string());
    String::from(Number::from(value as f64).to_locale_string(&locale))
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn animate(window: &Window, element: Element, counter: Counter, duration: f64) {
    let frame: FrameCallback = Rc::new(RefCell::new(None));
    let next_frame = frame.clone();
    let win = window.clone();
    let mut started: Option<f64> = None;

    *frame.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        let start = *started.get_or_insert(timestamp);
        let elapsed = timestamp - start;
        let text = counter.render(counter.value_at(elapsed, duration), |v| to_locale(&win, v));
        element.set_text_content(Some(&text));

        if progress(elapsed, duration) < 1.0 {
            if let Some(callback) = next_frame.borrow().as_ref() {
                let _ = win.request_animation_frame(callback.as_ref().unchecked_ref());
            }
        } else {
            // breaks the Rc cycle so the closure is freed
            let _ = next_frame.borrow_mut().take();
        }
    }));

    if let Some(callback) = frame.borrow().as_ref() {
        let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
    };
}

/// Owns the observer watching `.stats`; disconnects on drop.
pub struct CountersHandle {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Drop for CountersHandle {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Counts the stat headings up once the stats section is half in view.
pub fn mount(window: &Window, document: &Document, config: &PageConfig) -> Option<CountersHandle> {
    let section = document.query_selector(".stats").ok().flatten()?;
    let duration = config.counter_duration_ms;
    let win = window.clone();

    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                for stat in elements(target.query_selector_all("h3")) {
                    let text = stat.text_content().unwrap_or_default();
                    if let Some(counter) = Counter::parse(&text) {
                        debug!("Animating stat {} to {}", text, counter.end);
                        animate(&win, stat, counter, duration);
                    }
                }
                observer.unobserve(&target);
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(config.stats_threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options).ok()?;
    observer.observe(&section);

    Some(CountersHandle {
        observer,
        _callback: callback,
    })
}
