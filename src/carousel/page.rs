use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::{Interval, Timeout};
use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlElement, ScrollBehavior, ScrollToOptions, VisibilityState,
    Window,
};

use super::coordinator::{CarouselEvent, CarouselHost, Coordinator};
use super::geometry::{Geometry, ScrollMetrics};
use crate::config::{self, CarouselConfig};
use crate::listener::{elements, Listener};

type Shared = Rc<RefCell<Coordinator<DomCarousel>>>;
type WeakShared = Weak<RefCell<Coordinator<DomCarousel>>>;

/// Cancelled on drop by gloo-timers.
#[allow(dead_code)]
pub enum DomTimer {
    Repeating(Interval),
    OneShot(Timeout),
}

/// The testimonial strip as found in the document.
pub struct DomCarousel {
    document: Document,
    strip: Element,
    prev: HtmlElement,
    next: HtmlElement,
    indicators: Vec<Element>,
    coordinator: WeakShared,
}

impl DomCarousel {
    fn smooth_scroll(&self, left: f64, relative: bool) {
        let options = ScrollToOptions::new();
        options.set_left(left);
        options.set_behavior(ScrollBehavior::Smooth);
        if relative {
            self.strip.scroll_by_with_scroll_to_options(&options);
        } else {
            self.strip.scroll_to_with_scroll_to_options(&options);
        }
    }
}

fn paint_control(control: &HtmlElement, enabled: bool) {
    let (opacity, pointer) = if enabled { ("1", "auto") } else { ("0.5", "none") };
    let style = control.style();
    let _ = style.set_property("opacity", opacity);
    let _ = style.set_property("pointer-events", pointer);
}

fn dispatch(coordinator: &WeakShared, event: CarouselEvent) {
    let Some(coordinator) = coordinator.upgrade() else {
        return;
    };
    match coordinator.try_borrow_mut() {
        Ok(mut coordinator) => coordinator.handle(event),
        Err(_) => debug!("Carousel busy, dropping {:?}", event),
    };
}

impl CarouselHost for DomCarousel {
    type Timer = DomTimer;

    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_left: self.strip.scroll_left() as f64,
            scroll_width: self.strip.scroll_width() as f64,
            client_width: self.strip.client_width() as f64,
        }
    }

    fn scroll_to(&mut self, left: f64) {
        self.smooth_scroll(left, false);
    }

    fn scroll_by(&mut self, delta: f64) {
        self.smooth_scroll(delta, true);
    }

    fn mark_active(&mut self, index: usize) {
        for (i, indicator) in self.indicators.iter().enumerate() {
            let _ = indicator.class_list().toggle_with_force("active", i == index);
        }
    }

    fn set_controls(&mut self, prev_enabled: bool, next_enabled: bool) {
        paint_control(&self.prev, prev_enabled);
        paint_control(&self.next, next_enabled);
    }

    fn document_visible(&self) -> bool {
        self.document.visibility_state() == VisibilityState::Visible
    }

    fn every(&mut self, millis: u32) -> DomTimer {
        let coordinator = self.coordinator.clone();
        DomTimer::Repeating(Interval::new(millis, move || {
            dispatch(&coordinator, CarouselEvent::Tick)
        }))
    }

    fn after(&mut self, millis: u32) -> DomTimer {
        let coordinator = self.coordinator.clone();
        DomTimer::OneShot(Timeout::new(millis, move || {
            dispatch(&coordinator, CarouselEvent::QuietPeriodElapsed)
        }))
    }
}

/// Keeps the coordinator and its event registrations alive.
pub struct CarouselHandle {
    _coordinator: Shared,
    _listeners: Vec<Listener>,
}

fn html(document: &Document, selector: &str) -> Option<HtmlElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

/// Wires the testimonial carousel, or returns `None` when the page has no
/// complete carousel (strip, both controls and at least one card).
pub fn mount(window: &Window, document: &Document) -> Option<CarouselHandle> {
    let strip = document.query_selector(".testimonial-cards").ok().flatten()?;
    let prev = html(document, ".carousel-btn-prev")?;
    let next = html(document, ".carousel-btn-next")?;
    let indicators = elements(document.query_selector_all(".indicator-btn"));
    let cards = elements(document.query_selector_all(".testimonials .card")).len();

    let config: CarouselConfig = config::from_attribute(&strip, "data-carousel");
    let geometry = Geometry::new(config.card_width, config.gap, cards)?;
    debug!(
        "Carousel with {} cards, {} indicators, step {}px",
        cards,
        indicators.len(),
        geometry.step()
    );

    let coordinator: Shared = Rc::new_cyclic(|weak: &WeakShared| {
        let host = DomCarousel {
            document: document.clone(),
            strip: strip.clone(),
            prev: prev.clone(),
            next: next.clone(),
            indicators: indicators.clone(),
            coordinator: weak.clone(),
        };
        RefCell::new(Coordinator::new(host, geometry, config))
    });

    let weak = Rc::downgrade(&coordinator);
    let on = |event: CarouselEvent| {
        let weak = weak.clone();
        move |_: Event| dispatch(&weak, event)
    };

    let mut listeners: Vec<Listener> = [
        Listener::new(&prev, "click", on(CarouselEvent::PrevPressed)),
        Listener::new(&next, "click", on(CarouselEvent::NextPressed)),
        Listener::new(&strip, "mouseenter", on(CarouselEvent::PointerEntered)),
        Listener::new(&strip, "mouseleave", on(CarouselEvent::PointerLeft)),
        Listener::new(&strip, "wheel", on(CarouselEvent::ManualGesture)),
        Listener::new(&strip, "touchstart", on(CarouselEvent::ManualGesture)),
        Listener::new(&strip, "scroll", on(CarouselEvent::Scrolled)),
        Listener::new(window, "resize", on(CarouselEvent::Resized)),
        Listener::new(document, "visibilitychange", on(CarouselEvent::VisibilityChanged)),
    ]
    .into_iter()
    .flatten()
    .collect();

    listeners.extend(indicators.iter().enumerate().filter_map(|(index, indicator)| {
        Listener::new(indicator, "click", on(CarouselEvent::IndicatorPressed(index)))
    }));

    coordinator.borrow_mut().start();

    Some(CarouselHandle {
        _coordinator: coordinator,
        _listeners: listeners,
    })
}
