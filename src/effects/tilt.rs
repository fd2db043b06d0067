use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, MouseEvent};

use crate::listener::{html_elements, Listener};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    /// `x`/`y` are the pointer position relative to the card's top-left.
    pub fn at(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            rotate_x: (y - height / 2.0) / 10.0,
            rotate_y: (width / 2.0 - x) / 10.0,
        }
    }

    pub fn transform(&self) -> String {
        format!(
            "perspective(1000px) rotateX({}deg) rotateY({}deg) translateY(-15px) scale(1.02)",
            self.rotate_x, self.rotate_y
        )
    }
}

fn tilt_card(card: &HtmlElement, event: &Event) {
    let Some(pointer) = event.dyn_ref::<MouseEvent>() else {
        return;
    };
    let rect = card.get_bounding_client_rect();
    let tilt = Tilt::at(
        pointer.client_x() as f64 - rect.left(),
        pointer.client_y() as f64 - rect.top(),
        rect.width(),
        rect.height(),
    );
    let _ = card.style().set_property("transform", &tilt.transform());
}

/// Hover tilt on every `.card`, reset when the pointer leaves.
pub fn mount(document: &Document) -> Option<Vec<Listener>> {
    let cards = html_elements(document.query_selector_all(".card"));
    if cards.is_empty() {
        return None;
    }
    let mut listeners = Vec::with_capacity(cards.len() * 2);
    for card in cards {
        let moved = card.clone();
        listeners.extend(Listener::new(&card, "mousemove", move |event: Event| {
            tilt_card(&moved, &event)
        }));
        let left = card.clone();
        listeners.extend(Listener::new(&card, "mouseleave", move |_: Event| {
            let _ = left.style().set_property("transform", "");
        }));
    }
    Some(listeners)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_is_flat() {
        let tilt = Tilt::at(190.0, 200.0, 380.0, 400.0);
        assert_eq!(tilt, Tilt { rotate_x: 0.0, rotate_y: 0.0 });
    }

    #[test]
    fn corners_lean_towards_pointer() {
        let top_left = Tilt::at(0.0, 0.0, 380.0, 400.0);
        assert_eq!(top_left.rotate_x, -20.0);
        assert_eq!(top_left.rotate_y, 19.0);

        let bottom_right = Tilt::at(380.0, 400.0, 380.0, 400.0);
        assert_eq!(bottom_right.rotate_x, 20.0);
        assert_eq!(bottom_right.rotate_y, -19.0);
    }

    #[test]
    fn transform_string() {
        let tilt = Tilt::at(0.0, 0.0, 200.0, 100.0);
        assert_eq!(
            tilt.transform(),
            "perspective(1000px) rotateX(-5deg) rotateY(10deg) translateY(-15px) scale(1.02)"
        );
    }
}
