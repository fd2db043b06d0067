/// Fixed layout of the card strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    step: f64,
    card_count: usize,
}

/// Live scroll state of the strip, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_left: f64,
    pub scroll_width: f64,
    pub client_width: f64,
}

impl ScrollMetrics {
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub active: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl Geometry {
    /// Returns `None` for an empty strip or a non-positive step.
    pub fn new(card_width: f64, gap: f64, card_count: usize) -> Option<Self> {
        let step = card_width + gap;
        if card_count == 0 || step.is_nan() || step <= 0.0 {
            return None;
        }
        Some(Self { step, card_count })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn card_count(&self) -> usize {
        self.card_count
    }

    pub fn last_index(&self) -> usize {
        self.card_count - 1
    }

    pub fn offset_of(&self, index: usize) -> f64 {
        index as f64 * self.step
    }

    /// Nearest card to `offset`, clamped to the strip.
    pub fn index_at(&self, offset: f64) -> usize {
        let raw = (offset / self.step).round();
        if raw.is_nan() || raw <= 0.0 {
            return 0;
        }
        (raw as usize).min(self.last_index())
    }

    /// Index after one step forward, wrapping past the last card.
    pub fn following(&self, index: usize) -> usize {
        (index + 1) % self.card_count
    }

    pub fn controls(&self, metrics: &ScrollMetrics, tolerance: f64) -> ControlState {
        ControlState {
            active: self.index_at(metrics.scroll_left),
            prev_enabled: metrics.scroll_left > tolerance,
            next_enabled: metrics.scroll_left < metrics.max_scroll() - tolerance,
        }
    }
}
