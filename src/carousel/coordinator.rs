use log::debug;

use super::geometry::{Geometry, ScrollMetrics};
use crate::config::CarouselConfig;

/// What the coordinator needs from the page.
///
/// Timers are cancelled by dropping their handle, the way gloo-timers
/// handles behave. `every` must deliver [`CarouselEvent::Tick`] and `after`
/// must deliver [`CarouselEvent::QuietPeriodElapsed`] back to the
/// coordinator that armed them.
pub trait CarouselHost {
    type Timer;

    fn metrics(&self) -> ScrollMetrics;
    fn scroll_to(&mut self, left: f64);
    fn scroll_by(&mut self, delta: f64);
    fn mark_active(&mut self, index: usize);
    fn set_controls(&mut self, prev_enabled: bool, next_enabled: bool);
    fn document_visible(&self) -> bool;
    fn every(&mut self, millis: u32) -> Self::Timer;
    fn after(&mut self, millis: u32) -> Self::Timer;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselEvent {
    PrevPressed,
    NextPressed,
    IndicatorPressed(usize),
    PointerEntered,
    PointerLeft,
    /// Wheel or touch on the strip.
    ManualGesture,
    Scrolled,
    Resized,
    VisibilityChanged,
    Tick,
    QuietPeriodElapsed,
}

pub struct Coordinator<H: CarouselHost> {
    host: H,
    geometry: Geometry,
    config: CarouselConfig,
    hovering: bool,
    automation: Option<H::Timer>,
    quiet: Option<H::Timer>,
}

impl<H: CarouselHost> Coordinator<H> {
    pub fn new(host: H, geometry: Geometry, config: CarouselConfig) -> Self {
        Self {
            host,
            geometry,
            config,
            hovering: false,
            automation: None,
            quiet: None,
        }
    }

    /// Initial sync and first arming of the automation timer.
    pub fn start(&mut self) {
        self.refresh_control_state();
        self.start_automation();
    }

    pub fn handle(&mut self, event: CarouselEvent) {
        match event {
            CarouselEvent::PrevPressed => self.go_prev(),
            CarouselEvent::NextPressed => self.go_next(),
            CarouselEvent::IndicatorPressed(index) => self.select_indicator(index),
            CarouselEvent::PointerEntered => {
                self.hovering = true;
                self.stop_automation();
            }
            CarouselEvent::PointerLeft => {
                self.hovering = false;
                self.refresh_control_state();
                self.start_automation();
            }
            CarouselEvent::ManualGesture => self.suspend(),
            CarouselEvent::Scrolled => {
                if !self.is_interacting() {
                    self.refresh_control_state();
                }
            }
            CarouselEvent::Resized => {
                self.refresh_control_state();
                self.stop_automation();
                self.start_automation();
            }
            CarouselEvent::VisibilityChanged => {
                if self.host.document_visible() {
                    self.start_automation();
                } else {
                    self.stop_automation();
                }
            }
            CarouselEvent::Tick => self.tick(),
            CarouselEvent::QuietPeriodElapsed => {
                self.quiet = None;
                // scroll events were ignored during the quiet period
                self.refresh_control_state();
                self.start_automation();
            }
        }
    }

    pub fn is_interacting(&self) -> bool {
        self.hovering || self.quiet.is_some()
    }

    #[cfg(test)]
    pub fn is_automating(&self) -> bool {
        self.automation.is_some()
    }

    pub fn current_index(&self) -> usize {
        self.geometry.index_at(self.host.metrics().scroll_left)
    }

    pub fn scroll_to_index(&mut self, index: usize) {
        self.host.scroll_to(self.geometry.offset_of(index));
    }

    pub fn go_prev(&mut self) {
        self.suspend();
        let metrics = self.host.metrics();
        let target = self.current_index().saturating_sub(1);
        self.host.scroll_by(-self.geometry.step());
        self.host.mark_active(target);
        self.paint_controls_at(metrics, metrics.scroll_left - self.geometry.step());
    }

    pub fn go_next(&mut self) {
        self.suspend();
        let metrics = self.host.metrics();
        let current = self.current_index();
        if current == self.geometry.last_index() {
            self.host.scroll_to(0.0);
            self.host.mark_active(0);
            self.paint_controls_at(metrics, 0.0);
        } else {
            self.host.scroll_by(self.geometry.step());
            self.host.mark_active(current + 1);
            self.paint_controls_at(metrics, metrics.scroll_left + self.geometry.step());
        }
    }

    pub fn select_indicator(&mut self, index: usize) {
        if index >= self.geometry.card_count() {
            debug!("Ignoring indicator {} outside the strip", index);
            return;
        }
        self.suspend();
        let metrics = self.host.metrics();
        self.scroll_to_index(index);
        self.host.mark_active(index);
        self.paint_controls_at(metrics, self.geometry.offset_of(index));
    }

    /// Enables prev/next for where a smooth scroll will land, since the
    /// scroll events on the way are ignored while interacting.
    fn paint_controls_at(&mut self, metrics: ScrollMetrics, target: f64) {
        let landing = ScrollMetrics {
            scroll_left: target.clamp(0.0, metrics.max_scroll()),
            ..metrics
        };
        let state = self.geometry.controls(&landing, self.config.edge_tolerance);
        self.host.set_controls(state.prev_enabled, state.next_enabled);
    }

    pub fn refresh_control_state(&mut self) {
        let metrics = self.host.metrics();
        let state = self.geometry.controls(&metrics, self.config.edge_tolerance);
        self.host.mark_active(state.active);
        self.host.set_controls(state.prev_enabled, state.next_enabled);
    }

    /// Re-arms the repeating timer when automation is allowed, otherwise
    /// leaves it stopped. The old handle is always dropped first.
    pub fn start_automation(&mut self) {
        self.stop_automation();
        if self.is_interacting() || !self.host.document_visible() {
            return;
        }
        debug!("Carousel automation armed every {}ms", self.config.tick_ms);
        self.automation = Some(self.host.every(self.config.tick_ms));
    }

    pub fn stop_automation(&mut self) {
        if self.automation.take().is_some() {
            debug!("Carousel automation stopped");
        }
    }

    fn suspend(&mut self) {
        self.stop_automation();
        self.quiet = None;
        self.quiet = Some(self.host.after(self.config.quiet_period_ms));
    }

    fn tick(&mut self) {
        if self.is_interacting() || !self.host.document_visible() {
            return;
        }
        let next = self.geometry.following(self.current_index());
        if next == 0 {
            // absolute reset avoids drift from accumulated relative steps
            self.host.scroll_to(0.0);
        } else {
            self.scroll_to_index(next);
        }
        self.host.mark_active(next);
    }

    #[cfg(test)]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[cfg(test)]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Repeating,
        OneShot,
    }

    struct MockTimer {
        id: u64,
        live: Rc<RefCell<Vec<(u64, Kind)>>>,
    }

    impl Drop for MockTimer {
        fn drop(&mut self) {
            self.live.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }

    struct MockHost {
        left: f64,
        scroll_width: f64,
        client_width: f64,
        visible: bool,
        indicators: Vec<bool>,
        prev_enabled: bool,
        next_enabled: bool,
        live: Rc<RefCell<Vec<(u64, Kind)>>>,
        next_id: u64,
        armed_intervals: Vec<u32>,
    }

    impl MockHost {
        fn new(cards: usize) -> Self {
            Self {
                left: 0.0,
                scroll_width: cards as f64 * 412.0 - 32.0,
                client_width: 380.0,
                visible: true,
                indicators: vec![false; cards],
                prev_enabled: true,
                next_enabled: true,
                live: Rc::new(RefCell::new(Vec::new())),
                next_id: 0,
                armed_intervals: Vec::new(),
            }
        }

        fn clamp(&self, left: f64) -> f64 {
            left.max(0.0).min(self.metrics().max_scroll())
        }

        fn active(&self) -> Vec<usize> {
            self.indicators
                .iter()
                .enumerate()
                .filter(|(_, on)| **on)
                .map(|(i, _)| i)
                .collect()
        }

        fn live_of(&self, kind: Kind) -> usize {
            self.live.borrow().iter().filter(|(_, k)| *k == kind).count()
        }

        fn arm(&mut self, kind: Kind) -> MockTimer {
            self.next_id += 1;
            self.live.borrow_mut().push((self.next_id, kind));
            MockTimer {
                id: self.next_id,
                live: self.live.clone(),
            }
        }
    }

    impl CarouselHost for MockHost {
        type Timer = MockTimer;

        fn metrics(&self) -> ScrollMetrics {
            ScrollMetrics {
                scroll_left: self.left,
                scroll_width: self.scroll_width,
                client_width: self.client_width,
            }
        }

        fn scroll_to(&mut self, left: f64) {
            self.left = self.clamp(left);
        }

        fn scroll_by(&mut self, delta: f64) {
            self.left = self.clamp(self.left + delta);
        }

        fn mark_active(&mut self, index: usize) {
            for (i, on) in self.indicators.iter_mut().enumerate() {
                *on = i == index;
            }
        }

        fn set_controls(&mut self, prev_enabled: bool, next_enabled: bool) {
            self.prev_enabled = prev_enabled;
            self.next_enabled = next_enabled;
        }

        fn document_visible(&self) -> bool {
            self.visible
        }

        fn every(&mut self, millis: u32) -> MockTimer {
            self.armed_intervals.push(millis);
            self.arm(Kind::Repeating)
        }

        fn after(&mut self, _millis: u32) -> MockTimer {
            self.arm(Kind::OneShot)
        }
    }

    fn carousel(cards: usize) -> Coordinator<MockHost> {
        let geometry = Geometry::new(380.0, 32.0, cards).unwrap();
        let mut c = Coordinator::new(MockHost::new(cards), geometry, CarouselConfig::default());
        c.start();
        c
    }

    #[test]
    fn start_syncs_controls_and_arms_one_timer() {
        let c = carousel(5);
        assert_eq!(c.host().active(), vec![0]);
        assert!(!c.host().prev_enabled);
        assert!(c.host().next_enabled);
        assert_eq!(c.host().live_of(Kind::Repeating), 1);
        assert_eq!(c.host().armed_intervals, vec![1000]);
    }

    #[test]
    fn scroll_to_index_aligns_every_card() {
        let mut c = carousel(5);
        for i in 0..5 {
            c.scroll_to_index(i);
            assert_eq!(c.host().left, i as f64 * 412.0);
            assert_eq!(c.current_index(), i);
        }
    }

    #[test]
    fn go_next_steps_one_card_at_a_time() {
        let mut c = carousel(5);
        let mut offsets = Vec::new();
        let mut actives = Vec::new();
        for _ in 0..3 {
            c.go_next();
            offsets.push(c.host().left);
            actives.push(c.host().active());
        }
        assert_eq!(offsets, vec![412.0, 824.0, 1236.0]);
        assert_eq!(actives, vec![vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn go_next_from_last_card_wraps_to_start() {
        let mut c = carousel(5);
        c.scroll_to_index(4);
        c.go_next();
        assert_eq!(c.host().left, 0.0);
        assert_eq!(c.host().active(), vec![0]);
    }

    #[test]
    fn go_prev_stays_at_first_card() {
        let mut c = carousel(5);
        c.go_prev();
        assert_eq!(c.host().left, 0.0);
        assert_eq!(c.host().active(), vec![0]);

        c.scroll_to_index(2);
        c.go_prev();
        assert_eq!(c.host().left, 412.0);
        assert_eq!(c.host().active(), vec![1]);
    }

    #[test]
    fn clicks_suspend_until_quiet_period_elapses() {
        let mut c = carousel(5);
        c.handle(CarouselEvent::NextPressed);
        assert!(c.is_interacting());
        assert!(!c.is_automating());
        assert_eq!(c.host().live_of(Kind::Repeating), 0);

        let before = c.host().left;
        c.handle(CarouselEvent::Tick);
        assert_eq!(c.host().left, before);

        c.handle(CarouselEvent::QuietPeriodElapsed);
        assert!(!c.is_interacting());
        assert_eq!(c.host().live_of(Kind::Repeating), 1);
        assert_eq!(c.host().live_of(Kind::OneShot), 0);
    }

    #[test]
    fn repeated_clicks_keep_a_single_quiet_period() {
        let mut c = carousel(5);
        c.handle(CarouselEvent::NextPressed);
        c.handle(CarouselEvent::NextPressed);
        c.handle(CarouselEvent::IndicatorPressed(1));
        assert_eq!(c.host().live_of(Kind::OneShot), 1);
        assert_eq!(c.host().active(), vec![1]);
        assert_eq!(c.host().left, 412.0);
    }

    #[test]
    fn indicator_outside_strip_is_ignored() {
        let mut c = carousel(3);
        c.handle(CarouselEvent::IndicatorPressed(7));
        assert!(!c.is_interacting());
        assert_eq!(c.host().active(), vec![0]);
        assert_eq!(c.host().live_of(Kind::Repeating), 1);
    }

    #[test]
    fn tick_advances_and_wraps_from_last_card() {
        let mut c = carousel(5);
        c.handle(CarouselEvent::Tick);
        assert_eq!(c.host().left, 412.0);
        assert_eq!(c.host().active(), vec![1]);

        c.scroll_to_index(4);
        c.handle(CarouselEvent::Tick);
        assert_eq!(c.host().left, 0.0);
        assert_eq!(c.host().active(), vec![0]);
    }

    #[test]
    fn tick_realigns_after_drifted_offset() {
        let mut c = carousel(5);
        c.host_mut().left = 1647.3;
        c.handle(CarouselEvent::Tick);
        assert_eq!(c.host().left, 0.0);

        c.host_mut().left = 410.6;
        c.handle(CarouselEvent::Tick);
        assert_eq!(c.host().left, 824.0);
    }

    #[test]
    fn hover_clears_timer_until_pointer_leaves() {
        let mut c = carousel(5);
        c.handle(CarouselEvent::PointerEntered);
        assert_eq!(c.host().live_of(Kind::Repeating), 0);

        for _ in 0..3 {
            c.handle(CarouselEvent::Tick);
        }
        assert_eq!(c.host().left, 0.0);
        assert_eq!(c.host().active(), vec![0]);

        c.handle(CarouselEvent::PointerLeft);
        assert_eq!(c.host().live_of(Kind::Repeating), 1);
        c.handle(CarouselEvent::Tick);
        assert_eq!(c.host().active(), vec![1]);
    }

    #[test]
    fn quiet_period_expiry_while_hovering_keeps_automation_off() {
        let mut c = carousel(5);
        c.handle(CarouselEvent::PointerEntered);
        c.handle(CarouselEvent::NextPressed);
        c.handle(CarouselEvent::QuietPeriodElapsed);
        assert!(c.is_interacting());
        assert!(!c.is_automating());

        c.handle(CarouselEvent::PointerLeft);
        assert!(c.is_automating());
    }

    #[test]
    fn hidden_document_stops_and_blocks_automation() {
        let mut c = carousel(5);
        c.host_mut().visible = false;
        c.handle(CarouselEvent::VisibilityChanged);
        assert_eq!(c.host().live_of(Kind::Repeating), 0);

        c.handle(CarouselEvent::Tick);
        assert_eq!(c.host().left, 0.0);

        c.handle(CarouselEvent::Resized);
        assert_eq!(c.host().live_of(Kind::Repeating), 0);

        c.host_mut().visible = true;
        c.handle(CarouselEvent::VisibilityChanged);
        assert_eq!(c.host().live_of(Kind::Repeating), 1);
    }

    #[test]
    fn resize_rearms_exactly_one_timer() {
        let mut c = carousel(5);
        c.handle(CarouselEvent::Resized);
        c.handle(CarouselEvent::Resized);
        c.start_automation();
        assert_eq!(c.host().live_of(Kind::Repeating), 1);
        assert_eq!(c.host().armed_intervals.len(), 4);
    }

    #[test]
    fn stop_automation_is_safe_without_timer() {
        let mut c = carousel(2);
        c.stop_automation();
        c.stop_automation();
        assert!(!c.is_automating());
    }

    #[test]
    fn scroll_syncs_indicators_only_when_not_interacting() {
        let mut c = carousel(5);
        c.host_mut().left = 830.0;
        c.handle(CarouselEvent::Scrolled);
        assert_eq!(c.host().active(), vec![2]);
        assert!(c.host().prev_enabled);

        c.handle(CarouselEvent::ManualGesture);
        c.host_mut().left = 1648.0;
        c.handle(CarouselEvent::Scrolled);
        assert_eq!(c.host().active(), vec![2]);
        assert!(c.host().next_enabled);

        c.handle(CarouselEvent::QuietPeriodElapsed);
        c.handle(CarouselEvent::Scrolled);
        assert_eq!(c.host().active(), vec![4]);
        assert!(!c.host().next_enabled);
    }

    #[test]
    fn touch_swipe_resyncs_once_quiet_period_ends() {
        let mut c = carousel(5);
        c.handle(CarouselEvent::ManualGesture);
        c.host_mut().left = 1648.0;
        c.handle(CarouselEvent::Scrolled);
        c.handle(CarouselEvent::QuietPeriodElapsed);

        assert_eq!(c.host().active(), vec![c.current_index()]);
        assert_eq!(c.host().active(), vec![4]);
        assert!(c.host().prev_enabled);
        assert!(!c.host().next_enabled);
    }

    #[test]
    fn pointer_leave_resyncs_after_hover_scroll() {
        let mut c = carousel(5);
        c.handle(CarouselEvent::PointerEntered);
        c.host_mut().left = 824.0;
        c.handle(CarouselEvent::Scrolled);
        assert_eq!(c.host().active(), vec![0]);

        c.handle(CarouselEvent::PointerLeft);
        assert_eq!(c.host().active(), vec![2]);
        assert!(c.host().prev_enabled);
    }

    #[test]
    fn controls_follow_click_destination() {
        let mut c = carousel(5);
        assert!(!c.host().prev_enabled);

        c.handle(CarouselEvent::NextPressed);
        assert!(c.host().prev_enabled);
        assert!(c.host().next_enabled);

        c.handle(CarouselEvent::IndicatorPressed(4));
        assert!(c.host().prev_enabled);
        assert!(!c.host().next_enabled);

        c.handle(CarouselEvent::NextPressed);
        assert!(!c.host().prev_enabled);
        assert!(c.host().next_enabled);

        c.handle(CarouselEvent::IndicatorPressed(1));
        c.handle(CarouselEvent::PrevPressed);
        assert!(!c.host().prev_enabled);
        assert_eq!(c.host().active(), vec![0]);
    }

    #[test]
    fn exactly_one_indicator_after_any_event() {
        let mut c = carousel(4);
        let events = [
            CarouselEvent::Tick,
            CarouselEvent::NextPressed,
            CarouselEvent::PrevPressed,
            CarouselEvent::IndicatorPressed(3),
            CarouselEvent::QuietPeriodElapsed,
            CarouselEvent::Tick,
            CarouselEvent::Resized,
            CarouselEvent::Scrolled,
        ];
        for event in events {
            c.handle(event);
            assert_eq!(c.host().active().len(), 1, "after {:?}", event);
        }
        assert_eq!(c.host().active(), vec![c.current_index()]);
    }

    #[test]
    fn single_card_strip_wraps_onto_itself() {
        let mut c = carousel(1);
        c.handle(CarouselEvent::Tick);
        assert_eq!(c.host().left, 0.0);
        assert_eq!(c.host().active(), vec![0]);
        c.go_next();
        assert_eq!(c.host().active(), vec![0]);
    }
}
