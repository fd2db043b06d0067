use log::{warn, Level};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use web_sys::Element;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Layout and timing of the testimonial carousel.
///
/// `card_width` and `gap` must match the stylesheet, they are not measured.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub card_width: f64,
    pub gap: f64,
    pub tick_ms: u32,
    pub quiet_period_ms: u32,
    pub edge_tolerance: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            card_width: 380.0,
            gap: 32.0, // 2rem
            tick_ms: 1000,
            quiet_period_ms: 5000,
            edge_tolerance: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub header_threshold: f64,
    pub parallax_rate: f64,
    pub counter_duration_ms: f64,
    pub stats_threshold: f64,
    pub reveal: RevealConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            header_threshold: 100.0,
            parallax_rate: 0.3,
            counter_duration_ms: 2000.0,
            stats_threshold: 0.5,
            reveal: RevealConfig::default(),
        }
    }
}

/// Options handed to `AOS.init`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub duration: u32,
    pub once: bool,
    pub offset: u32,
    pub easing: String,
    pub delay: u32,
    pub mirror: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            duration: 1200,
            once: false,
            offset: 150,
            easing: "ease-out-cubic".to_string(),
            delay: 0,
            mirror: true,
        }
    }
}

/// Parses a partial JSON override, falling back to defaults on bad input.
pub fn parse_override<T>(raw: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match serde_json::from_str(raw) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring invalid config override {:?}: {}", raw, e);
            T::default()
        }
    }
}

/// Reads `attribute` off `element` as a JSON override, or the defaults.
pub fn from_attribute<T>(element: &Element, attribute: &str) -> T
where
    T: DeserializeOwned + Default,
{
    element
        .get_attribute(attribute)
        .map(|raw| parse_override(&raw))
        .unwrap_or_default()
}
