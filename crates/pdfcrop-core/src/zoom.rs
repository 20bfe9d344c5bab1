//! Render scale for the main page view and thumbnails

use crate::config::AppConfig;

/// Horizontal padding kept free when fitting a page to its container
const FIT_PADDING: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    scale: f64,
    initial: f64,
    min: f64,
    max: f64,
    step: f64,
}

impl ZoomState {
    pub fn new(initial: f64, min: f64, max: f64, step: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let initial = initial.clamp(min, max);
        Self {
            scale: initial,
            initial,
            min,
            max,
            step,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.initial_scale,
            config.min_scale,
            config.max_scale,
            config.zoom_step,
        )
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the scale, clamped to the allowed range. Returns whether it changed.
    pub fn set(&mut self, scale: f64) -> bool {
        if !scale.is_finite() {
            return false;
        }
        let clamped = scale.clamp(self.min, self.max);
        let changed = (clamped - self.scale).abs() > f64::EPSILON;
        self.scale = clamped;
        changed
    }

    pub fn zoom_in(&mut self) -> bool {
        self.set(self.scale + self.step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set(self.scale - self.step)
    }

    pub fn reset(&mut self) -> bool {
        self.set(self.initial)
    }

    /// Scale at which a page of `page_width` points fills `container_width` pixels
    pub fn fit_width(&mut self, container_width: f64, page_width: f64) -> bool {
        if container_width <= 0.0 || page_width <= 0.0 {
            return false;
        }
        let usable = (container_width - FIT_PADDING * 2.0).max(1.0);
        self.set(usable / page_width)
    }

    /// Percentage label for the zoom indicator
    pub fn percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }
}

/// Scale that renders a page `page_width` points wide at `target_width` pixels
pub fn thumbnail_scale(page_width: f64, target_width: f64) -> f64 {
    if page_width <= 0.0 || target_width <= 0.0 {
        return 1.0;
    }
    target_width / page_width
}
