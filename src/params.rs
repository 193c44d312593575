//! Interactive parameters: margin, corner radius and background color
//!
//! Each parameter is a single-writer, multi-reader value cell backed by a
//! [`tokio::sync::watch`] channel. Readers only ever see the latest value, so
//! rapid slider updates coalesce and intermediate values may be skipped.

use std::ops::RangeInclusive;

use serde::Deserialize;
use tokio::sync::watch;

use crate::color::Rgba;
use crate::error::EditorError;

/// Valid margin values
pub const MARGIN_RANGE: RangeInclusive<f64> = 0.0..=10.0;

/// Valid corner radius values
pub const CORNER_RADIUS_RANGE: RangeInclusive<f64> = 0.0..=20.0;

/// Initial parameter values for a new editor
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParameterDefaults {
    pub margin: f64,
    pub corner_radius: f64,
    pub background: Rgba,
}

impl Default for ParameterDefaults {
    fn default() -> Self {
        Self {
            margin: 1.0,
            corner_radius: 1.0,
            background: Rgba::WHITE,
        }
    }
}

/// Receivers for all three parameters
#[derive(Debug, Clone)]
pub struct ParameterReceivers {
    pub margin: watch::Receiver<f64>,
    pub corner_radius: watch::Receiver<f64>,
    pub background: watch::Receiver<Rgba>,
}

/// The three observable editing parameters
///
/// Parameters belong to the editing session and survive template switches.
#[derive(Debug)]
pub struct Parameters {
    margin: watch::Sender<f64>,
    corner_radius: watch::Sender<f64>,
    background: watch::Sender<Rgba>,
}

impl Parameters {
    pub fn new(defaults: ParameterDefaults) -> Self {
        Self {
            margin: watch::Sender::new(clamp_to(defaults.margin, &MARGIN_RANGE)),
            corner_radius: watch::Sender::new(clamp_to(
                defaults.corner_radius,
                &CORNER_RADIUS_RANGE,
            )),
            background: watch::Sender::new(defaults.background),
        }
    }

    pub fn margin(&self) -> f64 {
        *self.margin.borrow()
    }

    pub fn corner_radius(&self) -> f64 {
        *self.corner_radius.borrow()
    }

    pub fn background(&self) -> Rgba {
        *self.background.borrow()
    }

    /// Publish a new margin, clamped to [`MARGIN_RANGE`]. Returns the stored value.
    pub fn set_margin(&self, margin: f64) -> Result<f64, EditorError> {
        let value = finite("margin", margin)?;
        let value = clamp_to(value, &MARGIN_RANGE);
        self.margin.send_replace(value);
        Ok(value)
    }

    /// Publish a new corner radius, clamped to [`CORNER_RADIUS_RANGE`]
    pub fn set_corner_radius(&self, radius: f64) -> Result<f64, EditorError> {
        let value = finite("corner_radius", radius)?;
        let value = clamp_to(value, &CORNER_RADIUS_RANGE);
        self.corner_radius.send_replace(value);
        Ok(value)
    }

    pub fn set_background(&self, color: Rgba) {
        self.background.send_replace(color);
    }

    /// Subscribe to all three parameters.
    ///
    /// Fresh receivers report their current value as unseen, so the first
    /// poll after subscribing delivers it.
    pub fn subscribe(&self) -> ParameterReceivers {
        let mut receivers = ParameterReceivers {
            margin: self.margin.subscribe(),
            corner_radius: self.corner_radius.subscribe(),
            background: self.background.subscribe(),
        };
        receivers.margin.mark_changed();
        receivers.corner_radius.mark_changed();
        receivers.background.mark_changed();
        receivers
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::new(ParameterDefaults::default())
    }
}

fn finite(name: &'static str, value: f64) -> Result<f64, EditorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EditorError::InvalidParameter { name, value })
    }
}

fn clamp_to(value: f64, range: &RangeInclusive<f64>) -> f64 {
    value.clamp(*range.start(), *range.end())
}
