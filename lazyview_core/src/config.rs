// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loader configuration.
//!
//! A [`Config`] is computed once, before a
//! [`LazyLoader`](crate::controller::LazyLoader) is built, by merging caller
//! [`ConfigOverrides`] onto [`Config::default()`]. It is never validated:
//! a negative threshold, for example, simply shrinks the near-viewport
//! region by that many pixels.

use alloc::string::String;

use crate::time::{Duration, Timebase};

/// Attribute holding the deferred image URL unless overridden.
pub const DEFAULT_SOURCE_MARKER: &str = "data-lazyview-src";

/// Class flagging deferred text regions unless overridden.
pub const DEFAULT_MARKER_CLASS: &str = "lazyview-deferred";

/// Immutable engine configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Attribute name holding the deferred image URL.
    pub pending_source_marker: String,
    /// Class name flagging deferred text regions.
    pub marker_class: String,
    /// Activation margin, in CSS pixels, beyond the viewport edge.
    pub threshold: f64,
    /// Rate-limit window for scroll and resize handling, in milliseconds.
    pub activation_delay_ms: u32,
    /// Whether the vertical axis can disqualify a unit.
    pub track_vertical: bool,
    /// Whether the horizontal axis can disqualify a unit.
    pub track_horizontal: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pending_source_marker: String::from(DEFAULT_SOURCE_MARKER),
            marker_class: String::from(DEFAULT_MARKER_CLASS),
            threshold: 100.0,
            activation_delay_ms: 400,
            track_vertical: true,
            track_horizontal: false,
        }
    }
}

impl Config {
    /// Default configuration with both axes tracked, for horizontally
    /// scrolling layouts (carousels, timelines).
    #[must_use]
    pub fn horizontal() -> Self {
        Self {
            track_horizontal: true,
            ..Self::default()
        }
    }

    /// Returns `self` with every field present in `overrides` replaced.
    #[must_use]
    pub fn merged(mut self, overrides: ConfigOverrides) -> Self {
        let ConfigOverrides {
            pending_source_marker,
            marker_class,
            threshold,
            activation_delay_ms,
            track_vertical,
            track_horizontal,
        } = overrides;
        if let Some(v) = pending_source_marker {
            self.pending_source_marker = v;
        }
        if let Some(v) = marker_class {
            self.marker_class = v;
        }
        if let Some(v) = threshold {
            self.threshold = v;
        }
        if let Some(v) = activation_delay_ms {
            self.activation_delay_ms = v;
        }
        if let Some(v) = track_vertical {
            self.track_vertical = v;
        }
        if let Some(v) = track_horizontal {
            self.track_horizontal = v;
        }
        self
    }

    /// Sets the activation threshold in pixels.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the rate-limit window in milliseconds.
    #[must_use]
    pub fn with_activation_delay_ms(mut self, delay_ms: u32) -> Self {
        self.activation_delay_ms = delay_ms;
        self
    }

    /// Enables or disables the two axis checks.
    #[must_use]
    pub fn with_axes(mut self, vertical: bool, horizontal: bool) -> Self {
        self.track_vertical = vertical;
        self.track_horizontal = horizontal;
        self
    }

    /// Sets the attribute name holding deferred image URLs.
    #[must_use]
    pub fn with_pending_source_marker(mut self, marker: impl Into<String>) -> Self {
        self.pending_source_marker = marker.into();
        self
    }

    /// Sets the class name flagging deferred text regions.
    #[must_use]
    pub fn with_marker_class(mut self, class: impl Into<String>) -> Self {
        self.marker_class = class.into();
        self
    }

    /// The rate-limit window expressed in host ticks.
    #[must_use]
    pub fn activation_delay(&self, timebase: Timebase) -> Duration {
        Duration::from_millis(self.activation_delay_ms, timebase)
    }
}

/// Caller overrides merged onto [`Config::default()`].
///
/// Every field left as `None` keeps the default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    /// See [`Config::pending_source_marker`].
    pub pending_source_marker: Option<String>,
    /// See [`Config::marker_class`].
    pub marker_class: Option<String>,
    /// See [`Config::threshold`].
    pub threshold: Option<f64>,
    /// See [`Config::activation_delay_ms`].
    pub activation_delay_ms: Option<u32>,
    /// See [`Config::track_vertical`].
    pub track_vertical: Option<bool>,
    /// See [`Config::track_horizontal`].
    pub track_horizontal: Option<bool>,
}

impl From<ConfigOverrides> for Config {
    fn from(overrides: ConfigOverrides) -> Self {
        Self::default().merged(overrides)
    }
}
