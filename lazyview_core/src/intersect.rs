// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Near-viewport test.
//!
//! A unit is *near* when it is rendered and does not lie beyond the far edge
//! of the viewport (plus `threshold`) on any tracked axis:
//!
//! ```text
//!   below    = viewport.height + scroll.y < offset.y - threshold
//!   right_of = viewport.width  + scroll.x < offset.x - threshold
//!   near     = rendered && !(track_vertical && below) && !(track_horizontal && right_of)
//! ```
//!
//! The test is one-directional. Units above or to the left of the current
//! scroll position are always near: content is assumed to flow top-to-bottom
//! and left-to-right, and anything the user has scrolled past should load.
//!
//! Units that are not rendered (hidden themselves, or reporting a zero or
//! negative width because an ancestor is hidden) are never near, since their
//! reported offsets are unreliable.

use kurbo::{Point, Size, Vec2};

use crate::config::Config;
use crate::host::GeometryOracle;

/// Geometry of one unit as reported by the [`GeometryOracle`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probe {
    /// Document-relative offset of the top-left corner.
    pub offset: Point,
    /// Rendered size.
    pub size: Size,
    /// Computed `display: none` (or equivalent) on the element itself.
    pub hidden: bool,
}

impl Probe {
    /// Queries the oracle for `element`.
    pub fn of<G: GeometryOracle + ?Sized>(oracle: &G, element: &G::Element) -> Self {
        Self {
            offset: oracle.offset_of(element),
            size: oracle.size_of(element),
            hidden: oracle.is_hidden(element),
        }
    }

    /// Whether the unit is rendered with usable geometry.
    #[inline]
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        !self.hidden && self.size.width > 0.0
    }
}

/// The activation region for one pass: viewport plus threshold on the
/// tracked axes, at a fixed scroll position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearRegion {
    viewport: Size,
    scroll: Vec2,
    threshold: f64,
    track_vertical: bool,
    track_horizontal: bool,
}

impl NearRegion {
    /// Captures the region for the given viewport and scroll position.
    #[must_use]
    pub fn new(config: &Config, viewport: Size, scroll: Vec2) -> Self {
        Self {
            viewport,
            scroll,
            threshold: config.threshold,
            track_vertical: config.track_vertical,
            track_horizontal: config.track_horizontal,
        }
    }

    /// Viewport size the region was built with.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Scroll offset the region was built with.
    #[must_use]
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Whether a unit lies below the region. Always `false` when vertical
    /// tracking is off.
    #[must_use]
    pub fn is_below(&self, probe: &Probe) -> bool {
        self.track_vertical
            && self.viewport.height + self.scroll.y < probe.offset.y - self.threshold
    }

    /// Whether a unit lies to the right of the region. Always `false` when
    /// horizontal tracking is off.
    #[must_use]
    pub fn is_right_of(&self, probe: &Probe) -> bool {
        self.track_horizontal
            && self.viewport.width + self.scroll.x < probe.offset.x - self.threshold
    }

    /// Whether a unit with the given geometry is eligible for activation.
    #[must_use]
    pub fn contains(&self, probe: &Probe) -> bool {
        probe.is_rendered() && !self.is_below(probe) && !self.is_right_of(probe)
    }
}

/// Queries `oracle` for `element` and tests it against `region`.
pub fn is_near<G: GeometryOracle + ?Sized>(
    oracle: &G,
    region: &NearRegion,
    element: &G::Element,
) -> bool {
    region.contains(&Probe::of(oracle, element))
}
