// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host capabilities consumed by the engine.
//!
//! The engine never talks to a page directly. Backends implement two
//! traits:
//!
//! - [`GeometryOracle`]: read-only layout queries (element offsets and
//!   sizes, computed visibility, viewport size, scroll position).
//! - [`Document`]: element lookup and the handful of mutations activation
//!   needs (attribute and class edits, inserting a text node, hiding an
//!   element, resolving callback targets).
//!
//! # Crate boundaries
//!
//! `lazyview_core` owns discovery, intersection, activation and the
//! lifecycle. `lazyview_backend_web` implements these traits on top of
//! `web-sys`; `lazyview_harness` implements them in memory for tests.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Size, Vec2};

use crate::unit::{Scope, Target};

/// Read-only layout queries.
///
/// Coordinates are document-relative CSS pixels: [`offset_of`] is the
/// element's top-left corner relative to the document origin, the same frame
/// [`scroll_position`] is expressed in.
///
/// [`offset_of`]: Self::offset_of
/// [`scroll_position`]: Self::scroll_position
pub trait GeometryOracle {
    /// Element handle type.
    type Element: Clone + PartialEq;

    /// Document-relative offset of the element's top-left corner.
    fn offset_of(&self, element: &Self::Element) -> Point;

    /// Rendered size of the element. Elements under a hidden ancestor report
    /// zero (or negative) extents.
    fn size_of(&self, element: &Self::Element) -> Size;

    /// Whether the element itself is computed as not displayed.
    fn is_hidden(&self, element: &Self::Element) -> bool;

    /// Size of the visible viewport.
    fn viewport_size(&self) -> Size;

    /// Current scroll offset of the viewport (x = left, y = top).
    fn scroll_position(&self) -> Vec2;
}

/// Element lookup and the mutations performed by activation.
pub trait Document: GeometryOracle {
    /// Every element inside `scope` carrying the attribute `marker`, in
    /// document order.
    fn find_images(&self, scope: &Scope<Self::Element>, marker: &str) -> Vec<Self::Element>;

    /// Every element inside `scope` carrying the class `class`, in document
    /// order.
    fn find_regions(&self, scope: &Scope<Self::Element>, class: &str) -> Vec<Self::Element>;

    /// Value of attribute `name`, or `None` if absent.
    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Sets attribute `name` to `value`.
    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str);

    /// Removes attribute `name`.
    fn remove_attribute(&mut self, element: &Self::Element, name: &str);

    /// Whether the element's class list contains `class`.
    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    /// Removes `class` from the element's class list.
    fn remove_class(&mut self, element: &Self::Element, class: &str);

    /// The element's textual value (for a `<textarea>`, its current value).
    fn text_value(&self, element: &Self::Element) -> String;

    /// Inserts a display node rendering `markup` immediately before
    /// `element`.
    fn insert_text_before(&mut self, element: &Self::Element, markup: &str);

    /// Hides the element from rendering.
    fn hide(&mut self, element: &Self::Element);

    /// Resolves a callback target to a live element, or `None` if it no
    /// longer matches anything attached to the document.
    fn resolve_target(&self, target: &Target<Self::Element>) -> Option<Self::Element>;
}
