// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trackable units and the scopes they are discovered in.
//!
//! Three kinds of unit share one pending-set contract (see
//! [`PendingSets`](crate::registry::PendingSets)):
//!
//! - **Image** units are elements carrying the pending-source marker
//!   attribute. They are represented by the element handle alone.
//! - **Text-region** units are elements carrying the marker class, also
//!   represented by the element handle alone.
//! - **Callback** units pair a [`Target`] with a caller action, see
//!   [`CallbackUnit`].

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::error::ActionResult;

/// Which of the three unit variants a unit belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Element whose real source is parked in the marker attribute.
    Image,
    /// Element whose content is materialized next to it on activation.
    TextRegion,
    /// Caller-supplied action bound to a target element.
    Callback,
}

impl UnitKind {
    /// All kinds, in the order an activation pass visits them.
    pub const ALL: [Self; 3] = [Self::Image, Self::TextRegion, Self::Callback];

    /// Short lowercase label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::TextRegion => "region",
            Self::Callback => "callback",
        }
    }

    /// Maps the kind to an array index in [`ALL`](Self::ALL) order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Image => 0,
            Self::TextRegion => 1,
            Self::Callback => 2,
        }
    }
}

/// What happened to a unit during an activation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The unit was activated and left its pending set.
    Activated,
    /// The unit stays pending until a later pass.
    Deferred,
    /// The unit left its pending set without being activated (stale target,
    /// marker removed elsewhere).
    Discarded,
}

impl Outcome {
    /// Whether the unit stays in its pending set.
    #[inline]
    #[must_use]
    pub const fn is_retained(self) -> bool {
        matches!(self, Self::Deferred)
    }
}

/// A root scope searched for image and text-region units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope<E> {
    /// The whole document.
    Document,
    /// The subtree rooted at one element.
    Element(E),
}

/// What a [`CallbackUnit`] is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target<E> {
    /// A specific element handle. Resolves while the element is attached.
    Element(E),
    /// A selector resolved against the document on every pass.
    Selector(String),
}

/// A caller action bound to a target element.
///
/// On activation the action is invoked once with the resolved target. If the
/// target no longer resolves the unit is discarded without firing.
pub struct CallbackUnit<E> {
    /// The element the action is bound to.
    pub target: Target<E>,
    action: Box<dyn FnMut(&E) -> ActionResult>,
}

impl<E> CallbackUnit<E> {
    /// Creates a callback unit.
    pub fn new(target: Target<E>, action: impl FnMut(&E) -> ActionResult + 'static) -> Self {
        Self {
            target,
            action: Box::new(action),
        }
    }

    /// Creates a callback unit bound to an element handle.
    pub fn for_element(element: E, action: impl FnMut(&E) -> ActionResult + 'static) -> Self {
        Self::new(Target::Element(element), action)
    }

    /// Creates a callback unit bound to a selector.
    pub fn for_selector(
        selector: impl Into<String>,
        action: impl FnMut(&E) -> ActionResult + 'static,
    ) -> Self {
        Self::new(Target::Selector(selector.into()), action)
    }

    pub(crate) fn fire(&mut self, element: &E) -> ActionResult {
        (self.action)(element)
    }
}

impl<E: fmt::Debug> fmt::Debug for CallbackUnit<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackUnit")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
