// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event substrate.
//!
//! The loader reacts to two host notifications, scroll and resize. Instead
//! of binding to a process-wide window object, it is handed an
//! [`EventSource`] at construction and toggles its subscriptions through it.
//! Backends route delivered events back into
//! [`LazyLoader::notify`](crate::controller::LazyLoader::notify).

/// A host notification the loader subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The viewport scrolled.
    Scroll,
    /// The viewport was resized.
    Resize,
}

impl EventKind {
    /// Both kinds, in subscription order.
    pub const ALL: [Self; 2] = [Self::Scroll, Self::Resize];

    /// The DOM event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::Resize => "resize",
        }
    }
}

/// Subscribes and unsubscribes the loader's handlers on the host.
///
/// The loader calls each method at most once per transition, so
/// implementations need not deduplicate.
pub trait EventSource {
    /// Starts delivering `kind` notifications to the loader.
    fn subscribe(&mut self, kind: EventKind);

    /// Stops delivering `kind` notifications to the loader.
    fn unsubscribe(&mut self, kind: EventKind);
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn subscribe(&mut self, kind: EventKind) {
        (**self).subscribe(kind);
    }

    fn unsubscribe(&mut self, kind: EventKind) {
        (**self).unsubscribe(kind);
    }
}
