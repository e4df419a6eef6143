// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window scroll/resize subscriptions.
//!
//! [`WindowListener`] implements [`EventSource`] by adding and removing DOM
//! event listeners on an [`EventTarget`] (normally the window). Both JS
//! closures are created once up front and live as long as the listener, so
//! unsubscribing from inside a running handler never drops the closure that
//! is executing.

use alloc::boxed::Box;
use alloc::rc::Rc;

use lazyview_core::events::{EventKind, EventSource};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use web_sys::EventTarget;

type ListenerClosure = Closure<dyn FnMut()>;

/// An [`EventSource`] over DOM event listeners.
pub struct WindowListener {
    target: EventTarget,
    closures: [ListenerClosure; 2],
    subscribed: [bool; 2],
}

impl WindowListener {
    /// Creates a listener on `target` that calls `handler` with the kind of
    /// each delivered event. Nothing is subscribed yet.
    pub fn new(target: EventTarget, handler: impl Fn(EventKind) + 'static) -> Self {
        let handler: Rc<dyn Fn(EventKind)> = Rc::new(handler);
        let closures = EventKind::ALL.map(|kind| {
            let handler = Rc::clone(&handler);
            Closure::wrap(Box::new(move || handler(kind)) as Box<dyn FnMut()>)
        });
        Self {
            target,
            closures,
            subscribed: [false; 2],
        }
    }

    /// Returns `true` if `kind` is currently subscribed.
    #[must_use]
    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.subscribed[slot(kind)]
    }
}

fn slot(kind: EventKind) -> usize {
    match kind {
        EventKind::Scroll => 0,
        EventKind::Resize => 1,
    }
}

impl EventSource for WindowListener {
    fn subscribe(&mut self, kind: EventKind) {
        let slot = slot(kind);
        if self.subscribed[slot] {
            return;
        }
        let closure = &self.closures[slot];
        match self
            .target
            .add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
        {
            Ok(()) => self.subscribed[slot] = true,
            Err(err) => log::warn!("lazyview: addEventListener({}) failed: {err:?}", kind.as_str()),
        }
    }

    fn unsubscribe(&mut self, kind: EventKind) {
        let slot = slot(kind);
        if !self.subscribed[slot] {
            return;
        }
        let closure = &self.closures[slot];
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
        {
            log::warn!("lazyview: removeEventListener({}) failed: {err:?}", kind.as_str());
        }
        self.subscribed[slot] = false;
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        for kind in EventKind::ALL {
            self.unsubscribe(kind);
        }
    }
}

impl core::fmt::Debug for WindowListener {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowListener")
            .field("scroll", &self.subscribed[0])
            .field("resize", &self.subscribed[1])
            .finish_non_exhaustive()
    }
}
