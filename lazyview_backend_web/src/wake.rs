// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `setTimeout` wake-ups for trailing throttle calls.
//!
//! The loader's throttles never sleep on their own: a scheduled trailing call
//! is a [`HostTime`] deadline handed back to the host. [`TimeoutWake`] turns
//! that deadline into a single pending `setTimeout`, re-armed or cancelled on
//! every dispatch.

use alloc::boxed::Box;
use core::cell::Cell;

use lazyview_core::time::HostTime;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::Window;

// Direct global binding instead of `web_sys::Performance`; avoids fetching
// the Performance object on every notification.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;
}

/// A single re-armable `setTimeout` slot.
pub struct TimeoutWake {
    window: Window,
    closure: Closure<dyn FnMut()>,
    handle: Cell<Option<i32>>,
}

impl TimeoutWake {
    /// Creates an unarmed wake that calls `on_wake` when a timer fires.
    pub fn new(window: Window, on_wake: impl FnMut() + 'static) -> Self {
        Self {
            window,
            closure: Closure::wrap(Box::new(on_wake) as Box<dyn FnMut()>),
            handle: Cell::new(None),
        }
    }

    /// Arms the timer to fire at `deadline`, replacing any pending timer.
    ///
    /// The delay is rounded up to whole milliseconds so the wake never lands
    /// before the deadline.
    pub fn arm(&self, deadline: HostTime) {
        self.cancel();
        let delay_ms = i32::try_from(
            deadline
                .saturating_duration_since(crate::now())
                .ticks()
                .div_ceil(1000),
        )
        .unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                self.closure.as_ref().unchecked_ref(),
                delay_ms,
            ) {
            Ok(handle) => self.handle.set(Some(handle)),
            Err(err) => log::warn!("lazyview: setTimeout({delay_ms}) failed: {err:?}"),
        }
    }

    /// Cancels the pending timer, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.handle.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    /// Returns `true` if a timer is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.handle.get().is_some()
    }

    /// Forgets the handle of a timer that has just fired.
    pub(crate) fn fired(&self) {
        self.handle.set(None);
    }
}

impl Drop for TimeoutWake {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl core::fmt::Debug for TimeoutWake {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimeoutWake")
            .field("handle", &self.handle.get())
            .finish_non_exhaustive()
    }
}
