// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for lazyview.
//!
//! This crate binds [`lazyview_core`] to the browser:
//!
//! - [`DomDocument`]: the `Document`/`GeometryOracle` capabilities over `web-sys`
//! - [`WindowListener`]: scroll/resize subscriptions on the window
//! - [`TimeoutWake`]: `setTimeout` wake-ups for trailing throttle calls
//! - [`install`]: wires the three together around a shared [`LazyLoader`]
//!
//! DOM failures are reported through the [`log`] facade and otherwise
//! ignored; a failed mutation leaves the page as it was.
//!
//! [`LazyLoader`]: lazyview_core::LazyLoader

#![no_std]

extern crate alloc;

mod document;
mod install;
mod listener;
mod wake;

pub use document::DomDocument;
pub use install::{Installation, WebLoader, install, install_with_sink};
pub use listener::WindowListener;
pub use wake::TimeoutWake;

use lazyview_core::time::{HostTime, Timebase};

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks. Use [`timebase`] to
/// convert to nanoseconds.
#[must_use]
pub fn now() -> HostTime {
    let ms = wake::performance_now();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs = 1000 ns.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::MICROS
}
