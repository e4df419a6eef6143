// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport-intersection and work-queue engine for deferred page content.
//!
//! `lazyview_core` decides *when* off-screen content should be activated:
//! images whose real source sits in a placeholder attribute, text regions
//! whose markup is parked inside a marked element, and caller-supplied
//! callbacks bound to a target element. Units stay pending until they come
//! within a threshold of the viewport, are activated exactly once, and the
//! engine unsubscribes from host events once nothing is left to do.
//!
//! The crate is `no_std` compatible (with `alloc`). Everything that touches
//! a real page lives behind traits so that backends (see
//! `lazyview_backend_web`) and test doubles (see `lazyview_harness`) can be
//! plugged in.
//!
//! # Architecture
//!
//! ```text
//!   host event (scroll / resize)
//!       │
//!       ▼
//!   Throttle::call() ──► FireNow │ Scheduled(deadline) ──► host timer ──► poll()
//!       │
//!       ▼
//!   LazyLoader::on_scroll / on_resize
//!       │
//!       ├─► NearRegion::new(config, viewport, scroll)
//!       │
//!       ▼
//!   run_pass() ──► partition each PendingSets vec ──► PassReport
//!       │
//!       ▼
//!   outstanding == 0 ? ──► EventSource::unsubscribe(Scroll, Resize)
//! ```
//!
//! **[`host`]**: the [`GeometryOracle`](host::GeometryOracle) and
//! [`Document`](host::Document) capabilities the engine consumes.
//!
//! **[`registry`]**: discovery of image and text-region units across one or
//! more containers, and the [`PendingSets`](registry::PendingSets) they live in.
//!
//! **[`intersect`]**: the near-viewport test.
//!
//! **[`activate`]**: the single mutation point for pending sets.
//!
//! **[`controller`]**: the [`LazyLoader`](controller::LazyLoader) lifecycle.
//!
//! **[`throttle`]**: trailing-edge rate limiting driven by host time.
//!
//! **[`events`]**: the [`EventSource`](events::EventSource) substrate.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) instrumentation with a
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-unit
//!   outcome events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod activate;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod host;
pub mod intersect;
pub mod registry;
pub mod throttle;
pub mod time;
pub mod trace;
pub mod unit;

#[cfg(test)]
mod testing;

pub use config::{Config, ConfigOverrides};
pub use controller::{LazyLoader, LoaderState};
pub use error::{ActionResult, ActivationError};
