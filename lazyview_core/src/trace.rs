// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the activation lifecycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`LazyLoader`](crate::controller::LazyLoader) and
//! [`run_pass`](crate::activate::run_pass) call at each stage. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates per-unit [`UnitEvent`]s and the
//!   corresponding `TraceSink` method.

use kurbo::{Size, Vec2};

use crate::activate::PassReport;
use crate::events::EventKind;
use crate::time::HostTime;
#[cfg(feature = "trace-rich")]
use crate::unit::{Outcome, UnitKind};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What triggered an activation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// The unconditional pass run by `initialize`.
    Initial,
    /// A (rate-limited) scroll notification.
    Scroll,
    /// A (rate-limited) resize notification; the viewport cache was refreshed.
    Resize,
}

impl PassKind {
    /// Short lowercase label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a host notification reaches the loader.
#[derive(Clone, Copy, Debug)]
pub struct NotifyEvent {
    /// Which notification.
    pub kind: EventKind,
    /// Host time of delivery.
    pub at: HostTime,
    /// Whether the throttle let it through immediately.
    pub fired: bool,
    /// Deadline of the trailing call, if one is now scheduled.
    pub trailing_deadline: Option<HostTime>,
}

/// Emitted after discovery replaced the image and region sets.
#[derive(Clone, Copy, Debug)]
pub struct RescanEvent {
    /// Image units now pending.
    pub images: usize,
    /// Text-region units now pending.
    pub regions: usize,
    /// Callback units pending (unchanged by discovery).
    pub callbacks: usize,
}

/// Marks the beginning of an activation pass.
#[derive(Clone, Copy, Debug)]
pub struct PassBeginEvent {
    /// Monotonic pass counter.
    pub pass_index: u64,
    /// What triggered the pass.
    pub kind: PassKind,
    /// Cached viewport size used for the pass.
    pub viewport: Size,
    /// Scroll offset sampled for the pass.
    pub scroll: Vec2,
    /// Outstanding units before the pass.
    pub outstanding: usize,
}

/// Marks the end of an activation pass.
#[derive(Clone, Copy, Debug)]
pub struct PassEndEvent {
    /// Pass counter, matching the preceding [`PassBeginEvent`].
    pub pass_index: u64,
    /// What triggered the pass.
    pub kind: PassKind,
    /// Per-kind counts. Partial if the pass stopped on a caller error.
    pub report: PassReport,
    /// Whether a caller action aborted the pass.
    pub aborted: bool,
}

/// Emitted when the loader subscribes to or unsubscribes from a host event.
#[derive(Clone, Copy, Debug)]
pub struct ListenerEvent {
    /// Which notification.
    pub kind: EventKind,
    /// `true` on subscribe, `false` on unsubscribe.
    pub subscribed: bool,
}

/// A per-unit outcome record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct UnitEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Kind of the unit.
    pub kind: UnitKind,
    /// Position of the unit in its pending set when the pass started.
    pub position: usize,
    /// What happened to it.
    pub outcome: Outcome,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the loader.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a host notification reaches the loader.
    fn on_notify(&mut self, e: &NotifyEvent) {
        _ = e;
    }

    /// Called after discovery.
    fn on_rescan(&mut self, e: &RescanEvent) {
        _ = e;
    }

    /// Called at the beginning of an activation pass.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called at the end of an activation pass.
    fn on_pass_end(&mut self, e: &PassEndEvent) {
        _ = e;
    }

    /// Called on subscription changes.
    fn on_listener(&mut self, e: &ListenerEvent) {
        _ = e;
    }

    /// Called once per visited unit (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_unit(&mut self, e: &UnitEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`NotifyEvent`].
    #[inline]
    pub fn notify(&mut self, e: &NotifyEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_notify(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RescanEvent`].
    #[inline]
    pub fn rescan(&mut self, e: &RescanEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_rescan(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassEndEvent`].
    #[inline]
    pub fn pass_end(&mut self, e: &PassEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ListenerEvent`].
    #[inline]
    pub fn listener(&mut self, e: &ListenerEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_listener(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`UnitEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn unit(&mut self, e: &UnitEvent) {
        if let Some(s) = &mut self.sink {
            s.on_unit(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
