// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle controller.
//!
//! [`LazyLoader`] owns the pending sets, the viewport cache and one
//! [`Throttle`] per event kind, and drives them through this state machine:
//!
//! ```text
//!            initialize()               outstanding == 0
//!   Idle ─────────────────► Listening ──────────────────► Idle
//!    ▲                          │                           │
//!    └──── listen() after ──────┘◄──────────────────────────┘
//!          rescan()                 dispose() from any state ──► Disposed
//! ```
//!
//! Once idle the loader stays quiet: no notification reaches it because its
//! subscriptions are gone. The only way back is [`rescan`](LazyLoader::rescan)
//! followed by [`listen`](LazyLoader::listen).
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut loader = LazyLoader::new(document, events, containers, config, callbacks, timebase);
//! loader.initialize(&mut Tracer::none())?;
//!
//! // In the host's scroll/resize listener:
//! if let Some(deadline) = loader.notify(EventKind::Scroll, now(), &mut tracer)? {
//!     arm_timer(deadline);
//! }
//!
//! // When the timer fires:
//! if let Some(deadline) = loader.poll(now(), &mut tracer)? {
//!     arm_timer(deadline);
//! }
//! ```
//!
//! Everything runs on one thread; a pass always completes before the next
//! notification is handled, so there is no internal locking.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Size;

use crate::activate::{PassReport, run_pass_into};
use crate::config::Config;
use crate::error::ActivationError;
use crate::events::{EventKind, EventSource};
use crate::host::Document;
use crate::intersect::NearRegion;
use crate::registry::{PendingSets, RescanSummary, rescan};
use crate::throttle::{Throttle, ThrottleDecision};
use crate::time::{HostTime, Timebase};
use crate::trace::{
    ListenerEvent, NotifyEvent, PassBeginEvent, PassEndEvent, PassKind, RescanEvent, Tracer,
};
use crate::unit::{CallbackUnit, Scope};

/// Subscription state of a [`LazyLoader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoaderState {
    /// Not subscribed to host events.
    Idle,
    /// Subscribed to scroll and resize.
    Listening,
    /// Torn down; every operation is a no-op.
    Disposed,
}

/// Deferred-activation engine bound to one document and event source.
pub struct LazyLoader<D: Document, S: EventSource> {
    document: D,
    events: S,
    containers: Vec<Scope<D::Element>>,
    config: Config,
    pending: PendingSets<D::Element>,
    viewport: Size,
    scroll_throttle: Throttle,
    resize_throttle: Throttle,
    state: LoaderState,
    pass_counter: u64,
}

impl<D: Document, S: EventSource> fmt::Debug for LazyLoader<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyLoader")
            .field("state", &self.state)
            .field("containers", &self.containers.len())
            .field("config", &self.config)
            .field("images", &self.pending.images().len())
            .field("regions", &self.pending.regions().len())
            .field("callbacks", &self.pending.callbacks().len())
            .field("viewport", &self.viewport)
            .field("pass_counter", &self.pass_counter)
            .finish_non_exhaustive()
    }
}

impl<D: Document, S: EventSource> LazyLoader<D, S> {
    /// Creates an idle loader. Nothing is discovered or subscribed until
    /// [`initialize`](Self::initialize).
    ///
    /// An empty `containers` list searches the whole document. `timebase`
    /// converts [`Config::activation_delay_ms`] into the host's tick units.
    pub fn new(
        document: D,
        events: S,
        containers: Vec<Scope<D::Element>>,
        config: Config,
        callbacks: Vec<CallbackUnit<D::Element>>,
        timebase: Timebase,
    ) -> Self {
        let containers = if containers.is_empty() {
            vec![Scope::Document]
        } else {
            containers
        };
        let delay = config.activation_delay(timebase);
        Self {
            document,
            events,
            containers,
            config,
            pending: PendingSets::with_callbacks(callbacks),
            viewport: Size::ZERO,
            scroll_throttle: Throttle::new(delay),
            resize_throttle: Throttle::new(delay),
            state: LoaderState::Idle,
            pass_counter: 0,
        }
    }

    /// Discovers units, caches the viewport, runs one unconditional pass for
    /// content already in view, then subscribes to scroll and resize if any
    /// work remains.
    ///
    /// Calling it again on a listening loader repeats discovery and the pass
    /// without subscribing twice, and unsubscribes if nothing is left.
    ///
    /// If a caller action fails during the initial pass the error is
    /// returned and the subscription state is left as it was; call
    /// [`listen`](Self::listen) to subscribe anyway.
    pub fn initialize(&mut self, tracer: &mut Tracer<'_>) -> Result<PassReport, ActivationError> {
        if self.state == LoaderState::Disposed {
            return Ok(PassReport::default());
        }
        self.rescan(tracer);
        self.viewport = self.document.viewport_size();
        let report = self.pass(PassKind::Initial, tracer)?;
        match (self.state, self.pending.is_empty()) {
            (LoaderState::Idle, false) => self.start(tracer),
            (LoaderState::Listening, true) => self.stop(tracer),
            _ => {}
        }
        Ok(report)
    }

    /// Rate-limited entry point for a host notification delivered at `now`.
    ///
    /// Returns the deadline of the earliest pending trailing call, if any,
    /// so the host can arm a wake-up and call [`poll`](Self::poll). Ignored
    /// unless the loader is listening.
    pub fn notify(
        &mut self,
        kind: EventKind,
        now: HostTime,
        tracer: &mut Tracer<'_>,
    ) -> Result<Option<HostTime>, ActivationError> {
        if self.state != LoaderState::Listening {
            return Ok(None);
        }
        let decision = self.throttle_mut(kind).call(now);
        let trailing_deadline = match decision {
            ThrottleDecision::FireNow => None,
            ThrottleDecision::Scheduled(at) => Some(at),
        };
        tracer.notify(&NotifyEvent {
            kind,
            at: now,
            fired: decision == ThrottleDecision::FireNow,
            trailing_deadline,
        });
        if decision == ThrottleDecision::FireNow {
            self.handle(kind, tracer)?;
        }
        Ok(self.next_deadline())
    }

    /// Fires any trailing calls due at `now` (resize first, since it
    /// refreshes the viewport the scroll pass would use) and returns the
    /// next deadline, if any.
    pub fn poll(
        &mut self,
        now: HostTime,
        tracer: &mut Tracer<'_>,
    ) -> Result<Option<HostTime>, ActivationError> {
        for kind in [EventKind::Resize, EventKind::Scroll] {
            if self.state != LoaderState::Listening {
                break;
            }
            if self.throttle_mut(kind).poll(now) {
                self.handle(kind, tracer)?;
            }
        }
        Ok(self.next_deadline())
    }

    /// Scroll handler body (not rate-limited): runs a pass and unsubscribes
    /// once nothing is pending.
    pub fn on_scroll(&mut self, tracer: &mut Tracer<'_>) -> Result<PassReport, ActivationError> {
        self.pass_and_quiesce(PassKind::Scroll, tracer)
    }

    /// Resize handler body (not rate-limited): refreshes the viewport cache,
    /// then behaves like [`on_scroll`](Self::on_scroll).
    pub fn on_resize(&mut self, tracer: &mut Tracer<'_>) -> Result<PassReport, ActivationError> {
        self.viewport = self.document.viewport_size();
        self.pass_and_quiesce(PassKind::Resize, tracer)
    }

    /// Rediscovers image and text-region units in every container, replacing
    /// those pending sets. Callback units are kept.
    pub fn rescan(&mut self, tracer: &mut Tracer<'_>) -> RescanSummary {
        let summary = rescan(
            &mut self.pending,
            &self.document,
            &self.containers,
            &self.config,
        );
        tracer.rescan(&RescanEvent {
            images: summary.images,
            regions: summary.regions,
            callbacks: self.pending.callbacks().len(),
        });
        summary
    }

    /// Re-subscribes an idle loader that has pending work again (typically
    /// after [`rescan`](Self::rescan)). Returns whether the loader is now
    /// listening.
    pub fn listen(&mut self, tracer: &mut Tracer<'_>) -> bool {
        if self.state == LoaderState::Idle && !self.pending.is_empty() {
            self.start(tracer);
        }
        self.state == LoaderState::Listening
    }

    /// Unsubscribes and drops pending trailing calls. Terminal.
    pub fn dispose(&mut self, tracer: &mut Tracer<'_>) {
        if self.state == LoaderState::Listening {
            self.stop(tracer);
        }
        self.scroll_throttle.cancel();
        self.resize_throttle.cancel();
        self.state = LoaderState::Disposed;
    }

    /// Replaces the callback set, returning the previous one.
    pub fn replace_callbacks(
        &mut self,
        callbacks: Vec<CallbackUnit<D::Element>>,
    ) -> Vec<CallbackUnit<D::Element>> {
        self.pending.replace_callbacks(callbacks)
    }

    /// Appends one callback unit. An idle loader does not resubscribe on its
    /// own; see [`listen`](Self::listen).
    pub fn push_callback(&mut self, unit: CallbackUnit<D::Element>) {
        self.pending.push_callback(unit);
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// The pending sets.
    #[must_use]
    pub fn pending(&self) -> &PendingSets<D::Element> {
        &self.pending
    }

    /// Total outstanding units.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.pending.outstanding()
    }

    /// The configuration the loader was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The searched containers.
    #[must_use]
    pub fn containers(&self) -> &[Scope<D::Element>] {
        &self.containers
    }

    /// Cached viewport size.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// The document.
    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    /// The document, mutably (e.g. for a test double to move elements).
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// The event source.
    #[must_use]
    pub fn events(&self) -> &S {
        &self.events
    }

    /// Earliest pending trailing-call deadline across both handlers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<HostTime> {
        match (self.scroll_throttle.deadline(), self.resize_throttle.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn handle(&mut self, kind: EventKind, tracer: &mut Tracer<'_>) -> Result<(), ActivationError> {
        match kind {
            EventKind::Scroll => self.on_scroll(tracer),
            EventKind::Resize => self.on_resize(tracer),
        }
        .map(|_| ())
    }

    fn throttle_mut(&mut self, kind: EventKind) -> &mut Throttle {
        match kind {
            EventKind::Scroll => &mut self.scroll_throttle,
            EventKind::Resize => &mut self.resize_throttle,
        }
    }

    fn pass_and_quiesce(
        &mut self,
        kind: PassKind,
        tracer: &mut Tracer<'_>,
    ) -> Result<PassReport, ActivationError> {
        if self.state == LoaderState::Disposed {
            return Ok(PassReport::default());
        }
        let result = self.pass(kind, tracer);
        if self.state == LoaderState::Listening && self.pending.is_empty() {
            self.stop(tracer);
        }
        result
    }

    fn pass(
        &mut self,
        kind: PassKind,
        tracer: &mut Tracer<'_>,
    ) -> Result<PassReport, ActivationError> {
        let pass_index = self.pass_counter;
        self.pass_counter += 1;

        let region = NearRegion::new(
            &self.config,
            self.viewport,
            self.document.scroll_position(),
        );
        tracer.pass_begin(&PassBeginEvent {
            pass_index,
            kind,
            viewport: region.viewport(),
            scroll: region.scroll(),
            outstanding: self.pending.outstanding(),
        });

        let mut report = PassReport::default();
        let result = run_pass_into(
            &mut self.pending,
            &mut self.document,
            &region,
            &self.config,
            pass_index,
            tracer,
            &mut report,
        );

        tracer.pass_end(&PassEndEvent {
            pass_index,
            kind,
            report,
            aborted: result.is_err(),
        });
        result.map(|()| report)
    }

    fn start(&mut self, tracer: &mut Tracer<'_>) {
        for kind in EventKind::ALL {
            self.events.subscribe(kind);
            tracer.listener(&ListenerEvent {
                kind,
                subscribed: true,
            });
        }
        self.state = LoaderState::Listening;
    }

    fn stop(&mut self, tracer: &mut Tracer<'_>) {
        for kind in EventKind::ALL {
            self.events.unsubscribe(kind);
            tracer.listener(&ListenerEvent {
                kind,
                subscribed: false,
            });
        }
        self.scroll_throttle.cancel();
        self.resize_throttle.cancel();
        self.state = LoaderState::Idle;
    }
}

impl<D: Document, S: EventSource> Drop for LazyLoader<D, S> {
    fn drop(&mut self) {
        if self.state == LoaderState::Listening {
            for kind in EventKind::ALL {
                self.events.unsubscribe(kind);
            }
        }
    }
}
