// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated host loop.
//!
//! [`Driver`] plays the browser around a [`LazyLoader`]: it only delivers
//! scroll and resize notifications while the loader is subscribed, keeps a
//! millisecond clock, and fires the single pending timer when the clock
//! passes its deadline.

use alloc::vec::Vec;

use kurbo::{Size, Vec2};
use lazyview_core::activate::PassReport;
use lazyview_core::config::Config;
use lazyview_core::controller::LazyLoader;
use lazyview_core::error::ActivationError;
use lazyview_core::events::EventKind;
use lazyview_core::time::{HostTime, Timebase};
use lazyview_core::trace::Tracer;
use lazyview_core::unit::{CallbackUnit, Scope};

use crate::events::RecordingEvents;
use crate::page::{NodeId, SimPage};

/// Loader type driven by the harness.
pub type SimLoader = LazyLoader<SimPage, RecordingEvents>;

/// A [`LazyLoader`] on a [`SimPage`] with a manual millisecond clock.
#[derive(Debug)]
pub struct Driver {
    loader: SimLoader,
    events: RecordingEvents,
    now: HostTime,
    timer: Option<HostTime>,
    delivered: usize,
}

impl Driver {
    /// Builds an idle loader over `page`. The clock starts at zero.
    #[must_use]
    pub fn new(
        page: SimPage,
        containers: Vec<Scope<NodeId>>,
        config: Config,
        callbacks: Vec<CallbackUnit<NodeId>>,
    ) -> Self {
        let events = RecordingEvents::new();
        let loader = LazyLoader::new(
            page,
            events.clone(),
            containers,
            config,
            callbacks,
            Timebase::MILLIS,
        );
        Self {
            loader,
            events,
            now: HostTime(0),
            timer: None,
            delivered: 0,
        }
    }

    /// Runs [`LazyLoader::initialize`].
    pub fn initialize(&mut self, tracer: &mut Tracer<'_>) -> Result<PassReport, ActivationError> {
        self.loader.initialize(tracer)
    }

    /// Scrolls the page and delivers a scroll notification if subscribed.
    pub fn scroll_to(&mut self, scroll: Vec2, tracer: &mut Tracer<'_>) -> Result<(), ActivationError> {
        self.loader.document_mut().scroll_to(scroll);
        self.deliver(EventKind::Scroll, tracer)
    }

    /// Resizes the viewport and delivers a resize notification if subscribed.
    pub fn resize(&mut self, viewport: Size, tracer: &mut Tracer<'_>) -> Result<(), ActivationError> {
        self.loader.document_mut().set_viewport(viewport);
        self.deliver(EventKind::Resize, tracer)
    }

    /// Advances the clock by `ms` and fires the pending timer if it is due.
    pub fn advance(&mut self, ms: u64, tracer: &mut Tracer<'_>) -> Result<(), ActivationError> {
        self.now = HostTime(self.now.ticks() + ms);
        match self.timer {
            Some(deadline) if deadline <= self.now => {
                self.timer = None;
                let next = self.loader.poll(self.now, tracer);
                self.arm(next)
            }
            _ => Ok(()),
        }
    }

    fn deliver(&mut self, kind: EventKind, tracer: &mut Tracer<'_>) -> Result<(), ActivationError> {
        if !self.events.is_subscribed(kind) {
            return Ok(());
        }
        self.delivered += 1;
        let next = self.loader.notify(kind, self.now, tracer);
        self.arm(next)
    }

    fn arm(
        &mut self,
        next: Result<Option<HostTime>, ActivationError>,
    ) -> Result<(), ActivationError> {
        // A failed pass may still leave a trailing call scheduled.
        self.timer = self.loader.next_deadline();
        next.map(|_| ())
    }

    /// Current clock value.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.now
    }

    /// Deadline of the pending timer, if armed.
    #[must_use]
    pub fn timer(&self) -> Option<HostTime> {
        self.timer
    }

    /// Notifications actually delivered to the loader.
    #[must_use]
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// The event source log.
    #[must_use]
    pub fn events(&self) -> &RecordingEvents {
        &self.events
    }

    /// The loader.
    #[must_use]
    pub fn loader(&self) -> &SimLoader {
        &self.loader
    }

    /// The loader, mutably.
    pub fn loader_mut(&mut self) -> &mut SimLoader {
        &mut self.loader
    }

    /// The page.
    #[must_use]
    pub fn page(&self) -> &SimPage {
        self.loader.document()
    }

    /// The page, mutably.
    pub fn page_mut(&mut self) -> &mut SimPage {
        self.loader.document_mut()
    }
}
