// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps a copy of every event
//! as a [`RecordedEvent`], in emission order. Useful for asserting on the
//! lifecycle from tests and for replaying into another sink.

use lazyview_core::trace::{
    ListenerEvent, NotifyEvent, PassBeginEvent, PassEndEvent, RescanEvent, TraceSink, UnitEvent,
};

/// One recorded trace event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// See [`TraceSink::on_notify`].
    Notify(NotifyEvent),
    /// See [`TraceSink::on_rescan`].
    Rescan(RescanEvent),
    /// See [`TraceSink::on_pass_begin`].
    PassBegin(PassBeginEvent),
    /// See [`TraceSink::on_pass_end`].
    PassEnd(PassEndEvent),
    /// See [`TraceSink::on_listener`].
    Listener(ListenerEvent),
    /// See [`TraceSink::on_unit`].
    Unit(UnitEvent),
}

impl RecordedEvent {
    /// Forwards this event to `sink`.
    pub fn replay(&self, sink: &mut dyn TraceSink) {
        match self {
            Self::Notify(e) => sink.on_notify(e),
            Self::Rescan(e) => sink.on_rescan(e),
            Self::PassBegin(e) => sink.on_pass_begin(e),
            Self::PassEnd(e) => sink.on_pass_end(e),
            Self::Listener(e) => sink.on_listener(e),
            Self::Unit(e) => sink.on_unit(e),
        }
    }
}

/// A [`TraceSink`] that stores every event in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Drops everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Iterates over the recorded pass-end events.
    pub fn pass_ends(&self) -> impl Iterator<Item = &PassEndEvent> {
        self.events.iter().filter_map(|e| match e {
            RecordedEvent::PassEnd(end) => Some(end),
            _ => None,
        })
    }

    /// Iterates over the recorded listener changes.
    pub fn listener_changes(&self) -> impl Iterator<Item = &ListenerEvent> {
        self.events.iter().filter_map(|e| match e {
            RecordedEvent::Listener(change) => Some(change),
            _ => None,
        })
    }

    /// Replays every recorded event into `sink`.
    pub fn replay_into(&self, sink: &mut dyn TraceSink) {
        for event in &self.events {
            event.replay(sink);
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_notify(&mut self, e: &NotifyEvent) {
        self.events.push(RecordedEvent::Notify(*e));
    }

    fn on_rescan(&mut self, e: &RescanEvent) {
        self.events.push(RecordedEvent::Rescan(*e));
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.events.push(RecordedEvent::PassBegin(*e));
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.events.push(RecordedEvent::PassEnd(*e));
    }

    fn on_listener(&mut self, e: &ListenerEvent) {
        self.events.push(RecordedEvent::Listener(*e));
    }

    fn on_unit(&mut self, e: &UnitEvent) {
        self.events.push(RecordedEvent::Unit(*e));
    }
}
