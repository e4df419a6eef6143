// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Newline-delimited JSON export.
//!
//! [`JsonLinesSink`] writes each event as a single JSON object followed by a
//! newline. Every object carries an `"event"` tag; times are in
//! milliseconds converted through a [`Timebase`]. Write errors are counted
//! rather than propagated, since [`TraceSink`] methods cannot fail.

use std::io::Write;

use serde_json::{Map, Value, json};

use lazyview_core::activate::PassReport;
use lazyview_core::time::{HostTime, Timebase};
use lazyview_core::trace::{
    ListenerEvent, NotifyEvent, PassBeginEvent, PassEndEvent, RescanEvent, TraceSink, UnitEvent,
};
use lazyview_core::unit::{Outcome, UnitKind};

/// Writes one JSON object per event to a [`Write`](std::io::Write) destination.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    timebase: Timebase,
    write_errors: usize,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("timebase", &self.timebase)
            .field("write_errors", &self.write_errors)
            .finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn new(writer: W, timebase: Timebase) -> Self {
        Self {
            writer,
            timebase,
            write_errors: 0,
        }
    }

    /// Number of events that could not be written.
    #[must_use]
    pub fn write_errors(&self) -> usize {
        self.write_errors
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ms(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1_000_000.0
    }

    fn emit(&mut self, value: &Value) {
        let written = serde_json::to_writer(&mut self.writer, value)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if written.is_err() {
            self.write_errors += 1;
        }
    }
}

fn outcome_name(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Activated => "activated",
        Outcome::Deferred => "deferred",
        Outcome::Discarded => "discarded",
    }
}

fn report_json(report: &PassReport) -> Value {
    let mut per_kind = Map::new();
    for kind in UnitKind::ALL {
        per_kind.insert(
            kind.as_str().to_owned(),
            json!({
                "activated": report.activated(kind),
                "deferred": report.deferred(kind),
                "discarded": report.discarded(kind),
            }),
        );
    }
    per_kind.insert("outstanding".to_owned(), json!(report.outstanding));
    Value::Object(per_kind)
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_notify(&mut self, e: &NotifyEvent) {
        let value = json!({
            "event": "notify",
            "kind": e.kind.as_str(),
            "at_ms": self.ms(e.at),
            "fired": e.fired,
            "trailing_ms": e.trailing_deadline.map(|t| self.ms(t)),
        });
        self.emit(&value);
    }

    fn on_rescan(&mut self, e: &RescanEvent) {
        self.emit(&json!({
            "event": "rescan",
            "images": e.images,
            "regions": e.regions,
            "callbacks": e.callbacks,
        }));
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.emit(&json!({
            "event": "pass_begin",
            "pass": e.pass_index,
            "kind": e.kind.as_str(),
            "viewport": [e.viewport.width, e.viewport.height],
            "scroll": [e.scroll.x, e.scroll.y],
            "outstanding": e.outstanding,
        }));
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.emit(&json!({
            "event": "pass_end",
            "pass": e.pass_index,
            "kind": e.kind.as_str(),
            "report": report_json(&e.report),
            "aborted": e.aborted,
        }));
    }

    fn on_listener(&mut self, e: &ListenerEvent) {
        self.emit(&json!({
            "event": "listener",
            "kind": e.kind.as_str(),
            "subscribed": e.subscribed,
        }));
    }

    fn on_unit(&mut self, e: &UnitEvent) {
        self.emit(&json!({
            "event": "unit",
            "pass": e.pass_index,
            "kind": e.kind.as_str(),
            "position": e.position,
            "outcome": outcome_name(e.outcome),
        }));
    }
}
