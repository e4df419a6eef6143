// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use lazyview_core::activate::PassReport;
use lazyview_core::time::{HostTime, Timebase};
use lazyview_core::trace::{
    ListenerEvent, NotifyEvent, PassBeginEvent, PassEndEvent, RescanEvent, TraceSink, UnitEvent,
};
use lazyview_core::unit::{Outcome, UnitKind};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn host_ms(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1_000_000.0
    }
}

fn outcome_name(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Activated => "activated",
        Outcome::Deferred => "deferred",
        Outcome::Discarded => "discarded",
    }
}

/// `image=a/d/x region=a/d/x callback=a/d/x` (activated/deferred/discarded).
fn counts(report: &PassReport) -> String {
    UnitKind::ALL
        .iter()
        .map(|&kind| {
            format!(
                "{}={}/{}/{}",
                kind.as_str(),
                report.activated(kind),
                report.deferred(kind),
                report.discarded(kind),
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_notify(&mut self, e: &NotifyEvent) {
        let verdict = match e.trailing_deadline {
            _ if e.fired => "fired".to_owned(),
            Some(at) => format!("trailing@{:.1}ms", self.host_ms(at)),
            None => "dropped".to_owned(),
        };
        let _ = writeln!(
            self.writer,
            "[notify] {} at {:.1}ms {verdict}",
            e.kind.as_str(),
            self.host_ms(e.at),
        );
    }

    fn on_rescan(&mut self, e: &RescanEvent) {
        let _ = writeln!(
            self.writer,
            "[rescan] images={} regions={} callbacks={}",
            e.images, e.regions, e.callbacks,
        );
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:begin] #{} {} viewport={}x{} scroll=({},{}) outstanding={}",
            e.pass_index,
            e.kind.as_str(),
            e.viewport.width,
            e.viewport.height,
            e.scroll.x,
            e.scroll.y,
            e.outstanding,
        );
    }

    fn on_unit(&mut self, e: &UnitEvent) {
        let _ = writeln!(
            self.writer,
            "[unit] #{} {}[{}] {}",
            e.pass_index,
            e.kind.as_str(),
            e.position,
            outcome_name(e.outcome),
        );
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        let aborted = if e.aborted { " ABORTED" } else { "" };
        let _ = writeln!(
            self.writer,
            "[pass:end] #{} {} {} outstanding={}{aborted}",
            e.pass_index,
            e.kind.as_str(),
            counts(&e.report),
            e.report.outstanding,
        );
    }

    fn on_listener(&mut self, e: &ListenerEvent) {
        let sign = if e.subscribed { '+' } else { '-' };
        let _ = writeln!(self.writer, "[listen] {sign}{}", e.kind.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Size, Vec2};
    use lazyview_core::events::EventKind;
    use lazyview_core::trace::PassKind;

    fn lines(f: impl FnOnce(&mut PrettyPrintSink<Vec<u8>>)) -> Vec<String> {
        let mut sink = PrettyPrintSink::with_writer(Vec::new(), Timebase::MICROS);
        f(&mut sink);
        String::from_utf8(sink.into_inner())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn pass_lines() {
        let out = lines(|sink| {
            sink.on_pass_begin(&PassBeginEvent {
                pass_index: 0,
                kind: PassKind::Initial,
                viewport: Size::new(800.0, 600.0),
                scroll: Vec2::ZERO,
                outstanding: 3,
            });
            sink.on_pass_end(&PassEndEvent {
                pass_index: 0,
                kind: PassKind::Initial,
                report: PassReport::default(),
                aborted: true,
            });
        });
        assert_eq!(
            out[0], "[pass:begin] #0 initial viewport=800x600 scroll=(0,0) outstanding=3",
            "begin line"
        );
        assert!(out[1].starts_with("[pass:end] #0 initial image=0/0/0"), "{}", out[1]);
        assert!(out[1].ends_with("outstanding=0 ABORTED"), "{}", out[1]);
    }

    #[test]
    fn notify_and_listener_lines() {
        let out = lines(|sink| {
            sink.on_notify(&NotifyEvent {
                kind: EventKind::Scroll,
                at: HostTime(100_000),
                fired: false,
                trailing_deadline: Some(HostTime(400_000)),
            });
            sink.on_listener(&ListenerEvent {
                kind: EventKind::Resize,
                subscribed: false,
            });
        });
        assert_eq!(out[0], "[notify] scroll at 100.0ms trailing@400.0ms", "notify");
        assert_eq!(out[1], "[listen] -resize", "listener");
    }
}
