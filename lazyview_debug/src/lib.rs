// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, JSON-lines export and in-memory recording for lazyview
//! diagnostics.
//!
//! This crate provides [`TraceSink`](lazyview_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`json::JsonLinesSink`]: one JSON object per event, newline-delimited.
//! - [`recorder::RecorderSink`]: keeps every event in memory as a
//!   [`recorder::RecordedEvent`] for assertions and replay.

pub mod json;
pub mod pretty;
pub mod recorder;
