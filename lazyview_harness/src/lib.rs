// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic test doubles for lazyview.
//!
//! - [`SimPage`]: an in-memory [`Document`](lazyview_core::host::Document)
//!   with nested elements, attributes, classes and display state.
//! - [`RecordingEvents`]: an [`EventSource`](lazyview_core::events::EventSource)
//!   that logs every subscription change.
//! - [`Driver`]: a host loop with a manual millisecond clock that delivers
//!   notifications only while subscribed and fires the trailing-call timer.

#![no_std]

extern crate alloc;

mod driver;
mod events;
mod page;

pub use driver::{Driver, SimLoader};
pub use events::{RecordingEvents, SubscriptionChange};
pub use page::{DEFAULT_NODE_SIZE, Node, NodeId, SimPage, Tag};
