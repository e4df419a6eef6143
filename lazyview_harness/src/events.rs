// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording event source.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use lazyview_core::events::{EventKind, EventSource};

/// One subscribe or unsubscribe call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionChange {
    /// Which notification.
    pub kind: EventKind,
    /// `true` for subscribe.
    pub subscribed: bool,
}

/// An [`EventSource`] that records every call into a shared log.
///
/// Clones share the log, so a test can keep one handle while the loader
/// owns another.
#[derive(Clone, Debug, Default)]
pub struct RecordingEvents {
    log: Rc<RefCell<Vec<SubscriptionChange>>>,
}

impl RecordingEvents {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every change so far, in call order.
    #[must_use]
    pub fn changes(&self) -> Vec<SubscriptionChange> {
        self.log.borrow().clone()
    }

    /// Number of calls so far.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.log.borrow().len()
    }

    /// Whether `kind` is currently subscribed.
    #[must_use]
    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.log
            .borrow()
            .iter()
            .rev()
            .find(|c| c.kind == kind)
            .is_some_and(|c| c.subscribed)
    }

    /// Currently subscribed kinds, in [`EventKind::ALL`] order.
    #[must_use]
    pub fn active(&self) -> Vec<EventKind> {
        EventKind::ALL
            .into_iter()
            .filter(|&kind| self.is_subscribed(kind))
            .collect()
    }
}

impl EventSource for RecordingEvents {
    fn subscribe(&mut self, kind: EventKind) {
        self.log.borrow_mut().push(SubscriptionChange {
            kind,
            subscribed: true,
        });
    }

    fn unsubscribe(&mut self, kind: EventKind) {
        self.log.borrow_mut().push(SubscriptionChange {
            kind,
            subscribed: false,
        });
    }
}
