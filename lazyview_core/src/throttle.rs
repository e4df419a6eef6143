// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trailing-edge rate limiting.
//!
//! [`Throttle`] collapses bursts of calls into at most one firing per
//! interval. It owns no timer: callers feed it host time and arm a wake-up
//! for the deadline it reports.
//!
//! ```text
//!   call ──► outside window? ──yes──► FireNow (last = now, trailing cleared)
//!                │
//!                no
//!                ▼
//!            Scheduled(last + interval)   (replaces any earlier trailing call)
//!
//!   poll(now >= deadline) ──► fire (last = now)
//! ```
//!
//! Notifications carry no payload, so "most recent call wins" reduces to
//! "at most one trailing firing per window".

use crate::time::{Duration, HostTime};

/// Result of [`Throttle::call`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThrottleDecision {
    /// Outside the window: invoke the wrapped function now.
    FireNow,
    /// Inside the window: a trailing invocation is due at the given time.
    Scheduled(HostTime),
}

/// Trailing-edge throttle state for one handler.
#[derive(Clone, Copy, Debug)]
pub struct Throttle {
    interval: Duration,
    last_fired: Option<HostTime>,
    trailing: Option<HostTime>,
}

impl Throttle {
    /// Creates a throttle that fires at most once per `interval`.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            trailing: None,
        }
    }

    /// The configured interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Registers a call at `now`.
    pub fn call(&mut self, now: HostTime) -> ThrottleDecision {
        match self.window_end() {
            Some(end) if now < end => {
                self.trailing = Some(end);
                ThrottleDecision::Scheduled(end)
            }
            _ => {
                self.last_fired = Some(now);
                self.trailing = None;
                ThrottleDecision::FireNow
            }
        }
    }

    /// Consumes a due trailing call. Returns `true` if the caller should
    /// invoke the wrapped function now.
    pub fn poll(&mut self, now: HostTime) -> bool {
        match self.trailing {
            Some(due) if now >= due => {
                self.trailing = None;
                self.last_fired = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Deadline of the pending trailing call, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<HostTime> {
        self.trailing
    }

    /// Drops any pending trailing call. The window itself stays in effect.
    pub fn cancel(&mut self) {
        self.trailing = None;
    }

    fn window_end(&self) -> Option<HostTime> {
        self.last_fired.map(|t| t.saturating_add(self.interval))
    }
}
