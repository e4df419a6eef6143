// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-call wiring of a [`LazyLoader`] to the browser.
//!
//! ```text
//!   window "scroll"/"resize" ──► WindowListener ──► notify(kind, now())
//!                                                      │
//!                              setTimeout ◄── arm(next_deadline)
//!                                  │
//!                                  └──► poll(now())
//! ```
//!
//! The loader lives in an `Rc` shared with nothing but [`Weak`] references
//! held by the JS closures, so dropping the [`Installation`] unsubscribes
//! everything and frees the closures.
//!
//! Caller actions run while the loader is borrowed. An action must not call
//! back into the [`Installation`]; a re-entrant dispatch is logged and
//! dropped, and a re-entrant read returns `None`.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use lazyview_core::activate::PassReport;
use lazyview_core::config::Config;
use lazyview_core::controller::{LazyLoader, LoaderState};
use lazyview_core::error::ActivationError;
use lazyview_core::registry::RescanSummary;
use lazyview_core::trace::{NoopSink, TraceSink, Tracer};
use lazyview_core::unit::{CallbackUnit, Scope};
use web_sys::Element;

use crate::document::DomDocument;
use crate::listener::WindowListener;
use crate::wake::TimeoutWake;

/// The loader type the web backend drives.
pub type WebLoader = LazyLoader<DomDocument, WindowListener>;

struct Shared {
    loader: RefCell<WebLoader>,
    sink: RefCell<Box<dyn TraceSink>>,
    wake: TimeoutWake,
}

impl Shared {
    /// Runs `f` against the loader, logs a caller error, then re-arms or
    /// cancels the wake from the loader's next trailing deadline.
    fn dispatch<R>(
        &self,
        f: impl FnOnce(&mut WebLoader, &mut Tracer<'_>) -> Result<R, ActivationError>,
    ) -> Option<R> {
        let (Ok(mut loader), Ok(mut sink)) = (self.loader.try_borrow_mut(), self.sink.try_borrow_mut())
        else {
            log::warn!("lazyview: re-entrant dispatch dropped");
            return None;
        };
        let mut tracer = Tracer::new(&mut **sink);
        let result = f(&mut loader, &mut tracer);
        match loader.next_deadline() {
            Some(deadline) => self.wake.arm(deadline),
            None => self.wake.cancel(),
        }
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                log_activation_error(&err);
                None
            }
        }
    }
}

/// Reads through `cell` unless it is mutably borrowed by a running dispatch.
fn peek<T, R>(cell: &RefCell<T>, f: impl FnOnce(&T) -> R) -> Option<R> {
    match cell.try_borrow() {
        Ok(value) => Some(f(&value)),
        Err(_) => {
            log::warn!("lazyview: re-entrant read dropped");
            None
        }
    }
}

fn log_activation_error(err: &ActivationError) {
    match core::error::Error::source(err) {
        Some(source) => log::error!("lazyview: {err}: {source}"),
        None => log::error!("lazyview: {err}"),
    }
}

/// A loader installed on the page.
///
/// Dropping it removes the window listeners and cancels any pending timer.
pub struct Installation {
    shared: Rc<Shared>,
}

/// Installs a loader on `document`'s window and runs its initial pass.
///
/// An empty `containers` list searches the whole document.
#[must_use]
pub fn install(
    document: DomDocument,
    containers: Vec<Scope<Element>>,
    config: Config,
    callbacks: Vec<CallbackUnit<Element>>,
) -> Installation {
    install_with_sink(document, containers, config, callbacks, Box::new(NoopSink))
}

/// Like [`install`], routing trace events to `sink` (effective only with the
/// `lazyview_core/trace` feature).
#[must_use]
pub fn install_with_sink(
    document: DomDocument,
    containers: Vec<Scope<Element>>,
    config: Config,
    callbacks: Vec<CallbackUnit<Element>>,
    sink: Box<dyn TraceSink>,
) -> Installation {
    let window = document.window().clone();
    let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
        let on_event = weak.clone();
        let listener = WindowListener::new(window.clone().into(), move |kind| {
            if let Some(shared) = on_event.upgrade() {
                shared.dispatch(|loader, tracer| loader.notify(kind, crate::now(), tracer));
            }
        });
        let on_wake = weak.clone();
        let wake = TimeoutWake::new(window, move || {
            if let Some(shared) = on_wake.upgrade() {
                shared.wake.fired();
                shared.dispatch(|loader, tracer| loader.poll(crate::now(), tracer));
            }
        });
        let loader = LazyLoader::new(
            document,
            listener,
            containers,
            config,
            callbacks,
            crate::timebase(),
        );
        Shared {
            loader: RefCell::new(loader),
            sink: RefCell::new(sink),
            wake,
        }
    });
    shared.dispatch(|loader, tracer| loader.initialize(tracer));
    Installation { shared }
}

impl Installation {
    /// Current loader state, or `None` when called from inside a caller
    /// action.
    #[must_use]
    pub fn state(&self) -> Option<LoaderState> {
        peek(&self.shared.loader, WebLoader::state)
    }

    /// Total outstanding units, or `None` when called from inside a caller
    /// action.
    #[must_use]
    pub fn outstanding(&self) -> Option<usize> {
        peek(&self.shared.loader, WebLoader::outstanding)
    }

    /// Rediscovers units (e.g. after content was appended) and resubscribes
    /// if the loader had gone idle.
    pub fn refresh(&self) -> Option<RescanSummary> {
        self.shared.dispatch(|loader, tracer| {
            let summary = loader.rescan(tracer);
            loader.listen(tracer);
            Ok(summary)
        })
    }

    /// Runs an unthrottled scroll pass now.
    pub fn check_now(&self) -> Option<PassReport> {
        self.shared
            .dispatch(|loader, tracer| loader.on_scroll(tracer))
    }

    /// Adds a callback unit and resubscribes if the loader had gone idle.
    pub fn push_callback(&self, unit: CallbackUnit<Element>) {
        self.shared.dispatch(|loader, tracer| {
            loader.push_callback(unit);
            loader.listen(tracer);
            Ok(())
        });
    }

    /// Tears the loader down. Terminal.
    pub fn dispose(&self) {
        self.shared.dispatch(|loader, tracer| {
            loader.dispose(tracer);
            Ok(())
        });
    }
}

impl core::fmt::Debug for Installation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.shared.loader.try_borrow() {
            Ok(loader) => f
                .debug_struct("Installation")
                .field("loader", &*loader)
                .field("wake", &self.shared.wake)
                .finish(),
            Err(_) => f.debug_struct("Installation").finish_non_exhaustive(),
        }
    }
}
