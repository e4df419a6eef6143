// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Activation passes.
//!
//! A pass visits the image set, then the text-region set, then the callback
//! set. Each set is *partitioned*: every unit yields an [`Outcome`], deferred
//! units become the new set (order preserved), the rest are dropped. This is
//! the only place pending sets shrink.
//!
//! Per-kind activation:
//!
//! | Kind | Not near | Near |
//! |---|---|---|
//! | Image | deferred | marker non-empty: copy to `src`, strip marker → activated. Marker empty → deferred. Marker gone → discarded. |
//! | Text region | deferred | marker class present: insert the text before it, strip class, hide → activated. Class gone → discarded. |
//! | Callback | deferred | action invoked with the target → activated |
//!
//! Callback targets are resolved before the geometry check; an unresolvable
//! target is discarded without firing.
//!
//! Caller errors are not caught. The failing unit is dropped, units visited
//! earlier stay dropped, and every unit not yet visited (including the
//! remaining sets) stays pending.

use alloc::vec::Vec;

use crate::config::Config;
use crate::error::{ActivationError, BoxError};
use crate::host::Document;
use crate::intersect::{NearRegion, is_near};
use crate::registry::PendingSets;
use crate::trace::Tracer;
use crate::unit::{CallbackUnit, Outcome, UnitKind};

/// Attribute receiving the deferred source when an image activates.
pub const LIVE_SOURCE_ATTRIBUTE: &str = "src";

/// Per-kind counts for one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    activated: [usize; 3],
    deferred: [usize; 3],
    discarded: [usize; 3],
    /// Units still pending across all sets after the pass.
    pub outstanding: usize,
}

impl PassReport {
    /// Units of `kind` activated in this pass.
    #[must_use]
    pub const fn activated(&self, kind: UnitKind) -> usize {
        self.activated[kind.index()]
    }

    /// Units of `kind` left pending by this pass.
    #[must_use]
    pub const fn deferred(&self, kind: UnitKind) -> usize {
        self.deferred[kind.index()]
    }

    /// Units of `kind` dropped without activation in this pass.
    #[must_use]
    pub const fn discarded(&self, kind: UnitKind) -> usize {
        self.discarded[kind.index()]
    }

    /// Units activated across all kinds.
    #[must_use]
    pub fn total_activated(&self) -> usize {
        self.activated.iter().sum()
    }

    /// Units dropped without activation across all kinds.
    #[must_use]
    pub fn total_discarded(&self) -> usize {
        self.discarded.iter().sum()
    }

    fn record(&mut self, kind: UnitKind, outcome: Outcome) {
        let counts = match outcome {
            Outcome::Activated => &mut self.activated,
            Outcome::Deferred => &mut self.deferred,
            Outcome::Discarded => &mut self.discarded,
        };
        counts[kind.index()] += 1;
    }
}

/// Runs one activation pass over all three pending sets.
pub fn run_pass<D: Document + ?Sized>(
    pending: &mut PendingSets<D::Element>,
    document: &mut D,
    region: &NearRegion,
    config: &Config,
    pass_index: u64,
    tracer: &mut Tracer<'_>,
) -> Result<PassReport, ActivationError> {
    let mut report = PassReport::default();
    run_pass_into(
        pending,
        document,
        region,
        config,
        pass_index,
        tracer,
        &mut report,
    )?;
    Ok(report)
}

/// Like [`run_pass`], but accumulates into a caller-provided report so that
/// partial counts survive an aborted pass.
pub fn run_pass_into<D: Document + ?Sized>(
    pending: &mut PendingSets<D::Element>,
    document: &mut D,
    region: &NearRegion,
    config: &Config,
    pass_index: u64,
    tracer: &mut Tracer<'_>,
    report: &mut PassReport,
) -> Result<(), ActivationError> {
    let result = visit_sets(pending, document, region, config, pass_index, tracer, report);
    report.outstanding = pending.outstanding();
    result
}

fn visit_sets<D: Document + ?Sized>(
    pending: &mut PendingSets<D::Element>,
    document: &mut D,
    region: &NearRegion,
    config: &Config,
    pass_index: u64,
    tracer: &mut Tracer<'_>,
    report: &mut PassReport,
) -> Result<(), ActivationError> {
    partition(
        &mut pending.images,
        UnitKind::Image,
        pass_index,
        tracer,
        report,
        |el| Ok(activate_image(document, region, config, el)),
    )?;
    partition(
        &mut pending.regions,
        UnitKind::TextRegion,
        pass_index,
        tracer,
        report,
        |el| Ok(activate_region(document, region, config, el)),
    )?;
    partition(
        &mut pending.callbacks,
        UnitKind::Callback,
        pass_index,
        tracer,
        report,
        |unit| activate_callback(document, region, unit),
    )
}

fn activate_image<D: Document + ?Sized>(
    document: &mut D,
    region: &NearRegion,
    config: &Config,
    element: &D::Element,
) -> Outcome {
    if !is_near(&*document, region, element) {
        return Outcome::Deferred;
    }
    let marker = &config.pending_source_marker;
    match document.attribute(element, marker) {
        Some(source) if !source.is_empty() => {
            document.set_attribute(element, LIVE_SOURCE_ATTRIBUTE, &source);
            document.remove_attribute(element, marker);
            Outcome::Activated
        }
        // Present but not populated yet.
        Some(_) => Outcome::Deferred,
        // Activated through another (nested) container.
        None => Outcome::Discarded,
    }
}

fn activate_region<D: Document + ?Sized>(
    document: &mut D,
    region: &NearRegion,
    config: &Config,
    element: &D::Element,
) -> Outcome {
    if !is_near(&*document, region, element) {
        return Outcome::Deferred;
    }
    let class = &config.marker_class;
    if !document.has_class(element, class) {
        return Outcome::Discarded;
    }
    let text = document.text_value(element);
    document.insert_text_before(element, &text);
    document.remove_class(element, class);
    document.hide(element);
    Outcome::Activated
}

fn activate_callback<D: Document + ?Sized>(
    document: &mut D,
    region: &NearRegion,
    unit: &mut CallbackUnit<D::Element>,
) -> Result<Outcome, BoxError> {
    let Some(element) = document.resolve_target(&unit.target) else {
        return Ok(Outcome::Discarded);
    };
    if !is_near(&*document, region, &element) {
        return Ok(Outcome::Deferred);
    }
    unit.fire(&element)?;
    Ok(Outcome::Activated)
}

/// Splits `set` into retained and dropped units, keeping the retained ones.
fn partition<T>(
    set: &mut Vec<T>,
    kind: UnitKind,
    pass_index: u64,
    tracer: &mut Tracer<'_>,
    report: &mut PassReport,
    mut visit: impl FnMut(&mut T) -> Result<Outcome, BoxError>,
) -> Result<(), ActivationError> {
    let units = core::mem::take(set);
    let mut retained = Vec::with_capacity(units.len());
    let mut rest = units.into_iter().enumerate();

    while let Some((position, mut unit)) = rest.next() {
        match visit(&mut unit) {
            Ok(outcome) => {
                report.record(kind, outcome);
                emit_unit(tracer, pass_index, kind, position, outcome);
                if outcome.is_retained() {
                    retained.push(unit);
                }
            }
            Err(source) => {
                // The action ran, so the unit counts as activated and leaves
                // the set like any other activated unit.
                report.record(kind, Outcome::Activated);
                emit_unit(tracer, pass_index, kind, position, Outcome::Activated);
                retained.extend(rest.map(|(_, unit)| unit));
                *set = retained;
                return Err(ActivationError::Action {
                    kind,
                    position,
                    source,
                });
            }
        }
    }

    *set = retained;
    Ok(())
}

#[inline]
fn emit_unit(
    tracer: &mut Tracer<'_>,
    pass_index: u64,
    kind: UnitKind,
    position: usize,
    outcome: Outcome,
) {
    #[cfg(feature = "trace-rich")]
    tracer.unit(&crate::trace::UnitEvent {
        pass_index,
        kind,
        position,
        outcome,
    });
    #[cfg(not(feature = "trace-rich"))]
    {
        _ = (tracer, pass_index, kind, position, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::String;
    use core::cell::Cell;

    use kurbo::{Size, Vec2};

    use crate::registry::rescan;
    use crate::testing::FakePage;
    use crate::unit::Scope;

    #[derive(Debug)]
    struct Boom;

    impl core::fmt::Display for Boom {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.write_str("boom")
        }
    }

    impl core::error::Error for Boom {}

    fn pass(pending: &mut PendingSets<usize>, page: &mut FakePage) -> PassReport {
        let config = Config::default();
        let region = NearRegion::new(&config, page.viewport, page.scroll);
        run_pass(pending, page, &region, &config, 0, &mut Tracer::none())
            .expect("no caller actions fail")
    }

    fn discover(page: &FakePage, callbacks: Vec<CallbackUnit<usize>>) -> PendingSets<usize> {
        let mut pending = PendingSets::with_callbacks(callbacks);
        rescan(&mut pending, page, &[Scope::Document], &Config::default());
        pending
    }

    #[test]
    fn near_image_swaps_source_and_strips_marker() {
        let mut page = FakePage::new(Size::new(800.0, 600.0));
        let img = page.image(None, 50.0, "hero.png");
        let mut pending = discover(&page, Vec::new());

        let report = pass(&mut pending, &mut page);
        assert_eq!(report.activated(UnitKind::Image), 1);
        assert!(pending.images().is_empty(), "image left the pending set");
        assert_eq!(page.attribute(&img, "src").as_deref(), Some("hero.png"));
        assert_eq!(page.attribute(&img, "data-lazyview-src"), None);

        // Marker stripped, so it is not rediscovered.
        let pending = discover(&page, Vec::new());
        assert!(pending.images().is_empty(), "not rediscovered");
    }

    #[test]
    fn empty_marker_keeps_image_pending() {
        let mut page = FakePage::new(Size::new(800.0, 600.0));
        let img = page.image(None, 50.0, "");
        let mut pending = discover(&page, Vec::new());

        let report = pass(&mut pending, &mut page);
        assert_eq!(report.deferred(UnitKind::Image), 1);
        assert_eq!(pending.images(), &[img]);

        page.set_attribute(&img, "data-lazyview-src", "late.png");
        pass(&mut pending, &mut page);
        assert!(pending.images().is_empty(), "activated once populated");
        assert_eq!(page.attribute(&img, "src").as_deref(), Some("late.png"));
    }

    #[test]
    fn far_units_are_retained_in_order() {
        let mut page = FakePage::new(Size::new(800.0, 600.0));
        let a = page.image(None, 5000.0, "a.png");
        page.image(None, 10.0, "b.png");
        let c = page.image(None, 9000.0, "c.png");
        let mut pending = discover(&page, Vec::new());

        let report = pass(&mut pending, &mut page);
        assert_eq!(report.activated(UnitKind::Image), 1);
        assert_eq!(pending.images(), &[a, c], "order preserved");
        assert_eq!(report.outstanding, 2);
    }

    #[test]
    fn region_materializes_text_and_hides() {
        let mut page = FakePage::new(Size::new(800.0, 600.0));
        let r = page.region(None, 100.0, "<p>hello</p>");
        let mut pending = discover(&page, Vec::new());

        pass(&mut pending, &mut page);
        assert!(pending.regions().is_empty(), "region activated");
        assert_eq!(page.inserted, &[(r, String::from("<p>hello</p>"))]);
        assert!(!page.has_class(&r, "lazyview-deferred"), "class stripped");
        assert!(page.elements[r].hidden, "source element hidden");
    }

    #[test]
    fn region_without_class_is_discarded() {
        let mut page = FakePage::new(Size::new(800.0, 600.0));
        let r = page.region(None, 100.0, "text");
        let mut pending = discover(&page, Vec::new());
        page.remove_class(&r, "lazyview-deferred");

        let report = pass(&mut pending, &mut page);
        assert_eq!(report.discarded(UnitKind::TextRegion), 1);
        assert!(page.inserted.is_empty(), "nothing materialized");
    }

    #[test]
    fn hidden_units_never_activate() {
        let mut page = FakePage::new(Size::new(800.0, 600.0));
        let img = page.image(None, 10.0, "a.png");
        page.elements[img].size = Size::new(0.0, 0.0);
        let mut pending = discover(&page, Vec::new());

        for _ in 0..3 {
            pass(&mut pending, &mut page);
        }
        assert_eq!(pending.images(), &[img], "still pending");
        assert_eq!(page.attribute(&img, "src"), None);
    }

    #[test]
    fn stale_callback_target_is_discarded_without_firing() {
        let mut page = FakePage::new(Size::new(800.0, 600.0));
        let el = page.plain(10.0, "panel");
        page.elements[el].attached = false;
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let mut pending = discover(
            &page,
            alloc::vec![CallbackUnit::for_element(el, move |_| {
                counter.set(counter.get() + 1);
                Ok(())
            })],
        );

        let report = pass(&mut pending, &mut page);
        assert_eq!(report.discarded(UnitKind::Callback), 1);
        assert_eq!(fired.get(), 0, "never fired");
        assert!(pending.is_empty(), "not retried");
    }

    #[test]
    fn callback_fires_once_with_resolved_target() {
        let mut page = FakePage::new(Size::new(800.0, 600.0));
        let el = page.plain(10.0, "widget");
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        let mut pending = discover(
            &page,
            alloc::vec![CallbackUnit::for_selector("#widget", move |target: &usize| {
                sink.set(Some(*target));
                Ok(())
            })],
        );

        pass(&mut pending, &mut page);
        pass(&mut pending, &mut page);
        assert_eq!(seen.get(), Some(el), "fired with the target as context");
        assert!(pending.is_empty());
    }

    #[test]
    fn caller_error_propagates_and_keeps_unvisited_units() {
        let mut page = FakePage::new(Size::new(800.0, 600.0));
        page.image(None, 10.0, "a.png");
        let first = page.plain(10.0, "first");
        let second = page.plain(20.0, "second");
        let third = page.plain(30.0, "third");
        let ran = Rc::new(Cell::new(0));
        let (r1, r3) = (Rc::clone(&ran), Rc::clone(&ran));
        let mut pending = discover(
            &page,
            alloc::vec![
                CallbackUnit::for_element(first, move |_| {
                    r1.set(r1.get() + 1);
                    Ok(())
                }),
                CallbackUnit::for_element(second, |_| Err(Boom.into())),
                CallbackUnit::for_element(third, move |_| {
                    r3.set(r3.get() + 1);
                    Ok(())
                }),
            ],
        );

        let config = Config::default();
        let region = NearRegion::new(&config, page.viewport, Vec2::ZERO);
        let mut report = PassReport::default();
        let err = run_pass_into(
            &mut pending,
            &mut page,
            &region,
            &config,
            0,
            &mut Tracer::none(),
            &mut report,
        )
        .expect_err("second callback fails");

        match err {
            ActivationError::Action { kind, position, .. } => {
                assert_eq!(kind, UnitKind::Callback);
                assert_eq!(position, 1);
            }
        }
        assert_eq!(ran.get(), 1, "third callback not reached");
        assert!(pending.images().is_empty(), "earlier set stays processed");
        assert_eq!(pending.callbacks().len(), 1, "only the unvisited unit remains");
        assert_eq!(report.activated(UnitKind::Image), 1, "partial report kept");
        assert_eq!(report.outstanding, 1);
    }

    #[test]
    fn sets_never_grow_across_passes() {
        let mut page = FakePage::new(Size::new(800.0, 600.0));
        for i in 0..10 {
            page.image(None, f64::from(i) * 400.0, "x.png");
        }
        let mut pending = discover(&page, Vec::new());
        let mut last = pending.outstanding();
        for step in 0..10 {
            page.scroll = Vec2::new(0.0, f64::from(step) * 400.0);
            pass(&mut pending, &mut page);
            assert!(pending.outstanding() <= last, "monotonic shrink");
            last = pending.outstanding();
        }
        assert_eq!(last, 0, "everything activated after scrolling through");
    }
}
