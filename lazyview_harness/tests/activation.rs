// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Activation-pass scenarios against the in-memory page.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use lazyview_core::config::{Config, DEFAULT_SOURCE_MARKER};
use lazyview_core::controller::LoaderState;
use lazyview_core::error::{ActionResult, ActivationError};
use lazyview_core::host::Document;
use lazyview_core::trace::Tracer;
use lazyview_core::unit::{CallbackUnit, UnitKind};
use lazyview_harness::{Driver, NodeId, SimPage};

#[derive(Debug, thiserror::Error)]
#[error("render failed")]
struct RenderFailed;

fn counter() -> (Rc<Cell<u32>>, impl FnMut(&NodeId) -> ActionResult + 'static) {
    let count = Rc::new(Cell::new(0));
    let inner = Rc::clone(&count);
    (count, move |_: &NodeId| -> ActionResult {
        inner.set(inner.get() + 1);
        Ok(())
    })
}

fn driver(page: SimPage, config: Config, callbacks: Vec<CallbackUnit<NodeId>>) -> Driver {
    Driver::new(page, Vec::new(), config, callbacks)
}

#[test]
fn initial_pass_loads_image_above_the_fold() {
    let mut page = SimPage::new(Size::new(1024.0, 600.0));
    let img = page.image(None, Point::new(0.0, 50.0), "hero.jpg");
    let mut d = driver(page, Config::default(), Vec::new());

    let report = d.initialize(&mut Tracer::none()).unwrap();

    assert_eq!(report.activated(UnitKind::Image), 1, "one image activated");
    assert_eq!(d.page().src(img), Some("hero.jpg"), "source swapped in");
    assert_eq!(
        d.page().attribute(&img, DEFAULT_SOURCE_MARKER),
        None,
        "marker removed"
    );
    assert!(d.loader().pending().images().is_empty(), "image set empty");
    assert_eq!(d.loader().state(), LoaderState::Idle, "quiescent");
    assert!(d.events().active().is_empty(), "never left subscribed");
}

#[test]
fn threshold_boundary_is_inclusive() {
    let mut page = SimPage::new(Size::new(1024.0, 800.0));
    let at_899 = page.image(None, Point::new(0.0, 899.0), "a.png");
    let at_900 = page.image(None, Point::new(0.0, 900.0), "b.png");
    let at_901 = page.image(None, Point::new(0.0, 901.0), "c.png");
    let mut d = driver(page, Config::default(), Vec::new());

    d.initialize(&mut Tracer::none()).unwrap();

    assert!(d.page().src(at_899).is_some(), "899 is near");
    assert!(d.page().src(at_900).is_some(), "900 sits exactly on the edge");
    assert!(d.page().src(at_901).is_none(), "901 is one pixel too far");
    assert_eq!(d.loader().pending().images(), [at_901], "only 901 pending");
}

#[test]
fn hidden_units_wait_until_shown() {
    let mut page = SimPage::new(Size::new(1024.0, 600.0));
    let tab = page.block(None, Point::ZERO);
    let img = page.image(Some(tab), Point::new(0.0, 10.0), "tab.png");
    let region = page.text_region(None, Point::new(0.0, 20.0), "<p>later</p>");
    page.set_display_none(tab, true);
    page.set_display_none(region, true);
    let mut d = driver(page, Config::default(), Vec::new());
    let tracer = &mut Tracer::none();

    d.initialize(tracer).unwrap();
    assert_eq!(d.loader().outstanding(), 2, "both deferred while hidden");
    assert_eq!(d.page().materialized_count(), 0, "nothing materialized");

    d.page_mut().set_display_none(tab, false);
    d.page_mut().set_display_none(region, false);
    d.scroll_to(Vec2::new(0.0, 1.0), tracer).unwrap();
    assert_eq!(d.page().src(img), Some("tab.png"), "image loaded once shown");
    assert_eq!(
        d.page().materialized_before(region),
        Some("<p>later</p>"),
        "region materialized once shown"
    );
}

#[test]
fn axes_are_independent() {
    let build = || {
        let mut page = SimPage::new(Size::new(1000.0, 600.0));
        let img = page.image(None, Point::new(5000.0, 0.0), "wide.png");
        (page, img)
    };

    let (page, img) = build();
    let mut vertical_only = driver(page, Config::default(), Vec::new());
    vertical_only.initialize(&mut Tracer::none()).unwrap();
    assert!(
        vertical_only.page().src(img).is_some(),
        "horizontal distance ignored when horizontal tracking is off"
    );

    let (page, img) = build();
    let mut both = driver(page, Config::horizontal(), Vec::new());
    both.initialize(&mut Tracer::none()).unwrap();
    assert!(both.page().src(img).is_none(), "5000 > 1000 + 100 horizontally");

    let (page, img) = build();
    let mut neither = driver(page, Config::default().with_axes(false, false), Vec::new());
    neither.initialize(&mut Tracer::none()).unwrap();
    assert!(neither.page().src(img).is_some(), "no axis disqualifies");
}

#[test]
fn empty_marker_stays_pending() {
    let mut page = SimPage::new(Size::new(1024.0, 600.0));
    let img = page.image(None, Point::new(0.0, 10.0), "");
    let mut d = driver(page, Config::default(), Vec::new());
    let tracer = &mut Tracer::none();

    d.initialize(tracer).unwrap();
    assert_eq!(d.loader().pending().images(), [img], "still pending");
    assert_eq!(d.page().src(img), None, "no source assigned");

    // Filled in later by the page itself.
    d.page_mut()
        .set_attribute(&img, DEFAULT_SOURCE_MARKER, "late.png");
    d.scroll_to(Vec2::new(0.0, 5.0), tracer).unwrap();
    assert_eq!(d.page().src(img), Some("late.png"), "activated on next pass");
}

#[test]
fn region_materializes_and_loses_its_class() {
    let mut page = SimPage::new(Size::new(1024.0, 600.0));
    let region = page.text_region(None, Point::new(0.0, 300.0), "<b>hi</b>");
    let mut d = driver(page, Config::default(), Vec::new());

    d.initialize(&mut Tracer::none()).unwrap();

    assert_eq!(d.page().materialized_before(region), Some("<b>hi</b>"), "inserted");
    assert!(
        !d.page().has_class(&region, "lazyview-deferred"),
        "marker class removed"
    );
    assert!(d.page().node(region).display_none, "holder hidden");
    assert_eq!(d.loader_mut().rescan(&mut Tracer::none()).regions, 0, "not rediscovered");
}

#[test]
fn region_unmarked_elsewhere_is_dropped() {
    let mut page = SimPage::new(Size::new(1024.0, 600.0));
    let region = page.text_region(None, Point::new(0.0, 2000.0), "<p>x</p>");
    let mut d = driver(page, Config::default(), Vec::new());
    let tracer = &mut Tracer::none();
    d.initialize(tracer).unwrap();
    assert_eq!(d.loader().outstanding(), 1, "below the fold");

    d.page_mut().remove_class(&region, "lazyview-deferred");
    d.scroll_to(Vec2::new(0.0, 1500.0), tracer).unwrap();
    assert_eq!(d.loader().outstanding(), 0, "dropped");
    assert_eq!(d.page().materialized_count(), 0, "never materialized");
}

#[test]
fn stale_callback_target_never_fires() {
    let mut page = SimPage::new(Size::new(1024.0, 600.0));
    let target = page.block(None, Point::new(0.0, 2000.0));
    let (fired, action) = counter();
    let mut d = driver(
        page,
        Config::default(),
        vec![CallbackUnit::for_element(target, action)],
    );
    let tracer = &mut Tracer::none();
    d.initialize(tracer).unwrap();
    assert_eq!(d.loader().outstanding(), 1, "target below the fold");

    d.page_mut().detach(target);
    d.scroll_to(Vec2::new(0.0, 2000.0), tracer).unwrap();
    assert_eq!(fired.get(), 0, "never fired");
    assert_eq!(d.loader().outstanding(), 0, "discarded");
    assert_eq!(d.loader().state(), LoaderState::Idle, "nothing left");
}

#[test]
fn selector_callbacks_resolve_each_pass() {
    let mut page = SimPage::new(Size::new(1024.0, 600.0));
    let target = page.block(None, Point::new(0.0, 100.0));
    page.set_id(target, "comments");
    let (fired, action) = counter();
    let mut d = driver(
        page,
        Config::default(),
        vec![
            CallbackUnit::for_selector("#comments", action),
            CallbackUnit::for_selector("#missing", |_: &NodeId| Ok(())),
        ],
    );

    let report = d.initialize(&mut Tracer::none()).unwrap();
    assert_eq!(fired.get(), 1, "fired once");
    assert_eq!(report.activated(UnitKind::Callback), 1, "one activated");
    assert_eq!(report.discarded(UnitKind::Callback), 1, "missing selector dropped");
}

#[test]
fn caller_error_keeps_unvisited_units() {
    let mut page = SimPage::new(Size::new(1024.0, 600.0));
    let img = page.image(None, Point::new(0.0, 10.0), "a.png");
    let first = page.block(None, Point::new(0.0, 20.0));
    let second = page.block(None, Point::new(0.0, 30.0));
    let third = page.block(None, Point::new(0.0, 40.0));
    let (first_fired, first_action) = counter();
    let (third_fired, third_action) = counter();
    let mut d = driver(
        page,
        Config::default(),
        vec![
            CallbackUnit::for_element(first, first_action),
            CallbackUnit::for_element(second, |_: &NodeId| Err(RenderFailed.into())),
            CallbackUnit::for_element(third, third_action),
        ],
    );

    let err = d.initialize(&mut Tracer::none()).unwrap_err();
    let ActivationError::Action { kind, position, .. } = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(*kind, UnitKind::Callback, "callback failed");
    assert_eq!(*position, 1, "second callback");
    assert_eq!(
        std::error::Error::source(&err).map(ToString::to_string),
        Some("render failed".to_owned()),
        "source preserved"
    );

    assert_eq!(d.page().src(img), Some("a.png"), "images ran before callbacks");
    assert_eq!(first_fired.get(), 1, "first fired");
    assert_eq!(third_fired.get(), 0, "third not reached");
    assert_eq!(d.loader().pending().callbacks().len(), 1, "third still pending");
    assert_eq!(d.loader().state(), LoaderState::Idle, "initialize did not subscribe");

    assert!(d.loader_mut().listen(&mut Tracer::none()), "listen recovers");
    d.loader_mut().on_scroll(&mut Tracer::none()).unwrap();
    assert_eq!(third_fired.get(), 1, "third fired on the next pass");
}

#[test]
fn pending_sets_only_shrink() {
    let mut page = SimPage::new(Size::new(1024.0, 600.0));
    for i in 0..20 {
        page.image(None, Point::new(0.0, f64::from(i) * 250.0), "x.png");
        page.text_region(None, Point::new(0.0, f64::from(i) * 250.0 + 125.0), "t");
    }
    let mut d = driver(page, Config::default(), Vec::new());
    let tracer = &mut Tracer::none();
    d.initialize(tracer).unwrap();

    let mut last = d.loader().outstanding();
    for step in 1..=10 {
        d.advance(500, tracer).unwrap();
        d.scroll_to(Vec2::new(0.0, f64::from(step) * 500.0), tracer)
            .unwrap();
        let now = d.loader().outstanding();
        assert!(now <= last, "grew from {last} to {now} at step {step}");
        last = now;
    }
    assert_eq!(last, 0, "everything activated by the bottom");
    assert_eq!(d.page().materialized_count(), 20, "each region exactly once");
}
