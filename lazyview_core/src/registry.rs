// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element registry: discovery and the pending sets.
//!
//! Discovery keys on the *markers* (the pending-source attribute and the
//! marker class), never on element identity. Activation strips the marker,
//! so an activated element is never rediscovered and rescanning is safe to
//! repeat at any time.

use alloc::vec::Vec;

use crate::config::Config;
use crate::host::Document;
use crate::unit::{CallbackUnit, Scope, UnitKind};

/// The three pending sets.
///
/// A unit appears in at most one set, at most once. Sets only shrink during
/// activation passes; image and region sets are replaced wholesale by
/// [`rescan`], the callback set only through
/// [`replace_callbacks`](Self::replace_callbacks) and
/// [`push_callback`](Self::push_callback).
#[derive(Debug)]
pub struct PendingSets<E> {
    pub(crate) images: Vec<E>,
    pub(crate) regions: Vec<E>,
    pub(crate) callbacks: Vec<CallbackUnit<E>>,
}

impl<E> Default for PendingSets<E> {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            regions: Vec::new(),
            callbacks: Vec::new(),
        }
    }
}

impl<E> PendingSets<E> {
    /// Creates pending sets holding only the given callbacks.
    #[must_use]
    pub fn with_callbacks(callbacks: Vec<CallbackUnit<E>>) -> Self {
        Self {
            callbacks,
            ..Self::default()
        }
    }

    /// Pending image units, in discovery order.
    #[must_use]
    pub fn images(&self) -> &[E] {
        &self.images
    }

    /// Pending text-region units, in discovery order.
    #[must_use]
    pub fn regions(&self) -> &[E] {
        &self.regions
    }

    /// Pending callback units, in registration order.
    #[must_use]
    pub fn callbacks(&self) -> &[CallbackUnit<E>] {
        &self.callbacks
    }

    /// Number of pending units of one kind.
    #[must_use]
    pub fn len_of(&self, kind: UnitKind) -> usize {
        match kind {
            UnitKind::Image => self.images.len(),
            UnitKind::TextRegion => self.regions.len(),
            UnitKind::Callback => self.callbacks.len(),
        }
    }

    /// Total outstanding work across all three sets.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.images.len() + self.regions.len() + self.callbacks.len()
    }

    /// Whether every set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outstanding() == 0
    }

    /// Replaces the callback set, returning the previous one.
    pub fn replace_callbacks(&mut self, callbacks: Vec<CallbackUnit<E>>) -> Vec<CallbackUnit<E>> {
        core::mem::replace(&mut self.callbacks, callbacks)
    }

    /// Appends one callback unit.
    pub fn push_callback(&mut self, unit: CallbackUnit<E>) {
        self.callbacks.push(unit);
    }
}

/// What a [`rescan`] found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RescanSummary {
    /// Image units now pending.
    pub images: usize,
    /// Text-region units now pending.
    pub regions: usize,
}

/// Rediscovers image and text-region units across `containers` and replaces
/// the corresponding pending sets.
///
/// Containers are searched in order and results concatenated. An element
/// reachable through more than one container (nested containers) is kept
/// only at its first position. The callback set is left untouched.
pub fn rescan<D: Document + ?Sized>(
    pending: &mut PendingSets<D::Element>,
    document: &D,
    containers: &[Scope<D::Element>],
    config: &Config,
) -> RescanSummary {
    let mut images = Vec::new();
    let mut regions = Vec::new();
    for scope in containers {
        extend_unique(
            &mut images,
            document.find_images(scope, &config.pending_source_marker),
        );
        extend_unique(&mut regions, document.find_regions(scope, &config.marker_class));
    }
    pending.images = images;
    pending.regions = regions;
    RescanSummary {
        images: pending.images.len(),
        regions: pending.regions.len(),
    }
}

fn extend_unique<E: PartialEq>(into: &mut Vec<E>, found: Vec<E>) {
    for el in found {
        if !into.contains(&el) {
            into.push(el);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;
    use kurbo::Size;

    #[test]
    fn two_containers_union() {
        let mut page = FakePage::new(Size::new(800.0, 600.0));
        let a = page.container();
        let b = page.container();
        page.region(Some(a), 10.0, "alpha");
        page.region(Some(b), 20.0, "beta");

        let mut pending = PendingSets::default();
        let summary = rescan(
            &mut pending,
            &page,
            &[Scope::Element(a), Scope::Element(b)],
            &Config::default(),
        );
        assert_eq!(summary.regions, 2, "one region from each container");
        assert_eq!(pending.regions().len(), 2);
        assert!(pending.images().is_empty(), "no images on the page");
    }

    #[test]
    fn rescan_is_idempotent() {
        let mut page = FakePage::new(Size::new(800.0, 600.0));
        page.image(None, 10.0, "a.png");
        page.image(None, 2000.0, "b.png");
        page.region(None, 30.0, "text");

        let config = Config::default();
        let mut pending = PendingSets::default();
        rescan(&mut pending, &page, &[Scope::Document], &config);
        let (images, regions) = (pending.images.clone(), pending.regions.clone());
        rescan(&mut pending, &page, &[Scope::Document], &config);
        assert_eq!(pending.images, images, "same images");
        assert_eq!(pending.regions, regions, "same regions");
    }

    #[test]
    fn overlapping_scopes_do_not_duplicate() {
        let mut page = FakePage::new(Size::new(800.0, 600.0));
        let a = page.container();
        page.image(Some(a), 10.0, "a.png");

        let mut pending = PendingSets::default();
        rescan(
            &mut pending,
            &page,
            &[Scope::Document, Scope::Element(a)],
            &Config::default(),
        );
        assert_eq!(pending.images().len(), 1, "nested container deduplicated");
    }

    #[test]
    fn rescan_keeps_callbacks() {
        let page = FakePage::new(Size::new(800.0, 600.0));
        let mut pending = PendingSets::with_callbacks(alloc::vec![CallbackUnit::for_selector(
            "#x",
            |_: &usize| Ok(())
        )]);
        rescan(&mut pending, &page, &[Scope::Document], &Config::default());
        assert_eq!(pending.outstanding(), 1, "callback set untouched");
    }
}
