// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal in-crate page double for unit tests.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Point, Size, Vec2};

use crate::events::{EventKind, EventSource};
use crate::host::{Document, GeometryOracle};
use crate::unit::{Scope, Target};

#[derive(Clone, Debug, Default)]
pub(crate) struct FakeElement {
    pub(crate) container: Option<usize>,
    pub(crate) offset: Point,
    pub(crate) size: Size,
    pub(crate) hidden: bool,
    pub(crate) attached: bool,
    pub(crate) id: Option<String>,
    pub(crate) attrs: BTreeMap<String, String>,
    pub(crate) classes: Vec<String>,
    pub(crate) text: String,
}

#[derive(Debug)]
pub(crate) struct FakePage {
    pub(crate) elements: Vec<FakeElement>,
    pub(crate) viewport: Size,
    pub(crate) scroll: Vec2,
    pub(crate) inserted: Vec<(usize, String)>,
}

impl FakePage {
    pub(crate) fn new(viewport: Size) -> Self {
        Self {
            elements: Vec::new(),
            viewport,
            scroll: Vec2::ZERO,
            inserted: Vec::new(),
        }
    }

    fn push(&mut self, el: FakeElement) -> usize {
        self.elements.push(el);
        self.elements.len() - 1
    }

    pub(crate) fn container(&mut self) -> usize {
        self.push(FakeElement {
            size: Size::new(100.0, 100.0),
            attached: true,
            ..FakeElement::default()
        })
    }

    pub(crate) fn image(&mut self, container: Option<usize>, y: f64, src: &str) -> usize {
        let mut attrs = BTreeMap::new();
        attrs.insert("data-lazyview-src".to_string(), src.to_string());
        self.push(FakeElement {
            container,
            offset: Point::new(0.0, y),
            size: Size::new(100.0, 100.0),
            attached: true,
            attrs,
            ..FakeElement::default()
        })
    }

    pub(crate) fn region(&mut self, container: Option<usize>, y: f64, text: &str) -> usize {
        self.push(FakeElement {
            container,
            offset: Point::new(0.0, y),
            size: Size::new(100.0, 100.0),
            attached: true,
            classes: alloc::vec!["lazyview-deferred".to_string()],
            text: text.to_string(),
            ..FakeElement::default()
        })
    }

    pub(crate) fn plain(&mut self, y: f64, id: &str) -> usize {
        self.push(FakeElement {
            offset: Point::new(0.0, y),
            size: Size::new(100.0, 100.0),
            attached: true,
            id: Some(id.to_string()),
            ..FakeElement::default()
        })
    }

    fn in_scope(&self, idx: usize, scope: &Scope<usize>) -> bool {
        let el = &self.elements[idx];
        el.attached
            && match scope {
                Scope::Document => true,
                Scope::Element(root) => el.container == Some(*root),
            }
    }
}

impl GeometryOracle for FakePage {
    type Element = usize;

    fn offset_of(&self, element: &usize) -> Point {
        self.elements[*element].offset
    }

    fn size_of(&self, element: &usize) -> Size {
        self.elements[*element].size
    }

    fn is_hidden(&self, element: &usize) -> bool {
        self.elements[*element].hidden
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn scroll_position(&self) -> Vec2 {
        self.scroll
    }
}

impl Document for FakePage {
    fn find_images(&self, scope: &Scope<usize>, marker: &str) -> Vec<usize> {
        (0..self.elements.len())
            .filter(|&i| self.in_scope(i, scope) && self.elements[i].attrs.contains_key(marker))
            .collect()
    }

    fn find_regions(&self, scope: &Scope<usize>, class: &str) -> Vec<usize> {
        (0..self.elements.len())
            .filter(|&i| self.in_scope(i, scope) && self.has_class(&i, class))
            .collect()
    }

    fn attribute(&self, element: &usize, name: &str) -> Option<String> {
        self.elements[*element].attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, element: &usize, name: &str, value: &str) {
        self.elements[*element]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, element: &usize, name: &str) {
        self.elements[*element].attrs.remove(name);
    }

    fn has_class(&self, element: &usize, class: &str) -> bool {
        self.elements[*element].classes.iter().any(|c| c == class)
    }

    fn remove_class(&mut self, element: &usize, class: &str) {
        self.elements[*element].classes.retain(|c| c != class);
    }

    fn text_value(&self, element: &usize) -> String {
        self.elements[*element].text.clone()
    }

    fn insert_text_before(&mut self, element: &usize, markup: &str) {
        self.inserted.push((*element, markup.to_string()));
    }

    fn hide(&mut self, element: &usize) {
        self.elements[*element].hidden = true;
    }

    fn resolve_target(&self, target: &Target<usize>) -> Option<usize> {
        match target {
            Target::Element(idx) => self
                .elements
                .get(*idx)
                .filter(|el| el.attached)
                .map(|_| *idx),
            Target::Selector(sel) => {
                let id = sel.strip_prefix('#')?;
                self.elements
                    .iter()
                    .position(|el| el.attached && el.id.as_deref() == Some(id))
            }
        }
    }
}

/// Event source recording subscription changes into a shared log.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeEvents {
    pub(crate) log: Rc<RefCell<Vec<(EventKind, bool)>>>,
}

impl FakeEvents {
    pub(crate) fn active(&self) -> Vec<EventKind> {
        let mut active = Vec::new();
        for &(kind, subscribed) in self.log.borrow().iter() {
            if subscribed {
                active.push(kind);
            } else {
                active.retain(|k| *k != kind);
            }
        }
        active
    }
}

impl EventSource for FakeEvents {
    fn subscribe(&mut self, kind: EventKind) {
        self.log.borrow_mut().push((kind, true));
    }

    fn unsubscribe(&mut self, kind: EventKind) {
        self.log.borrow_mut().push((kind, false));
    }
}
