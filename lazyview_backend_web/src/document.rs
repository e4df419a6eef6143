// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live DOM document.
//!
//! Implements [`GeometryOracle`] and [`Document`] over `web-sys`. Geometry is
//! reported in document coordinates: the bounding client rect shifted by the
//! window scroll offset.
//!
//! Image units are `<img>` elements carrying the pending-source attribute.
//! Text-region units are `<textarea>` elements carrying the marker class;
//! their parked markup is the textarea's value, materialized into a `<div>`
//! inserted just before them.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Size, Vec2};
use lazyview_core::host::{Document, GeometryOracle};
use lazyview_core::unit::{Scope, Target};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Element, HtmlElement, HtmlTextAreaElement, NodeList, Window};

/// A [`Document`] backed by the page's live DOM.
#[derive(Clone)]
pub struct DomDocument {
    window: Window,
    document: web_sys::Document,
}

impl core::fmt::Debug for DomDocument {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomDocument")
            .field("window", &"Window")
            .field("document", &"Document")
            .finish()
    }
}

impl DomDocument {
    /// Wraps `window` and its document. Returns `None` if the window has no
    /// document.
    #[must_use]
    pub fn new(window: Window) -> Option<Self> {
        let document = window.document()?;
        Some(Self { window, document })
    }

    /// Uses the global `window`. Returns `None` outside a browsing context
    /// (e.g. in a worker).
    #[must_use]
    pub fn from_global() -> Option<Self> {
        Self::new(web_sys::window()?)
    }

    /// Returns the window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Returns the underlying `web_sys::Document`.
    #[must_use]
    pub fn raw(&self) -> &web_sys::Document {
        &self.document
    }

    fn select_all(&self, scope: &Scope<Element>, selector: &str) -> Vec<Element> {
        let found = match scope {
            Scope::Document => self.document.query_selector_all(selector),
            Scope::Element(root) => root.query_selector_all(selector),
        };
        match found {
            Ok(list) => elements_of(&list),
            Err(err) => {
                log_failure("querySelectorAll", selector, &err);
                Vec::new()
            }
        }
    }
}

fn elements_of(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn log_failure(op: &str, detail: &str, err: &JsValue) {
    log::warn!("lazyview: {op}({detail}) failed: {err:?}");
}

impl GeometryOracle for DomDocument {
    type Element = Element;

    fn offset_of(&self, element: &Element) -> Point {
        let rect = element.get_bounding_client_rect();
        let scroll = self.scroll_position();
        Point::new(rect.left() + scroll.x, rect.top() + scroll.y)
    }

    fn size_of(&self, element: &Element) -> Size {
        let rect = element.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    fn is_hidden(&self, element: &Element) -> bool {
        match self.window.get_computed_style(element) {
            Ok(Some(style)) => style
                .get_property_value("display")
                .is_ok_and(|display| display == "none"),
            Ok(None) => false,
            Err(err) => {
                log_failure("getComputedStyle", "display", &err);
                false
            }
        }
    }

    fn viewport_size(&self) -> Size {
        self.document
            .document_element()
            .map_or(Size::ZERO, |root| {
                Size::new(f64::from(root.client_width()), f64::from(root.client_height()))
            })
    }

    fn scroll_position(&self) -> Vec2 {
        let x = self.window.scroll_x().unwrap_or_else(|err| {
            log_failure("scrollX", "", &err);
            0.0
        });
        let y = self.window.scroll_y().unwrap_or_else(|err| {
            log_failure("scrollY", "", &err);
            0.0
        });
        Vec2::new(x, y)
    }
}

impl Document for DomDocument {
    fn find_images(&self, scope: &Scope<Element>, marker: &str) -> Vec<Element> {
        self.select_all(scope, &format!("img[{marker}]"))
    }

    fn find_regions(&self, scope: &Scope<Element>, class: &str) -> Vec<Element> {
        self.select_all(scope, &format!("textarea.{class}"))
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&mut self, element: &Element, name: &str, value: &str) {
        if let Err(err) = element.set_attribute(name, value) {
            log_failure("setAttribute", name, &err);
        }
    }

    fn remove_attribute(&mut self, element: &Element, name: &str) {
        if let Err(err) = element.remove_attribute(name) {
            log_failure("removeAttribute", name, &err);
        }
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn remove_class(&mut self, element: &Element, class: &str) {
        if let Err(err) = element.class_list().remove_1(class) {
            log_failure("classList.remove", class, &err);
        }
    }

    fn text_value(&self, element: &Element) -> String {
        match element.dyn_ref::<HtmlTextAreaElement>() {
            Some(textarea) => textarea.value(),
            None => element.text_content().unwrap_or_default(),
        }
    }

    fn insert_text_before(&mut self, element: &Element, markup: &str) {
        let Some(parent) = element.parent_node() else {
            log::warn!("lazyview: text region is detached; nothing inserted");
            return;
        };
        let div = match self.document.create_element("div") {
            Ok(div) => div,
            Err(err) => {
                log_failure("createElement", "div", &err);
                return;
            }
        };
        div.set_inner_html(markup);
        if let Err(err) = parent.insert_before(&div, Some(element)) {
            log_failure("insertBefore", "div", &err);
        }
    }

    fn hide(&mut self, element: &Element) {
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(err) = html.style().set_property("display", "none") {
            log_failure("style.setProperty", "display", &err);
        }
    }

    fn resolve_target(&self, target: &Target<Element>) -> Option<Element> {
        match target {
            Target::Element(element) => element.is_connected().then(|| element.clone()),
            Target::Selector(selector) => match self.document.query_selector(selector) {
                Ok(found) => found,
                Err(err) => {
                    log_failure("querySelector", selector, &err);
                    None
                }
            },
        }
    }
}
