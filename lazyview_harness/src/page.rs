// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory page.
//!
//! [`SimPage`] is a flat arena of [`Node`]s with parent links. Document order
//! is creation order. Geometry is given in document coordinates and never
//! reflows: materializing a text region adds a node but moves nothing.
//!
//! Display semantics follow the browser closely enough for the engine:
//! a node with `display: none` reports itself hidden, and a node under a
//! hidden ancestor reports a zero size.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{Point, Size, Vec2};
use lazyview_core::config::{DEFAULT_MARKER_CLASS, DEFAULT_SOURCE_MARKER};
use lazyview_core::host::{Document, GeometryOracle};
use lazyview_core::unit::{Scope, Target};

/// Handle to a node in a [`SimPage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// What kind of element a node is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// A generic block (containers, callback targets).
    Block,
    /// An image; discoverable through the pending-source attribute.
    Image,
    /// A text-region holder; discoverable through the marker class.
    TextArea,
    /// A node inserted by text-region materialization.
    Materialized,
}

/// One element.
#[derive(Clone, Debug)]
pub struct Node {
    /// Element kind.
    pub tag: Tag,
    /// Parent node, `None` for top-level nodes.
    pub parent: Option<NodeId>,
    /// Top-left corner in document coordinates.
    pub offset: Point,
    /// Layout size.
    pub size: Size,
    /// Whether the node itself has `display: none`.
    pub display_none: bool,
    /// Whether the node is still in the document.
    pub attached: bool,
    /// Element id, matched by `#id` selectors.
    pub id: Option<String>,
    /// Attributes.
    pub attrs: BTreeMap<String, String>,
    /// Class list.
    pub classes: Vec<String>,
    /// Text value (text-region markup, or materialized content).
    pub text: String,
    /// For materialized nodes, the region they were inserted before.
    pub inserted_before: Option<NodeId>,
}

impl Node {
    fn new(tag: Tag, parent: Option<NodeId>, offset: Point, size: Size) -> Self {
        Self {
            tag,
            parent,
            offset,
            size,
            display_none: false,
            attached: true,
            id: None,
            attrs: BTreeMap::new(),
            classes: Vec::new(),
            text: String::new(),
            inserted_before: None,
        }
    }
}

/// Default size of nodes created by the builder helpers.
pub const DEFAULT_NODE_SIZE: Size = Size::new(100.0, 100.0);

/// An in-memory [`Document`].
#[derive(Clone, Debug)]
pub struct SimPage {
    nodes: Vec<Node>,
    viewport: Size,
    scroll: Vec2,
}

impl SimPage {
    /// Creates an empty page with the given viewport, scrolled to the origin.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            nodes: Vec::new(),
            viewport,
            scroll: Vec2::ZERO,
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Adds a block element, usable as a container or callback target.
    pub fn block(&mut self, parent: Option<NodeId>, offset: Point) -> NodeId {
        self.push(Node::new(Tag::Block, parent, offset, DEFAULT_NODE_SIZE))
    }

    /// Adds an image whose source is parked in the default marker attribute.
    pub fn image(&mut self, parent: Option<NodeId>, offset: Point, src: &str) -> NodeId {
        self.image_with_marker(parent, offset, DEFAULT_SOURCE_MARKER, src)
    }

    /// Adds an image whose source is parked in `marker`.
    pub fn image_with_marker(
        &mut self,
        parent: Option<NodeId>,
        offset: Point,
        marker: &str,
        src: &str,
    ) -> NodeId {
        let mut node = Node::new(Tag::Image, parent, offset, DEFAULT_NODE_SIZE);
        node.attrs.insert(marker.to_string(), src.to_string());
        self.push(node)
    }

    /// Adds a text region with the default marker class holding `markup`.
    pub fn text_region(&mut self, parent: Option<NodeId>, offset: Point, markup: &str) -> NodeId {
        self.text_region_with_class(parent, offset, DEFAULT_MARKER_CLASS, markup)
    }

    /// Adds a text region carrying `class` and holding `markup`.
    pub fn text_region_with_class(
        &mut self,
        parent: Option<NodeId>,
        offset: Point,
        class: &str,
        markup: &str,
    ) -> NodeId {
        let mut node = Node::new(Tag::TextArea, parent, offset, DEFAULT_NODE_SIZE);
        node.classes.push(class.to_string());
        node.text = markup.to_string();
        self.push(node)
    }

    /// Borrows a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this page.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Mutably borrows a node for arbitrary edits.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this page.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Sets the element id.
    pub fn set_id(&mut self, id: NodeId, value: &str) {
        self.node_mut(id).id = Some(value.to_string());
    }

    /// Toggles `display: none` on a node.
    pub fn set_display_none(&mut self, id: NodeId, none: bool) {
        self.node_mut(id).display_none = none;
    }

    /// Resizes a node.
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        self.node_mut(id).size = size;
    }

    /// Moves a node.
    pub fn move_to(&mut self, id: NodeId, offset: Point) {
        self.node_mut(id).offset = offset;
    }

    /// Removes a node (and so its subtree) from the document.
    pub fn detach(&mut self, id: NodeId) {
        self.node_mut(id).attached = false;
    }

    /// Scrolls the page.
    pub fn scroll_to(&mut self, scroll: Vec2) {
        self.scroll = scroll;
    }

    /// Resizes the viewport.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// The node's `src` attribute, if any.
    #[must_use]
    pub fn src(&self, id: NodeId) -> Option<&str> {
        self.node(id).attrs.get("src").map(String::as_str)
    }

    /// Content materialized before `region`, if it has been activated.
    #[must_use]
    pub fn materialized_before(&self, region: NodeId) -> Option<&str> {
        self.nodes
            .iter()
            .find(|n| n.tag == Tag::Materialized && n.inserted_before == Some(region))
            .map(|n| n.text.as_str())
    }

    /// Number of materialized nodes on the page.
    #[must_use]
    pub fn materialized_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.tag == Tag::Materialized)
            .count()
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(self.node(id).parent, |p| self.node(*p).parent)
    }

    /// Whether the node and all its ancestors are attached.
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.node(id).attached && self.ancestors(id).all(|a| self.node(a).attached)
    }

    fn in_scope(&self, id: NodeId, scope: &Scope<NodeId>) -> bool {
        self.is_connected(id)
            && match scope {
                Scope::Document => true,
                Scope::Element(root) => self.ancestors(id).any(|a| a == *root),
            }
    }

    fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }
}

impl GeometryOracle for SimPage {
    type Element = NodeId;

    fn offset_of(&self, element: &NodeId) -> Point {
        self.node(*element).offset
    }

    fn size_of(&self, element: &NodeId) -> Size {
        if self.ancestors(*element).any(|a| self.node(a).display_none) {
            Size::ZERO
        } else {
            self.node(*element).size
        }
    }

    fn is_hidden(&self, element: &NodeId) -> bool {
        self.node(*element).display_none
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn scroll_position(&self) -> Vec2 {
        self.scroll
    }
}

impl Document for SimPage {
    fn find_images(&self, scope: &Scope<NodeId>, marker: &str) -> Vec<NodeId> {
        self.ids()
            .filter(|&id| {
                let node = self.node(id);
                node.tag == Tag::Image && node.attrs.contains_key(marker) && self.in_scope(id, scope)
            })
            .collect()
    }

    fn find_regions(&self, scope: &Scope<NodeId>, class: &str) -> Vec<NodeId> {
        self.ids()
            .filter(|&id| {
                self.node(id).tag == Tag::TextArea
                    && self.has_class(&id, class)
                    && self.in_scope(id, scope)
            })
            .collect()
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.node(*element).attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) {
        self.node_mut(*element)
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, element: &NodeId, name: &str) {
        self.node_mut(*element).attrs.remove(name);
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.node(*element).classes.iter().any(|c| c == class)
    }

    fn remove_class(&mut self, element: &NodeId, class: &str) {
        self.node_mut(*element).classes.retain(|c| c != class);
    }

    fn text_value(&self, element: &NodeId) -> String {
        self.node(*element).text.clone()
    }

    fn insert_text_before(&mut self, element: &NodeId, markup: &str) {
        let anchor = self.node(*element);
        let mut node = Node::new(Tag::Materialized, anchor.parent, anchor.offset, anchor.size);
        node.text = markup.to_string();
        node.inserted_before = Some(*element);
        self.push(node);
    }

    fn hide(&mut self, element: &NodeId) {
        self.node_mut(*element).display_none = true;
    }

    fn resolve_target(&self, target: &Target<NodeId>) -> Option<NodeId> {
        match target {
            Target::Element(id) => {
                (id.0 < self.nodes.len() && self.is_connected(*id)).then_some(*id)
            }
            Target::Selector(selector) => {
                if let Some(wanted) = selector.strip_prefix('#') {
                    self.ids().find(|&id| {
                        self.is_connected(id) && self.node(id).id.as_deref() == Some(wanted)
                    })
                } else if let Some(class) = selector.strip_prefix('.') {
                    self.ids()
                        .find(|&id| self.is_connected(id) && self.has_class(&id, class))
                } else {
                    None
                }
            }
        }
    }
}
