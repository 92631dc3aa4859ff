#![forbid(unsafe_code)]

//! In-memory document used to drive controllers without a browser.
//!
//! Build a tree with [`MemoryDocument::element`], dispatch events through the
//! engine, then inspect classes, attributes, text and visibility. Selector
//! support is the subset documented in [`crate::selector`].
//!
//! ```
//! use sladash_core::{Document, MemoryDocument};
//!
//! let doc = MemoryDocument::new();
//! let table = doc.element("table").id("t").append_to(doc.root());
//! let body = doc.element("tbody").append_to(table);
//! doc.element("tr").text("Server down").append_to(body);
//!
//! assert_eq!(doc.query_within(&table, "tr").len(), 1);
//! ```

use std::cell::RefCell;

use crate::dom::Document;
use crate::selector::{ElementView, SelectorList};

/// Handle to a node in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    value: String,
    hidden: bool,
    scroll_requests: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_owned(),
            None => self.attrs.push((name.to_owned(), value.to_owned())),
        }
    }
}

#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Pre-order walk of the descendants of `root`, excluding `root`.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(root).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut Vec<String>) {
        let node = self.node(id);
        if !node.text.is_empty() {
            out.push(node.text.clone());
        }
        for child in &node.children {
            self.collect_text(*child, out);
        }
    }
}

struct View<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl ElementView for View<'_> {
    fn tag(&self) -> &str {
        &self.tree.node(self.id).tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.tree.node(self.id).attr(name)
    }

    fn parent(&self) -> Option<Self> {
        self.tree.node(self.id).parent.map(|id| View {
            tree: self.tree,
            id,
        })
    }
}

/// Single-threaded in-memory DOM.
#[derive(Debug)]
pub struct MemoryDocument {
    tree: RefCell<Tree>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create a document containing only a `<body>` root.
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            tag: "body".to_owned(),
            ..Node::default()
        };
        Self {
            tree: RefCell::new(Tree { nodes: vec![root] }),
        }
    }

    /// The `<body>` element.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Start building a detached element with the given tag.
    #[must_use]
    pub fn element(&self, tag: &str) -> ElementBuilder<'_> {
        ElementBuilder {
            doc: self,
            node: Node {
                tag: tag.to_ascii_lowercase(),
                ..Node::default()
            },
        }
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut tree = self.tree.borrow_mut();
        if let Some(old) = tree.node(child).parent {
            tree.node_mut(old).children.retain(|c| *c != child);
        }
        tree.node_mut(child).parent = Some(parent);
        tree.node_mut(parent).children.push(child);
    }

    /// Whether the element is currently displayed.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        !self.tree.borrow().node(id).hidden
    }

    /// Class list in attribute order.
    #[must_use]
    pub fn classes(&self, id: NodeId) -> Vec<String> {
        self.tree
            .borrow()
            .node(id)
            .attr("class")
            .unwrap_or("")
            .split_whitespace()
            .map(str::to_owned)
            .collect()
    }

    /// Number of times the element was scrolled into view.
    #[must_use]
    pub fn scroll_requests(&self, id: NodeId) -> u32 {
        self.tree.borrow().node(id).scroll_requests
    }

    fn select(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let list = match SelectorList::parse(selector) {
            Ok(list) => list,
            Err(err) => {
                tracing::trace!(error = %err, "selector matched nothing");
                return Vec::new();
            }
        };
        let tree = self.tree.borrow();
        tree.descendants(root)
            .into_iter()
            .filter(|id| list.matches(&View { tree: &tree, id: *id }))
            .collect()
    }
}

impl Document for MemoryDocument {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let tree = self.tree.borrow();
        tree.descendants(self.root())
            .into_iter()
            .find(|n| tree.node(*n).attr("id") == Some(id))
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.select(self.root(), selector).into_iter().next()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        self.select(self.root(), selector)
    }

    fn query_within(&self, root: &NodeId, selector: &str) -> Vec<NodeId> {
        self.select(*root, selector)
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let tree = self.tree.borrow();
        let mut cursor = Some(*node);
        while let Some(id) = cursor {
            if id == *ancestor {
                return true;
            }
            cursor = tree.node(id).parent;
        }
        false
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.tree.borrow().node(*element).attr(name).map(str::to_owned)
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) {
        self.tree.borrow_mut().node_mut(*element).set_attr(name, value);
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.tree
            .borrow()
            .node(*element)
            .attr("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    fn set_class(&self, element: &NodeId, class: &str, enabled: bool) {
        let mut classes = self.classes(*element);
        let present = classes.iter().any(|c| c == class);
        match (present, enabled) {
            (false, true) => classes.push(class.to_owned()),
            (true, false) => classes.retain(|c| c != class),
            _ => return,
        }
        self.tree
            .borrow_mut()
            .node_mut(*element)
            .set_attr("class", &classes.join(" "));
    }

    fn text(&self, element: &NodeId) -> String {
        let mut parts = Vec::new();
        self.tree.borrow().collect_text(*element, &mut parts);
        parts.join(" ")
    }

    fn set_text(&self, element: &NodeId, text: &str) {
        let mut tree = self.tree.borrow_mut();
        let node = tree.node_mut(*element);
        node.text = text.to_owned();
        node.children.clear();
    }

    fn value(&self, element: &NodeId) -> String {
        self.tree.borrow().node(*element).value.clone()
    }

    fn set_value(&self, element: &NodeId, value: &str) {
        self.tree.borrow_mut().node_mut(*element).value = value.to_owned();
    }

    fn set_visible(&self, element: &NodeId, visible: bool) {
        self.tree.borrow_mut().node_mut(*element).hidden = !visible;
    }

    fn scroll_into_view(&self, element: &NodeId) {
        self.tree.borrow_mut().node_mut(*element).scroll_requests += 1;
    }
}

/// Builder returned by [`MemoryDocument::element`].
#[must_use]
pub struct ElementBuilder<'a> {
    doc: &'a MemoryDocument,
    node: Node,
}

impl ElementBuilder<'_> {
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: &str) -> Self {
        let joined = match self.node.attr("class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_owned(),
        };
        self.node.set_attr("class", &joined);
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.node.set_attr(name, value);
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.node.text = text.to_owned();
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.node.value = value.to_owned();
        self
    }

    /// Insert the element as the last child of `parent`.
    pub fn append_to(self, parent: NodeId) -> NodeId {
        let id = {
            let mut tree = self.doc.tree.borrow_mut();
            let id = NodeId(tree.nodes.len());
            tree.nodes.push(self.node);
            id
        };
        self.doc.append_child(parent, id);
        id
    }
}
