#![forbid(unsafe_code)]

//! Shared DOM node handles.
//!
//! # Design
//!
//! A [`Node`] is an `Rc` around interior-mutable node state, so the binding
//! engine can keep a handle inside update callbacks while the host keeps its
//! own handle to the same tree. Only two node kinds exist: elements and text.
//!
//! # Failure Modes
//!
//! - **Children on a text node**: [`Node::append_child`] on a text node is
//!   ignored; text nodes never have children.
//! - **Re-entrant dispatch**: listeners are snapshotted before invocation,
//!   so a listener that registers another listener or dispatches again on
//!   the same node does not hit a `RefCell` double borrow.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::event::EventType;
use crate::html;

/// Numeric node type, matching the DOM `nodeType` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
}

/// A single `name="value"` attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

type Listener = Rc<dyn Fn(&Node)>;

enum NodeData {
    Text(RefCell<String>),
    Element(ElementData),
}

struct ElementData {
    tag: String,
    attributes: RefCell<SmallVec<[Attribute; 4]>>,
    /// Form-control value property (distinct from any `value` attribute).
    value: RefCell<String>,
    children: RefCell<Vec<Node>>,
    listeners: RefCell<SmallVec<[(EventType, Listener); 2]>>,
}

/// Shared handle to a DOM node.
///
/// Cloning a `Node` creates a new handle to the **same** node.
#[derive(Clone)]
pub struct Node {
    inner: Rc<NodeData>,
}

impl Node {
    /// Create a detached text node.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(NodeData::Text(RefCell::new(content.into()))),
        }
    }

    /// Create a detached element with no attributes and no children.
    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(NodeData::Element(ElementData {
                tag: tag.into(),
                attributes: RefCell::new(SmallVec::new()),
                value: RefCell::new(String::new()),
                children: RefCell::new(Vec::new()),
                listeners: RefCell::new(SmallVec::new()),
            })),
        }
    }

    /// Builder: set an attribute and return the node.
    #[must_use]
    pub fn with_attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder: append a child and return the node.
    #[must_use]
    pub fn with_child(self, child: Node) -> Self {
        self.append_child(child);
        self
    }

    /// Builder: append a text child and return the node.
    #[must_use]
    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.append_child(Node::text(content));
        self
    }

    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match &*self.inner {
            NodeData::Text(_) => NodeType::Text,
            NodeData::Element(_) => NodeType::Element,
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        self.node_type() == NodeType::Text
    }

    #[must_use]
    pub fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    /// Lowercase tag name for elements, `None` for text nodes.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match &*self.inner {
            NodeData::Element(el) => Some(el.tag.as_str()),
            NodeData::Text(_) => None,
        }
    }

    /// Whether two handles refer to the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // -- Tree -------------------------------------------------------------

    /// Snapshot of the current child list.
    #[must_use]
    pub fn child_nodes(&self) -> Vec<Node> {
        match &*self.inner {
            NodeData::Element(el) => el.children.borrow().clone(),
            NodeData::Text(_) => Vec::new(),
        }
    }

    #[must_use]
    pub fn has_child_nodes(&self) -> bool {
        match &*self.inner {
            NodeData::Element(el) => !el.children.borrow().is_empty(),
            NodeData::Text(_) => false,
        }
    }

    /// Append `child` to this element. No-op on text nodes.
    pub fn append_child(&self, child: Node) {
        if let NodeData::Element(el) = &*self.inner {
            el.children.borrow_mut().push(child);
        }
    }

    // -- Text ---------------------------------------------------------------

    /// Text of a text node, or the concatenated text of all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        match &*self.inner {
            NodeData::Text(text) => text.borrow().clone(),
            NodeData::Element(_) => {
                let mut out = String::new();
                self.collect_text(&mut out);
                out
            }
        }
    }

    fn collect_text(&self, out: &mut String) {
        match &*self.inner {
            NodeData::Text(text) => out.push_str(&text.borrow()),
            NodeData::Element(el) => {
                for child in el.children.borrow().iter() {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Replace the node's text.
    ///
    /// On an element every child is removed and, unless `content` is empty,
    /// replaced by a single text node.
    pub fn set_text_content(&self, content: impl Into<String>) {
        let content = content.into();
        match &*self.inner {
            NodeData::Text(text) => *text.borrow_mut() = content,
            NodeData::Element(el) => {
                let mut children = el.children.borrow_mut();
                children.clear();
                if !content.is_empty() {
                    children.push(Node::text(content));
                }
            }
        }
    }

    // -- Attributes -----------------------------------------------------------

    /// Snapshot of the attributes in insertion order. Empty for text nodes.
    #[must_use]
    pub fn attributes(&self) -> Vec<Attribute> {
        match &*self.inner {
            NodeData::Element(el) => el.attributes.borrow().to_vec(),
            NodeData::Text(_) => Vec::new(),
        }
    }

    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        match &*self.inner {
            NodeData::Element(el) => el
                .attributes
                .borrow()
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.clone()),
            NodeData::Text(_) => None,
        }
    }

    /// Set or replace an attribute. No-op on text nodes.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        let NodeData::Element(el) = &*self.inner else {
            return;
        };
        let name = name.into();
        let value = value.into();
        let mut attrs = el.attributes.borrow_mut();
        if let Some(existing) = attrs.iter_mut().find(|a| a.name == name) {
            existing.value = value;
        } else {
            attrs.push(Attribute { name, value });
        }
    }

    // -- Form control -----------------------------------------------------------

    /// Current value property of a form control (empty for text nodes).
    #[must_use]
    pub fn value(&self) -> String {
        match &*self.inner {
            NodeData::Element(el) => el.value.borrow().clone(),
            NodeData::Text(_) => String::new(),
        }
    }

    pub fn set_value(&self, value: impl Into<String>) {
        if let NodeData::Element(el) = &*self.inner {
            *el.value.borrow_mut() = value.into();
        }
    }

    /// Simulate the user typing `value` into this control: the value is set,
    /// then an [`EventType::Input`] event is dispatched.
    pub fn input(&self, value: impl Into<String>) {
        self.set_value(value);
        self.dispatch_event(EventType::Input);
    }

    // -- Events -------------------------------------------------------------------

    /// Register a listener for `event`. No-op on text nodes.
    pub fn add_event_listener(&self, event: EventType, listener: impl Fn(&Node) + 'static) {
        if let NodeData::Element(el) = &*self.inner {
            el.listeners.borrow_mut().push((event, Rc::new(listener)));
        }
    }

    /// Number of listeners registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: EventType) -> usize {
        match &*self.inner {
            NodeData::Element(el) => el
                .listeners
                .borrow()
                .iter()
                .filter(|(ty, _)| *ty == event)
                .count(),
            NodeData::Text(_) => 0,
        }
    }

    /// Invoke every listener registered for `event`, in registration order.
    pub fn dispatch_event(&self, event: EventType) {
        let NodeData::Element(el) = &*self.inner else {
            return;
        };
        let listeners: SmallVec<[Listener; 2]> = el
            .listeners
            .borrow()
            .iter()
            .filter(|(ty, _)| *ty == event)
            .map(|(_, l)| Rc::clone(l))
            .collect();

        #[cfg(feature = "tracing")]
        tracing::trace!(event = %event, tag = %el.tag, listeners = listeners.len(), "dispatch_event");

        for listener in &listeners {
            listener(self);
        }
    }

    // -- Lookup -------------------------------------------------------------------

    /// First descendant element whose `id` attribute equals `id`.
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<Node> {
        self.find_descendant(&|node| node.get_attribute("id").as_deref() == Some(id))
    }

    /// First descendant element matching `selector`.
    ///
    /// Supported selectors: `#id` and a bare tag name (ASCII case-insensitive).
    #[must_use]
    pub fn query_selector(&self, selector: &str) -> Option<Node> {
        let selector = selector.trim();
        if selector.is_empty() {
            return None;
        }
        if let Some(id) = selector.strip_prefix('#') {
            return self.get_element_by_id(id);
        }
        self.find_descendant(&|node| {
            node.tag_name()
                .is_some_and(|tag| tag.eq_ignore_ascii_case(selector))
        })
    }

    fn find_descendant(&self, pred: &dyn Fn(&Node) -> bool) -> Option<Node> {
        for child in self.child_nodes() {
            if child.is_element() && pred(&child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(pred) {
                return Some(found);
            }
        }
        None
    }

    // -- Serialization -------------------------------------------------------------

    /// Serialize this node and its descendants as HTML.
    #[must_use]
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// Serialize only the descendants as HTML.
    #[must_use]
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.child_nodes() {
            child.write_html(&mut out);
        }
        out
    }

    fn write_html(&self, out: &mut String) {
        match &*self.inner {
            NodeData::Text(text) => html::escape_text(&text.borrow(), out),
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for attr in el.attributes.borrow().iter() {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    html::escape_attr(&attr.value, out);
                    out.push('"');
                }
                out.push('>');
                for child in el.children.borrow().iter() {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.inner {
            NodeData::Text(text) => f.debug_tuple("Text").field(&*text.borrow()).finish(),
            NodeData::Element(el) => f
                .debug_struct("Element")
                .field("tag", &el.tag)
                .field("attributes", &el.attributes.borrow().len())
                .field("children", &el.children.borrow().len())
                .finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn node_types() {
        assert_eq!(Node::text("x").node_type(), NodeType::Text);
        assert_eq!(Node::element("div").node_type(), NodeType::Element);
        assert_eq!(NodeType::Element as u8, 1);
        assert_eq!(NodeType::Text as u8, 3);
    }

    #[test]
    fn clone_aliases_same_node() {
        let a = Node::text("one");
        let b = a.clone();
        b.set_text_content("two");
        assert_eq!(a.text_content(), "two");
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&Node::text("two")));
    }

    #[test]
    fn element_text_content_concatenates_descendants() {
        let root = Node::element("div")
            .with_text("a")
            .with_child(Node::element("span").with_text("b"))
            .with_text("c");
        assert_eq!(root.text_content(), "abc");
    }

    #[test]
    fn element_set_text_content_replaces_children() {
        let root = Node::element("p")
            .with_child(Node::element("b").with_text("bold"))
            .with_text("tail");
        root.set_text_content("plain");
        let children = root.child_nodes();
        assert_eq!(children.len(), 1);
        assert!(children[0].is_text());
        assert_eq!(root.text_content(), "plain");

        root.set_text_content("");
        assert!(!root.has_child_nodes());
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let el = Node::element("input")
            .with_attr("type", "text")
            .with_attr("v-model", "name")
            .with_attr("id", "field");
        let names: Vec<_> = el.attributes().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["type", "v-model", "id"]);

        el.set_attribute("type", "search");
        assert_eq!(el.get_attribute("type").as_deref(), Some("search"));
        assert_eq!(el.attributes().len(), 3);
    }

    #[test]
    fn text_nodes_ignore_element_operations() {
        let t = Node::text("x");
        t.append_child(Node::text("y"));
        t.set_attribute("id", "nope");
        t.set_value("v");
        assert!(t.child_nodes().is_empty());
        assert!(t.attributes().is_empty());
        assert_eq!(t.value(), "");
    }

    #[test]
    fn input_sets_value_then_dispatches() {
        let el = Node::element("input");
        let seen = Rc::new(RefCell::new(String::new()));
        let s = Rc::clone(&seen);
        el.add_event_listener(EventType::Input, move |node| {
            *s.borrow_mut() = node.value();
        });
        el.input("hello");
        assert_eq!(el.value(), "hello");
        assert_eq!(*seen.borrow(), "hello");
    }

    #[test]
    fn dispatch_runs_listeners_in_registration_order() {
        let el = Node::element("input");
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ['a', 'b'] {
            let l = Rc::clone(&log);
            el.add_event_listener(EventType::Input, move |_| l.borrow_mut().push(tag));
        }
        el.dispatch_event(EventType::Input);
        assert_eq!(*log.borrow(), vec!['a', 'b']);
        assert_eq!(el.listener_count(EventType::Input), 2);
    }

    #[test]
    fn text_nodes_do_not_take_listeners() {
        let t = Node::text("x");
        let count = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&count);
        t.add_event_listener(EventType::Input, move |_| c.set(c.get() + 1));
        t.dispatch_event(EventType::Input);
        assert_eq!(count.get(), 0);
        assert_eq!(t.listener_count(EventType::Input), 0);
    }

    #[test]
    fn listener_may_mutate_node_reentrantly() {
        let el = Node::element("input");
        let late = Rc::new(Cell::new(0u32));
        let l = Rc::clone(&late);
        el.add_event_listener(EventType::Input, move |node| {
            node.set_value(node.value().to_uppercase());
            let l = Rc::clone(&l);
            node.add_event_listener(EventType::Input, move |_| l.set(l.get() + 1));
        });
        el.input("abc");
        assert_eq!(el.value(), "ABC");
        // Added during dispatch: not part of the running snapshot.
        assert_eq!(late.get(), 0);
        assert_eq!(el.listener_count(EventType::Input), 2);
    }

    #[test]
    fn query_selector_by_id_and_tag() {
        let input = Node::element("input").with_attr("id", "name");
        let doc = Node::element("html").with_child(
            Node::element("body")
                .with_child(Node::element("div").with_attr("id", "app"))
                .with_child(input.clone()),
        );
        assert!(doc.query_selector("#name").is_some_and(|n| n.ptr_eq(&input)));
        assert!(doc.query_selector("INPUT").is_some_and(|n| n.ptr_eq(&input)));
        assert_eq!(
            doc.query_selector("#app").and_then(|n| n.tag_name().map(str::to_owned)),
            Some("div".to_owned())
        );
        assert!(doc.query_selector("#missing").is_none());
        assert!(doc.query_selector("").is_none());
        // Descendants only.
        assert!(doc.query_selector("html").is_none());
    }

    #[test]
    fn outer_html_escapes() {
        let el = Node::element("p")
            .with_attr("title", "a \"q\" & b")
            .with_text("1 < 2 & 3 > 2");
        assert_eq!(
            el.outer_html(),
            "<p title=\"a &quot;q&quot; &amp; b\">1 &lt; 2 &amp; 3 &gt; 2</p>"
        );
        assert_eq!(el.inner_html(), "1 &lt; 2 &amp; 3 &gt; 2");
    }

    #[test]
    fn debug_format() {
        let dbg = format!("{:?}", Node::element("div").with_text("x"));
        assert!(dbg.contains("Element"));
        assert!(dbg.contains("children: 1"));
    }
}
