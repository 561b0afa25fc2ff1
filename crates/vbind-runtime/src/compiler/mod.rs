#![forbid(unsafe_code)]

//! Template compilation: turning a DOM subtree into live bindings.
//!
//! The [`Compiler`] walks a subtree once, depth-first in document order:
//!
//! - a text node containing `{{ key }}` gets the value substituted for that
//!   one match and a [`Watcher`] that rewrites the node's text on change;
//! - an element's `v-*` attributes are looked up in the [`Directive`] table
//!   and applied in attribute order; unknown directives are ignored;
//! - every node with children is descended into after it was handled.
//!
//! # Invariants
//!
//! 1. Nodes without bindings are not written to.
//! 2. Each binding produces exactly one `Watcher`, owned by the compiler.
//! 3. The initial DOM write uses the same value the watcher caches.
//!
//! # Failure Modes
//!
//! - **Missing key**: the binding reads `undefined`. Interpolation and
//!   `v-model` write the text `undefined`; `v-text` writes `""`.
//! - **Compiling twice**: creates a second set of watchers for the same
//!   nodes. Both sets stay live.

pub mod directive;
pub mod interpolation;

pub use directive::{DIRECTIVE_PREFIX, Directive, directive_name};
pub use interpolation::Interpolation;

use std::rc::Rc;

use vbind_dom::{EventType, Node, NodeType};

use crate::reactive::{Object, Value, Watcher};

/// Walks DOM subtrees and binds them to a data object.
pub struct Compiler {
    data: Object,
    watchers: Vec<Rc<Watcher>>,
}

impl Compiler {
    /// Create a compiler that binds against `data`.
    #[must_use]
    pub fn new(data: &Object) -> Self {
        Self {
            data: data.clone(),
            watchers: Vec::new(),
        }
    }

    /// Bind every interpolation and directive below `root`.
    ///
    /// `root` itself is not inspected; its descendants are.
    pub fn compile(&mut self, root: &Node) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("compile", root = ?root).entered();

        let before = self.watchers.len();
        self.compile_children(root);
        tracing::debug!(bindings = self.watchers.len() - before, "template compiled");
    }

    /// Watchers created so far.
    #[must_use]
    pub fn watchers(&self) -> &[Rc<Watcher>] {
        &self.watchers
    }

    /// Give up the compiler, keeping the bindings it created.
    #[must_use]
    pub fn into_watchers(self) -> Vec<Rc<Watcher>> {
        self.watchers
    }

    fn compile_children(&mut self, node: &Node) {
        for child in node.child_nodes() {
            match child.node_type() {
                NodeType::Text => self.compile_text(&child),
                NodeType::Element => self.compile_element(&child),
            }
            if child.has_child_nodes() {
                self.compile_children(&child);
            }
        }
    }

    fn compile_text(&mut self, node: &Node) {
        let text = node.text_content();
        let Some(found) = interpolation::find(&text) else {
            return;
        };
        let key = found.key.to_owned();
        let value = self.data.get(&key);
        node.set_text_content(found.substitute(&text, &value.to_string()));

        let target = node.clone();
        self.watch(key, move |v| target.set_text_content(v.to_text_content()));
    }

    fn compile_element(&mut self, node: &Node) {
        for attr in node.attributes() {
            let Some(name) = directive_name(&attr.name) else {
                continue;
            };
            match Directive::from_name(name) {
                Some(directive) => self.apply(node, directive, &attr.value),
                None => tracing::trace!(attribute = %attr.name, "ignoring unknown directive"),
            }
        }
    }

    fn apply(&mut self, node: &Node, directive: Directive, key: &str) {
        match directive {
            Directive::Text => self.bind_text(node, key),
            Directive::Model => self.bind_model(node, key),
        }
    }

    fn bind_text(&mut self, node: &Node, key: &str) {
        node.set_text_content(self.data.get(key).to_text_content());

        let target = node.clone();
        self.watch(key.to_owned(), move |v| {
            target.set_text_content(v.to_text_content());
        });
    }

    fn bind_model(&mut self, node: &Node, key: &str) {
        node.set_value(self.data.get(key).to_form_value());

        let data = self.data.clone();
        let prop = key.to_owned();
        node.add_event_listener(EventType::Input, move |control| {
            data.set(&prop, Value::String(control.value()));
        });

        let target = node.clone();
        self.watch(key.to_owned(), move |v| target.set_value(v.to_form_value()));
    }

    fn watch(&mut self, key: String, on_change: impl Fn(&Value) + 'static) {
        self.watchers.push(Watcher::new(&self.data, key, on_change));
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("data", &self.data)
            .field("watchers", &self.watchers.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
