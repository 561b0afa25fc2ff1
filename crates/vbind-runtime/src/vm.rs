#![forbid(unsafe_code)]

//! View-model instance: a mount element bound to a reactive data object.
//!
//! [`Vm::new`] observes the data, compiles the mount element and keeps every
//! resulting [`Watcher`] alive for as long as the `Vm` lives. Reads and writes
//! through [`Vm::get`] / [`Vm::set`] go through the reactive slots, so a
//! write updates the DOM before it returns.
//!
//! Dropping the `Vm` drops its watchers; the DOM keeps its last state and
//! stops updating. Input listeners installed by `v-model` stay on their
//! nodes and keep writing into the data object.

use std::rc::Rc;

use vbind_dom::Node;

use crate::compiler::Compiler;
use crate::error::VmError;
use crate::options::VmOptions;
use crate::reactive::{Object, Value, Watcher, observe_object};

/// A mounted view-model.
pub struct Vm {
    el: Node,
    data: Object,
    watchers: Vec<Rc<Watcher>>,
}

impl Vm {
    /// Observe `data` and bind it to the descendants of `el`.
    ///
    /// Non-object data mounts an empty object.
    pub fn new(el: Node, data: impl Into<Value>) -> Self {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("vm_mount", el = ?el).entered();

        let data = match data.into() {
            Value::Object(object) => object,
            _ => Object::new(),
        };
        observe_object(&data);

        let mut compiler = Compiler::new(&data);
        compiler.compile(&el);
        let watchers = compiler.into_watchers();

        tracing::debug!(
            keys = data.len(),
            bindings = watchers.len(),
            "view-model mounted"
        );

        Self { el, data, watchers }
    }

    /// Resolve `options.el` inside `document` and mount `options.data` there.
    pub fn from_options(options: &VmOptions, document: &Node) -> Result<Self, VmError> {
        if options.el.trim().is_empty() {
            return Err(VmError::EmptySelector);
        }
        let el = document
            .query_selector(&options.el)
            .ok_or_else(|| VmError::MountNotFound(options.el.clone()))?;
        Ok(Self::new(el, options.data_value()))
    }

    /// Read a data property (tracked if a watcher is collecting).
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        self.data.get(key)
    }

    /// Write a data property; bound DOM nodes are updated synchronously.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        self.data.set(key, value);
    }

    /// The mount element.
    #[must_use]
    pub fn el(&self) -> &Node {
        &self.el
    }

    /// The reactive data object.
    #[must_use]
    pub fn data(&self) -> &Object {
        &self.data
    }

    #[must_use]
    pub fn watchers(&self) -> &[Rc<Watcher>] {
        &self.watchers
    }

    #[must_use]
    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }
}

impl std::fmt::Debug for Vm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vm")
            .field("el", &self.el)
            .field("data", &self.data)
            .field("watcher_count", &self.watchers.len())
            .finish()
    }
}
