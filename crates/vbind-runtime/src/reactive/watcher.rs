#![forbid(unsafe_code)]

//! Subscribers bound to a single property.
//!
//! # Design
//!
//! A [`Watcher`] names one `(object, key)` pair and a change callback. Its
//! constructor makes it the active subscriber for exactly one read of that
//! property, which is how the property's [`Dep`](super::Dep) learns about it.
//! The value read is kept in an explicit `cached` field.
//!
//! On [`update`](Subscriber::update) the property is re-read without
//! tracking. The callback runs only if the new value is not identical to the
//! cached one; the cache is refreshed *before* the callback, so a callback
//! that writes the same value back (two-way bindings do) ends the cycle.
//!
//! # Failure Modes
//!
//! - **Callback panics**: the cache already holds the new value; the panic
//!   propagates through [`Dep::notify`](super::Dep::notify).
//! - **Watcher dropped**: the `Dep` only holds a `Weak`, so the callback
//!   stops firing and the entry is pruned on the next notification.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::dep::{self, Subscriber};
use super::value::{Object, Value};

type Callback = Box<dyn Fn(&Value)>;

/// One binding's interest in one property.
pub struct Watcher {
    root: Object,
    key: String,
    cached: RefCell<Value>,
    on_change: Callback,
}

impl Watcher {
    /// Create a watcher on `root[key]` and register it with the property's
    /// dependency registry.
    pub fn new(
        root: &Object,
        key: impl Into<String>,
        on_change: impl Fn(&Value) + 'static,
    ) -> Rc<Self> {
        let watcher = Rc::new(Self {
            root: root.clone(),
            key: key.into(),
            cached: RefCell::new(Value::Undefined),
            on_change: Box::new(on_change),
        });

        let target: Rc<dyn Subscriber> = watcher.clone();
        let initial = {
            let _guard = dep::push_target(target);
            watcher.root.get(&watcher.key)
        };
        *watcher.cached.borrow_mut() = initial;

        tracing::trace!(key = %watcher.key, "watcher registered");
        watcher
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn root(&self) -> &Object {
        &self.root
    }

    /// Last value seen by this watcher.
    #[must_use]
    pub fn value(&self) -> Value {
        self.cached.borrow().clone()
    }
}

impl Subscriber for Watcher {
    fn update(&self) {
        let current = dep::untracked(|| self.root.get(&self.key));
        {
            let mut cached = self.cached.borrow_mut();
            if cached.same(&current) {
                return;
            }
            *cached = current.clone();
        }
        (self.on_change)(&current);
    }
}

impl fmt::Debug for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("key", &self.key)
            .field("cached", &*self.cached.borrow())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
