#![forbid(unsafe_code)]

//! Per-property dependency registry and the active-subscriber stack.
//!
//! # Design
//!
//! A [`Dep`] belongs to exactly one tracked slot of an [`Object`]. It keeps
//! `Weak` references to [`Subscriber`]s and never controls their lifetime.
//!
//! Which subscriber a read should be attributed to is decided by a
//! thread-local stack. [`push_target`] returns a guard that pops on drop, so
//! a subscriber constructed while another is collecting (for example from
//! inside an update callback) restores the outer entry when it finishes.
//!
//! # Failure Modes
//!
//! - **Panicking subscriber**: the panic propagates out of [`Dep::notify`]
//!   and the remaining subscribers are not called. The write that triggered
//!   the notification has already been stored.
//! - **Duplicate registration**: `add_subscriber` does not deduplicate. A
//!   subscriber registered twice is updated twice per notification; its own
//!   cached-value check makes the second call a no-op.
//!
//! [`Object`]: super::Object

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Something that wants to hear about changes to a tracked property.
pub trait Subscriber {
    /// Called synchronously by [`Dep::notify`] after the property changed.
    fn update(&self);
}

thread_local! {
    static TARGET_STACK: RefCell<Vec<Option<Rc<dyn Subscriber>>>> = const { RefCell::new(Vec::new()) };
}

static NEXT_DEP_ID: AtomicU64 = AtomicU64::new(1);

/// RAII guard for an entry on the active-subscriber stack.
///
/// Dropping the guard pops the entry it pushed.
#[must_use = "dropping this guard pops the active subscriber"]
pub struct TargetGuard {
    depth: usize,
    _not_send: PhantomData<Rc<()>>,
}

impl Drop for TargetGuard {
    fn drop(&mut self) {
        let _ = TARGET_STACK.try_with(|stack| {
            let mut stack = stack.borrow_mut();
            debug_assert_eq!(stack.len(), self.depth, "target guards dropped out of order");
            stack.pop();
        });
    }
}

impl fmt::Debug for TargetGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetGuard")
            .field("depth", &self.depth)
            .finish()
    }
}

fn push_entry(entry: Option<Rc<dyn Subscriber>>) -> TargetGuard {
    let depth = TARGET_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(entry);
        stack.len()
    });
    TargetGuard {
        depth,
        _not_send: PhantomData,
    }
}

/// Make `target` the active subscriber until the returned guard drops.
pub fn push_target(target: Rc<dyn Subscriber>) -> TargetGuard {
    push_entry(Some(target))
}

/// Run `f` with no active subscriber; reads inside it register nothing.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    let _guard = push_entry(None);
    f()
}

/// The subscriber currently collecting dependencies, if any.
#[must_use]
pub fn current_target() -> Option<Rc<dyn Subscriber>> {
    TARGET_STACK.with(|stack| stack.borrow().last().cloned().flatten())
}

/// Current depth of the active-subscriber stack.
#[must_use]
pub fn target_depth() -> usize {
    TARGET_STACK.with(|stack| stack.borrow().len())
}

// ---------------------------------------------------------------------------
// Dep
// ---------------------------------------------------------------------------

struct DepInner {
    id: u64,
    subscribers: RefCell<Vec<Weak<dyn Subscriber>>>,
}

/// Dependency registry for one tracked property.
///
/// Cloning a `Dep` creates a new handle to the **same** registry.
#[derive(Clone)]
pub struct Dep {
    inner: Rc<DepInner>,
}

impl Dep {
    /// Create an empty registry with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(DepInner {
                id: NEXT_DEP_ID.fetch_add(1, Ordering::Relaxed),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Process-unique id, for diagnostics.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Append `subscriber` unconditionally.
    pub fn add_subscriber(&self, subscriber: &Rc<dyn Subscriber>) {
        self.inner
            .subscribers
            .borrow_mut()
            .push(Rc::downgrade(subscriber));
    }

    /// Register the active subscriber, if there is one.
    pub fn depend(&self) {
        if let Some(target) = current_target() {
            tracing::trace!(dep = self.inner.id, "collect dependency");
            self.add_subscriber(&target);
        }
    }

    /// Call `update()` on every live subscriber in registration order and
    /// prune dead ones.
    pub fn notify(&self) {
        let live: Vec<Rc<dyn Subscriber>> = {
            let mut subscribers = self.inner.subscribers.borrow_mut();
            subscribers.retain(|w| w.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        tracing::trace!(dep = self.inner.id, subscribers = live.len(), "notify");

        for subscriber in &live {
            subscriber.update();
        }
    }

    /// Registered entries, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Whether two handles refer to the same registry.
    #[must_use]
    pub fn ptr_eq(&self, other: &Dep) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Dep {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dep")
            .field("id", &self.inner.id)
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
