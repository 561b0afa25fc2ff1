#![forbid(unsafe_code)]

//! Reactive data observation for vbind.
//!
//! This module provides the change-tracking primitives the compiler binds
//! against:
//!
//! - [`Value`] / [`Object`]: dynamically-typed data with shared object
//!   handles.
//! - [`observe`]: converts every property of an object graph into a tracked
//!   slot with its own [`Dep`].
//! - [`Dep`]: per-property registry of interested [`Subscriber`]s.
//! - [`Watcher`]: a subscriber bound to one `(object, key)` pair with a
//!   change callback.
//!
//! # Architecture
//!
//! Objects use `Rc<RefCell<..>>` for single-threaded shared ownership. A
//! `Dep` stores its subscribers as `Weak` references; whoever created a
//! `Watcher` owns it, and dead entries are pruned lazily on notify.
//!
//! Dependency collection uses a thread-local stack of active subscribers.
//! A read of a tracked slot registers the subscriber on top of the stack.
//! [`Watcher::new`] pushes itself for exactly one read; [`untracked`] pushes
//! an empty entry so reads inside it register nothing.
//!
//! # Invariants
//!
//! 1. A tracked slot gets exactly one `Dep`, created when the slot is first
//!    observed and never replaced.
//! 2. Writing a value identical to the current one is a no-op (no
//!    conversion, no notification).
//! 3. Subscribers are notified in registration order, synchronously.
//! 4. Object values written into a tracked slot are observed before any
//!    subscriber is notified.
//! 5. No `RefCell` borrow is held while a subscriber runs.

pub mod dep;
pub mod observer;
pub mod value;
pub mod watcher;

pub use dep::{Dep, Subscriber, TargetGuard, current_target, push_target, untracked};
pub use observer::{observe, observe_object};
pub use value::{Object, Value};
pub use watcher::Watcher;
