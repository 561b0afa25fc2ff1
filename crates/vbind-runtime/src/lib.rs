#![forbid(unsafe_code)]

//! Reactive binding engine for vbind.
//!
//! Three pieces cooperate to keep a DOM subtree in sync with a data object:
//!
//! - [`reactive::observe`] turns every property of an [`Object`] graph into a
//!   tracked slot backed by its own [`Dep`].
//! - [`Watcher`] records interest in one property: constructing it reads the
//!   property while it is the active subscriber, which registers it with the
//!   property's `Dep`.
//! - [`Compiler`] walks the DOM once, finds `{{key}}` interpolations and
//!   `v-text` / `v-model` directives, and creates one `Watcher` per binding.
//!
//! [`Vm`] wires these together for a mount point and a data object.
//!
//! Everything runs synchronously on the calling thread: a property write
//! has finished updating the DOM by the time it returns.

pub mod compiler;
pub mod error;
pub mod options;
pub mod reactive;
pub mod vm;

pub use compiler::{Compiler, Directive};
pub use error::VmError;
pub use options::VmOptions;
pub use reactive::{Dep, Object, Subscriber, Value, Watcher, observe, observe_object};
pub use vm::Vm;
