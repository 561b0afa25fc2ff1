#![forbid(unsafe_code)]

//! Minimal in-memory DOM for vbind.
//!
//! The binding engine only needs a handful of DOM capabilities: node type
//! inspection, child enumeration, text content, ordered attributes, a form
//! control value, and input-event listeners. This crate provides exactly
//! those on shared, reference-counted [`Node`] handles, plus a small builder
//! API and HTML serialization for hosts and tests.
//!
//! # Invariants
//!
//! 1. Cloning a [`Node`] aliases the same node (like a browser node handle).
//! 2. Attributes keep insertion order; setting an existing name replaces the
//!    value in place.
//! 3. Listeners are invoked in registration order and may mutate the node
//!    they were dispatched on.

pub mod event;
pub mod html;
pub mod node;

pub use event::EventType;
pub use node::{Attribute, Node, NodeType};
