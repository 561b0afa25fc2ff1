#![forbid(unsafe_code)]

//! vbind: keep a DOM subtree in sync with a plain data object.
//!
//! ```
//! use vbind::prelude::*;
//!
//! let input = Node::element("input").with_attr("v-model", "name");
//! let greeting = Node::text("{{ name }}");
//! let app = Node::element("div")
//!     .with_child(input.clone())
//!     .with_child(Node::element("p").with_child(greeting.clone()));
//!
//! let data: Object = [("name", "Ada")].into_iter().collect();
//! let vm = Vm::new(app, data);
//! assert_eq!(greeting.text_content(), "Ada");
//!
//! input.input("Grace");
//! assert_eq!(vm.get("name"), Value::from("Grace"));
//! assert_eq!(greeting.text_content(), "Grace");
//! ```

pub use vbind_dom as dom;
pub use vbind_runtime as runtime;

pub use vbind_dom::{EventType, Node, NodeType};
pub use vbind_runtime::{
    Compiler, Dep, Directive, Object, Subscriber, Value, Vm, VmError, VmOptions, Watcher, observe,
    observe_object,
};

/// Common imports for hosts mounting view-models.
pub mod prelude {
    pub use vbind_dom::{EventType, Node};
    pub use vbind_runtime::{Object, Value, Vm, VmError, VmOptions, Watcher};
}
