#![forbid(unsafe_code)]

//! Event types understood by [`Node::dispatch_event`](crate::Node::dispatch_event).

use std::fmt;

/// DOM event kinds a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Fired after the user edits a form control's value.
    Input,
}

impl EventType {
    /// The DOM event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
