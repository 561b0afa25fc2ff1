#![forbid(unsafe_code)]

//! Conversion of object graphs into tracked slots.
//!
//! [`observe`] is the explicit conversion pass: for every property present on
//! an object it installs a fresh [`Dep`](super::Dep) and then descends into
//! the property's value. Slots that are already tracked are skipped, which
//! keeps each slot's `Dep` stable and terminates on cyclic graphs.

use super::value::{Object, Value};

/// Make every property reachable from `value` reactive.
///
/// Non-object values are left untouched. Properties added to an object after
/// it was observed stay untracked.
pub fn observe(value: &Value) {
    if let Value::Object(object) = value {
        observe_object(object);
    }
}

/// [`observe`] for an object handle.
pub fn observe_object(object: &Object) {
    let fresh = object.track_slots();
    if fresh.is_empty() {
        return;
    }
    tracing::trace!(tracked = fresh.len(), "observe object");
    for nested in &fresh {
        observe(nested);
    }
}
