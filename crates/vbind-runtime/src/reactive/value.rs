#![forbid(unsafe_code)]

//! Dynamically-typed values and shared object handles.
//!
//! # Design
//!
//! [`Value`] mirrors the data a template can bind to: `undefined`, `null`,
//! booleans, numbers, strings and objects. [`Object`] is a shared,
//! reference-counted map with insertion-ordered keys. Cloning an `Object`
//! aliases it, so a nested object reached through two parents is one object.
//!
//! Each property lives in a slot. A slot becomes *tracked* when
//! [`observe`](super::observe) installs a [`Dep`] on it; from then on reads
//! collect the active subscriber and changing writes notify.
//!
//! # Identity
//!
//! [`Value::same`] is strict identity: primitives compare by value (IEEE
//! semantics for numbers, so `NaN` is never identical to itself), objects by
//! handle. Two structurally equal but distinct objects are *not* the same.
//! `PartialEq` for `Value` uses the same rule.
//!
//! # Failure Modes
//!
//! - **Cyclic graphs**: allowed. Observation marks a slot tracked before
//!   descending into it, and `Debug` prints keys only.
//! - **Late properties**: writing a key that did not exist when the object
//!   was observed creates an untracked slot. Bindings to it never update.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use super::dep::Dep;
use super::observer;

/// A value that can be stored in an [`Object`] and bound into the DOM.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(Object),
}

impl Value {
    /// Strict identity (see module docs).
    #[must_use]
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// `undefined` or `null`.
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The string the `textContent` setter stores for this value:
    /// `undefined` and `null` become the empty string, everything else uses
    /// its display form.
    #[must_use]
    pub fn to_text_content(&self) -> String {
        if self.is_nullish() {
            String::new()
        } else {
            self.to_string()
        }
    }

    /// The string a form control's `value` setter stores for this value.
    /// Only `null` is blanked; `undefined` is written as the text
    /// `undefined`.
    #[must_use]
    pub fn to_form_value(&self) -> String {
        match self {
            Self::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

/// String coercion: `undefined`, `null`, `true`, `42`, `1.5`, `NaN`,
/// `Infinity`, `[object Object]`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => fmt_number(*n, f),
            Self::String(s) => f.write_str(s),
            Self::Object(_) => f.write_str("[object Object]"),
        }
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        // Covers -0.
        f.write_str("0")
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        fmt_exponent(n, f)
    } else if n.fract() == 0.0 {
        write!(f, "{n:.0}")
    } else {
        write!(f, "{n}")
    }
}

/// Shortest round-trip digits with a signed exponent: `1e+21`, `1.5e-7`.
fn fmt_exponent(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let formatted = format!("{n:e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
        _ => f.write_str(&formatted),
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("Undefined"),
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Object(o) => o.fmt(f),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Self::Object(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// JSON arrays become objects keyed `"0"`, `"1"`, ...; array mutation is not
/// intercepted, so no list semantics are kept.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::Object(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| (i.to_string(), Value::from(item)))
                    .collect(),
            ),
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

struct Slot {
    key: String,
    value: Value,
    /// Present once the slot has been observed.
    dep: Option<Dep>,
}

#[derive(Default)]
struct ObjectInner {
    slots: Vec<Slot>,
    index: AHashMap<String, usize>,
}

impl ObjectInner {
    fn push(&mut self, key: String, value: Value) {
        self.index.insert(key.clone(), self.slots.len());
        self.slots.push(Slot {
            key,
            value,
            dep: None,
        });
    }
}

/// Shared, insertion-ordered property map.
///
/// Cloning an `Object` creates a new handle to the **same** properties.
#[derive(Clone, Default)]
pub struct Object {
    inner: Rc<RefCell<ObjectInner>>,
}

impl Object {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `key`. Tracked slots register the active subscriber.
    /// Missing keys read as [`Value::Undefined`].
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        let (value, dep) = {
            let inner = self.inner.borrow();
            let Some(i) = inner.index.get(key).copied() else {
                return Value::Undefined;
            };
            let slot = &inner.slots[i];
            (slot.value.clone(), slot.dep.clone())
        };
        if let Some(dep) = dep {
            dep.depend();
        }
        value
    }

    /// Write `key`.
    ///
    /// On a tracked slot an identical value is ignored; otherwise the value
    /// is stored, observed, and the slot's subscribers are notified before
    /// this returns. Untracked and new keys are plain assignments.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        let dep = {
            let mut inner = self.inner.borrow_mut();
            let Some(i) = inner.index.get(key).copied() else {
                inner.push(key.to_owned(), value);
                return;
            };
            let slot = &mut inner.slots[i];
            let Some(dep) = slot.dep.clone() else {
                slot.value = value;
                return;
            };
            if slot.value.same(&value) {
                return;
            }
            slot.value = value.clone();
            dep
        };

        tracing::trace!(key, dep = dep.id(), "reactive write");
        observer::observe(&value);
        dep.notify();
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.borrow().index.contains_key(key)
    }

    /// Keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner
            .borrow()
            .slots
            .iter()
            .map(|s| s.key.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().slots.is_empty()
    }

    /// Whether `key` exists and has been observed.
    #[must_use]
    pub fn is_tracked(&self, key: &str) -> bool {
        self.dep(key).is_some()
    }

    /// The dependency registry of a tracked slot.
    #[must_use]
    pub fn dep(&self, key: &str) -> Option<Dep> {
        let inner = self.inner.borrow();
        inner
            .index
            .get(key)
            .and_then(|&i| inner.slots[i].dep.clone())
    }

    /// Whether two handles refer to the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Install a `Dep` on every untracked slot and return those slots'
    /// values, in key order.
    pub(crate) fn track_slots(&self) -> Vec<Value> {
        let mut inner = self.inner.borrow_mut();
        inner
            .slots
            .iter_mut()
            .filter(|slot| slot.dep.is_none())
            .map(|slot| {
                slot.dep = Some(Dep::new());
                slot.value.clone()
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let object = Object::new();
        {
            let mut inner = object.inner.borrow_mut();
            for (k, v) in iter {
                let key = k.into();
                let value = v.into();
                match inner.index.get(&key).copied() {
                    Some(i) => inner.slots[i].value = value,
                    None => inner.push(key, value),
                }
            }
        }
        object
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Object")
            .field("keys", &inner.slots.iter().map(|s| &s.key).collect::<Vec<_>>())
            .field(
                "tracked",
                &inner.slots.iter().filter(|s| s.dep.is_some()).count(),
            )
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
