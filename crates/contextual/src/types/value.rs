use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::{ObjectHandle, Shared};

/// A runtime value flowing through the substitution engine.
///
/// `Value` is a closed tagged union over the shapes the engine dispatches
/// on: scalars pass through substitution unchanged, strings are scanned for
/// placeholders, and containers are rebuilt with every element substituted.
///
/// # Example
///
/// ```
/// use contextual::Value;
///
/// // Numbers become Value::Number
/// let moment: Value = 10.into();
///
/// // Strings become Value::String
/// let subject: Value = "a {kind} of subject".into();
///
/// // Vectors become Value::Seq
/// let parts: Value = vec!["one", "two"].into();
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The absent value. Stringifies to the empty string.
    #[default]
    Unit,

    /// A boolean.
    Bool(bool),

    /// An integer number.
    Number(i64),

    /// A floating-point number.
    Float(f64),

    /// A string, subject to placeholder matching.
    String(String),

    /// An ordered sequence. Substitution maps over the elements.
    Seq(Vec<Value>),

    /// A structured record with named public fields. Substitution produces
    /// a new record; the original is never mutated.
    Record(BTreeMap<String, Value>),

    /// A reference-counted handle with interior mutability. Cloning the
    /// value clones the handle, so every copy sees the same contents.
    Shared(Shared),

    /// An opaque host object reachable through the [`Receiver`] seam.
    /// Compared and shared by pointer identity.
    ///
    /// [`Receiver`]: crate::Receiver
    Object(ObjectHandle),
}

impl Value {
    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as a number, if it is one.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float, if it is one.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Number(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Get this value as a string, if it is one.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as a sequence, if it is one.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Get this value as a record, if it is one.
    pub fn as_record(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get this value as a shared handle, if it is one.
    pub fn as_shared(&self) -> Option<&Shared> {
        match self {
            Value::Shared(handle) => Some(handle),
            _ => None,
        }
    }

    /// Get this value as an object handle, if it is one.
    pub fn as_object(&self) -> Option<&ObjectHandle> {
        match self {
            Value::Object(handle) => Some(handle),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Unit => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Seq(items) => {
                write!(f, "[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Record(fields) => {
                write!(f, "[")?;
                for (index, (key, field)) in fields.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {field}")?;
                }
                write!(f, "]")
            }
            Value::Shared(handle) => write!(f, "{}", handle.get()),
            Value::Object(handle) => write!(f, "{}", handle.label()),
        }
    }
}

/// Data shapes compare structurally; handle shapes compare by pointer
/// identity, matching their sharing semantics.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Shared(a), Value::Shared(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// Serialization gives every value a deterministic form for identity
/// hashing and memoization keys. Shared handles serialize their current
/// contents; objects serialize their label.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Unit => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, field) in fields {
                    map.serialize_entry(key, field)?;
                }
                map.end()
            }
            Value::Shared(handle) => handle.get().serialize(serializer),
            Value::Object(handle) => serializer.serialize_str(handle.label()),
        }
    }
}

// From implementations for common types

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as i64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Value::Record(fields)
    }
}

impl From<Shared> for Value {
    fn from(handle: Shared) -> Self {
        Value::Shared(handle)
    }
}

impl From<ObjectHandle> for Value {
    fn from(handle: ObjectHandle) -> Self {
        Value::Object(handle)
    }
}
