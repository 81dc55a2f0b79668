//! The substitution engine.
//!
//! Takes an arbitrary value and a lookup source and returns the value with
//! every resolvable `{name}` placeholder replaced, recursively, across
//! strings, sequences, and records.

use std::collections::BTreeMap;

use crate::engine::SubstituteError;
use crate::parser::{Segment, scan};
use crate::types::{Shared, Value};

/// Default recursion cap. The original design had no depth control and
/// accepted infinite recursion on cyclic description graphs; this cap
/// turns that hazard into a [`SubstituteError::TooDeep`] failure.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// A source of named property values for the engine.
pub trait Lookup {
    /// The raw stored value for `name`, if described.
    fn resolve(&self, name: &str) -> Option<Value>;

    /// Whether `value` is the lookup source's own container.
    ///
    /// An excluded value is returned unchanged instead of being expanded,
    /// which keeps a source reachable from its own descriptions from
    /// substituting into itself.
    fn excludes(&self, _value: &Value) -> bool {
        false
    }
}

/// A BTreeMap of descriptions is the minimal lookup source.
impl Lookup for BTreeMap<String, Value> {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Stateless-per-call substitution over a borrowed lookup source.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use contextual::{Substituter, Value};
///
/// let mut descriptions = BTreeMap::new();
/// descriptions.insert("context".to_string(), Value::from("Test"));
/// descriptions.insert("alias".to_string(), Value::from("{context} Context"));
///
/// let engine = Substituter::new(&descriptions);
/// let result = engine.apply(&Value::from("alias is '{alias}'")).unwrap();
/// assert_eq!(result, Value::from("alias is 'Test Context'"));
/// ```
pub struct Substituter<'a> {
    source: &'a dyn Lookup,
    max_depth: usize,
}

impl<'a> Substituter<'a> {
    /// Create an engine over a lookup source with the default depth cap.
    pub fn new(source: &'a dyn Lookup) -> Self {
        Self {
            source,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Create an engine with a custom depth cap.
    pub fn with_max_depth(source: &'a dyn Lookup, max_depth: usize) -> Self {
        Self { source, max_depth }
    }

    /// Substitute every resolvable placeholder in `value`.
    pub fn apply(&self, value: &Value) -> Result<Value, SubstituteError> {
        self.apply_at(value, 0)
    }

    fn ensure_depth(&self, depth: usize) -> Result<(), SubstituteError> {
        if depth > self.max_depth {
            return Err(SubstituteError::TooDeep {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    /// Dispatch on value shape.
    fn apply_at(&self, value: &Value, depth: usize) -> Result<Value, SubstituteError> {
        self.ensure_depth(depth)?;
        match value {
            Value::String(s) => self.apply_str(s, depth),
            Value::Seq(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.apply_at(item, depth + 1)?);
                }
                Ok(Value::Seq(out))
            }
            Value::Record(fields) => {
                let mut out = BTreeMap::new();
                for (key, field) in fields {
                    out.insert(key.clone(), self.apply_at(field, depth + 1)?);
                }
                Ok(Value::Record(out))
            }
            Value::Shared(handle) => {
                if self.source.excludes(value) {
                    return Ok(value.clone());
                }
                let inner = handle.get();
                let substituted = self.apply_at(&inner, depth + 1)?;
                Ok(Value::Shared(Shared::new(substituted)))
            }
            // Scalars pass through; objects are opaque, they have no
            // public fields to substitute into.
            Value::Unit
            | Value::Bool(_)
            | Value::Number(_)
            | Value::Float(_)
            | Value::Object(_) => Ok(value.clone()),
        }
    }

    /// Substitute placeholders in a string, in two matching modes.
    ///
    /// Strict mode: the entire string is exactly one brace-free
    /// placeholder. The raw lookup result is substituted and returned
    /// directly, without stringification, which is how non-string values
    /// land in a subject, environment, moment, or description slot. A
    /// miss returns the string unchanged.
    ///
    /// General mode: every well-formed placeholder is replaced by the
    /// stringified lookup result. A missed name carrying a nested group
    /// is itself substituted and re-emitted in braces, so an indirect
    /// name like `{{b}}` resolves through `b` on the rescan; a brace-free
    /// miss stays in place. A pass that changed the text is rescanned
    /// until a pass changes nothing; the final pass unescapes `\{` and
    /// `\}` to literal braces.
    fn apply_str(&self, input: &str, depth: usize) -> Result<Value, SubstituteError> {
        self.ensure_depth(depth)?;
        let segments = scan(input);

        if let [Segment::Placeholder(name)] = segments.as_slice() {
            if !name.contains(['{', '}']) {
                return match self.source.resolve(name) {
                    Some(raw) => match self.apply_at(&raw, depth + 1)? {
                        Value::String(s) => Ok(Value::String(unescape(&s))),
                        other => Ok(other),
                    },
                    None => Ok(Value::String(input.to_string())),
                };
            }
        }

        let mut out = String::with_capacity(input.len());
        for segment in &segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                // Escapes survive rescans and are only unescaped on the
                // final pass.
                Segment::Escaped(brace) => {
                    out.push('\\');
                    out.push(*brace);
                }
                Segment::Placeholder(name) => match self.source.resolve(name) {
                    Some(raw) => out.push_str(&unescape(&raw.to_string())),
                    // A nested group is an indirect name: substitute the
                    // name itself and let the rescan look up the result.
                    // The literal braced text keeps key precedence, it is
                    // only expanded after the lookup missed.
                    None if name.contains(['{', '}']) => {
                        let resolved = self.apply_str(name, depth + 1)?;
                        out.push('{');
                        out.push_str(&resolved.to_string());
                        out.push('}');
                    }
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                },
            }
        }

        // Fixed point by textual comparison: an unresolvable placeholder
        // replaces itself, so it stops the rescan instead of looping.
        if out == input {
            Ok(Value::String(unescape(&out)))
        } else {
            self.apply_str(&out, depth + 1)
        }
    }
}

/// Turn escaped delimiters back into literal braces.
fn unescape(s: &str) -> String {
    s.replace("\\{", "{").replace("\\}", "}")
}
