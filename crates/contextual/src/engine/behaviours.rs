//! Behaviour registry and dispatch.
//!
//! A behaviour is a named alias to an invokable target that benefits from
//! description replacements at call or construction time. Behaviours help
//! to launch functions or create objects within the context with
//! [`Context::proceed`], and to share one contextual object across call
//! sites with [`Context::proceed_once`].

use serde::Serialize;

use crate::engine::{Context, DispatchError, SubstituteError};
use crate::types::{Shared, Value};

/// A named resolution target.
///
/// Stored names and targets may themselves be placeholder strings; they
/// are resolved through the substitution engine before use, so a
/// behaviour can be late-bound to whatever a description names at call
/// time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Behaviour {
    /// A free function, referenced by its registered name.
    Function(String),

    /// A method on a target object.
    Method { target: Value, name: String },

    /// A class to instantiate, referenced by its registered name.
    Class(String),
}

impl Behaviour {
    pub fn function(name: impl Into<String>) -> Self {
        Behaviour::Function(name.into())
    }

    pub fn method(target: impl Into<Value>, name: impl Into<String>) -> Self {
        Behaviour::Method {
            target: target.into(),
            name: name.into(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Behaviour::Class(name.into())
    }
}

impl Context {
    /// Register a behaviour under a name.
    pub fn add_behaviour(&mut self, name: impl Into<String>, behaviour: Behaviour) -> &mut Self {
        self.behaviours.insert(name.into(), behaviour);
        self
    }

    /// Delete a behaviour. The exact inverse of `add_behaviour` with
    /// respect to `identify`.
    pub fn del_behaviour(&mut self, name: &str) -> &mut Self {
        self.behaviours.remove(name);
        self
    }

    /// Whether a behaviour is registered under `name` as stored.
    pub fn has_behaviour(&self, name: &str) -> bool {
        self.behaviours.contains_key(name)
    }

    /// Expose a free function to behaviours under a name.
    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        callable: impl Fn(&[Value]) -> Result<Value, DispatchError> + 'static,
    ) -> &mut Self {
        self.callables.register_function(name, callable);
        self
    }

    /// Expose a class constructor to behaviours under a name.
    pub fn register_class(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn(&[Value]) -> Result<Value, DispatchError> + 'static,
    ) -> &mut Self {
        self.callables.register_class(name, constructor);
        self
    }

    /// Resolve a behaviour by name.
    ///
    /// The name itself is substituted first, so a caller can pass
    /// `"{alias}"` and reach the registered key it resolves to. The
    /// stored target comes back substitution-resolved as well.
    pub fn get_behaviour(&self, name: &str) -> Result<Option<Behaviour>, SubstituteError> {
        let resolved = self.resolve_text(name)?;
        match self.behaviours.get(&resolved) {
            Some(behaviour) => Ok(Some(self.resolve_behaviour(behaviour)?)),
            None => Ok(None),
        }
    }

    /// Resolve a behaviour by name, falling back to a substituted default
    /// when nothing is registered under the resolved name.
    pub fn get_behaviour_or(
        &self,
        name: &str,
        default: Behaviour,
    ) -> Result<Behaviour, SubstituteError> {
        match self.get_behaviour(name)? {
            Some(behaviour) => Ok(behaviour),
            None => self.resolve_behaviour(&default),
        }
    }

    /// Whether the resolved target is a registered class.
    pub fn is_class(&self, name: &str) -> Result<bool, SubstituteError> {
        Ok(matches!(
            self.get_behaviour(name)?,
            Some(Behaviour::Class(class)) if self.callables.has_class(&class)
        ))
    }

    /// Whether the resolved target is directly invokable: a registered
    /// function, or a method its receiver responds to.
    pub fn is_callable(&self, name: &str) -> Result<bool, SubstituteError> {
        Ok(match self.get_behaviour(name)? {
            Some(Behaviour::Function(function)) => self.callables.has_function(&function),
            Some(Behaviour::Method { target, name }) => match unwrap_shared(target) {
                Value::Object(handle) => handle.responds_to(&name),
                _ => false,
            },
            Some(Behaviour::Class(_)) | None => false,
        })
    }

    /// Launch a behaviour as a function, method, or object construction.
    ///
    /// The behaviour name, its stored target, and the arguments are all
    /// substituted to stay contextual, and so is the result. A missing
    /// behaviour or a target that is not invokable is a programmer error
    /// and fails immediately.
    pub fn proceed(&self, name: &str, args: &[Value]) -> Result<Value, DispatchError> {
        let behaviour = self
            .get_behaviour(name)?
            .ok_or_else(|| DispatchError::NotInvokable {
                name: name.to_string(),
            })?;
        let args = self.normalize_args(args)?;

        let result = match behaviour {
            Behaviour::Function(function) => {
                let callable = self
                    .callables
                    .function(&function)
                    .ok_or(DispatchError::UnknownFunction { name: function })?;
                callable(&args)?
            }
            Behaviour::Method {
                target,
                name: method,
            } => match unwrap_shared(target) {
                Value::Object(handle) => handle.call(&method, &args)?,
                _ => {
                    return Err(DispatchError::NotInvokable {
                        name: name.to_string(),
                    });
                }
            },
            Behaviour::Class(class) => {
                let constructor = self
                    .callables
                    .class(&class)
                    .ok_or(DispatchError::UnknownClass { name: class })?;
                constructor(&args)?
            }
        };

        Ok(self.normalize(&result)?)
    }

    /// Identical to `proceed`, but the result is stored in descriptions
    /// and handed back as-is on later calls with the same name and
    /// arguments.
    ///
    /// The memo key covers the pre-substitution arguments. The stored
    /// entry lives behind a [`Shared`] handle, so every call site works
    /// with the same instance and mutations are visible across them. The
    /// entry participates in `identify` and is removed by `pop_out`.
    pub fn proceed_once(&mut self, name: &str, args: &[Value]) -> Result<Value, DispatchError> {
        let key = memo_key(name, args);
        if !self.has_description(&key) {
            let result = self.proceed(name, args)?;
            let stored = match result {
                handle @ (Value::Shared(_) | Value::Object(_)) => handle,
                owned => Value::Shared(Shared::new(owned)),
            };
            self.remember(key.clone(), stored);
        }
        Ok(self.description_value(&key).unwrap_or_default())
    }

    /// Substitute a behaviour's stored names and target.
    fn resolve_behaviour(&self, behaviour: &Behaviour) -> Result<Behaviour, SubstituteError> {
        Ok(match behaviour {
            Behaviour::Function(name) => Behaviour::Function(self.resolve_text(name)?),
            Behaviour::Class(name) => Behaviour::Class(self.resolve_text(name)?),
            Behaviour::Method { target, name } => Behaviour::Method {
                target: self.normalize(target)?,
                name: self.resolve_text(name)?,
            },
        })
    }

    /// Substitute a name-position string. A resolution that does not come
    /// back as a string leaves the name as written.
    fn resolve_text(&self, text: &str) -> Result<String, SubstituteError> {
        match self.normalize(&Value::String(text.to_string()))? {
            Value::String(resolved) => Ok(resolved),
            _ => Ok(text.to_string()),
        }
    }

    fn normalize_args(&self, args: &[Value]) -> Result<Vec<Value>, SubstituteError> {
        args.iter().map(|arg| self.normalize(arg)).collect()
    }
}

/// Memoization key over a name and serialized arguments.
fn memo_key(name: &str, args: &[Value]) -> String {
    let serialized = serde_json::to_string(args).expect("argument values always serialize");
    format!("{name} with {serialized}")
}

/// See through a shared handle to the value a method target resolved to.
fn unwrap_shared(value: Value) -> Value {
    match value {
        Value::Shared(handle) => handle.get(),
        other => other,
    }
}
