//! Callable registry for behaviour dispatch.
//!
//! Behaviours resolve to *names*; this registry maps those names to the
//! functions and constructors an application chose to expose. The engine
//! has no knowledge of what gets registered, it only resolves and
//! dispatches.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::engine::DispatchError;
use crate::types::Value;

/// A registered callable: free function or class constructor.
pub type Callable = Rc<dyn Fn(&[Value]) -> Result<Value, DispatchError>>;

/// Registry mapping names to invokable targets, in two tables.
///
/// A name registered as a function is invoked; a name registered as a
/// class is constructed. The same name may appear in both tables, the
/// behaviour's tag decides which table is consulted.
#[derive(Default, Clone)]
pub struct CallableRegistry {
    functions: BTreeMap<String, Callable>,
    classes: BTreeMap<String, Callable>,
}

impl CallableRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a free function under a name.
    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        callable: impl Fn(&[Value]) -> Result<Value, DispatchError> + 'static,
    ) {
        self.functions.insert(name.into(), Rc::new(callable));
    }

    /// Register a class constructor under a name.
    pub fn register_class(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn(&[Value]) -> Result<Value, DispatchError> + 'static,
    ) {
        self.classes.insert(name.into(), Rc::new(constructor));
    }

    /// Get a registered function by name.
    pub fn function(&self, name: &str) -> Option<Callable> {
        self.functions.get(name).cloned()
    }

    /// Get a registered constructor by name.
    pub fn class(&self, name: &str) -> Option<Callable> {
        self.classes.get(name).cloned()
    }

    /// Whether a function is registered under `name`.
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Whether a class is registered under `name`.
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }
}

impl std::fmt::Debug for CallableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallableRegistry")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("classes", &self.classes.keys().collect::<Vec<_>>())
            .finish()
    }
}
