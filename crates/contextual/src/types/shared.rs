use std::cell::RefCell;
use std::rc::Rc;

use super::Value;

/// A reference-counted, interior-mutable handle to a value.
///
/// Cloning a `Shared` clones the handle, not the contents: every clone
/// reads and writes the same underlying value. This is the mechanism
/// behind [`Context::proceed_once`], which stores its result behind a
/// `Shared` handle so repeated calls hand out the same instance.
///
/// # Example
///
/// ```
/// use contextual::{Shared, Value};
///
/// let first = Shared::new(Value::from("draft"));
/// let second = first.clone();
///
/// first.set(Value::from("final"));
/// assert_eq!(second.get(), Value::from("final"));
/// assert!(first.ptr_eq(&second));
/// ```
///
/// [`Context::proceed_once`]: crate::Context::proceed_once
#[derive(Clone)]
pub struct Shared(Rc<RefCell<Value>>);

impl Shared {
    /// Wrap a value in a fresh handle.
    pub fn new(value: Value) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Snapshot of the current contents.
    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }

    /// Replace the contents.
    pub fn set(&self, value: Value) {
        *self.0.borrow_mut() = value;
    }

    /// Mutate the contents in place.
    pub fn update(&self, f: impl FnOnce(&mut Value)) {
        f(&mut self.0.borrow_mut());
    }

    /// Whether two handles point at the same underlying value.
    pub fn ptr_eq(&self, other: &Shared) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Shared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Shared").field(&self.0.borrow()).finish()
    }
}
