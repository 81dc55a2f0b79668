use std::rc::Rc;

use crate::engine::DispatchError;
use crate::types::Value;

/// The seam through which host objects expose methods to behaviours.
///
/// A behaviour of the form `Behaviour::Method { target, name }` resolves
/// its target to a `Value::Object` and dispatches the method through this
/// trait. Which methods exist on a receiver is entirely the host's
/// decision; the engine only routes the call.
pub trait Receiver {
    /// Stable label used for serialization, identity hashing, and display.
    fn label(&self) -> &str;

    /// Whether a method is defined on this receiver.
    fn responds_to(&self, _method: &str) -> bool {
        true
    }

    /// Invoke a method with already-substituted arguments.
    fn call(&self, method: &str, args: &[Value]) -> Result<Value, DispatchError>;
}

/// A shared handle to a host object.
///
/// Cloning the handle shares the receiver; equality is pointer identity.
#[derive(Clone)]
pub struct ObjectHandle(Rc<dyn Receiver>);

impl ObjectHandle {
    pub fn new(receiver: impl Receiver + 'static) -> Self {
        Self(Rc::new(receiver))
    }

    pub fn label(&self) -> &str {
        self.0.label()
    }

    pub fn responds_to(&self, method: &str) -> bool {
        self.0.responds_to(method)
    }

    /// Dispatch a method call, rejecting methods the receiver does not
    /// declare.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value, DispatchError> {
        if !self.0.responds_to(method) {
            return Err(DispatchError::UnknownMethod {
                target: self.label().to_string(),
                method: method.to_string(),
            });
        }
        self.0.call(method, args)
    }

    /// Whether two handles point at the same receiver.
    pub fn ptr_eq(&self, other: &ObjectHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ObjectHandle").field(&self.label()).finish()
    }
}
