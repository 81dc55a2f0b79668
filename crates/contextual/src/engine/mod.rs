//! Context state, behaviour dispatch, and the substitution engine.
//!
//! The engine resolves `{name}` placeholders against a lookup source;
//! [`Context`] layers property accessors and behaviour dispatch on top,
//! routing every returned value through substitution with itself as the
//! source.

mod behaviours;
mod context;
mod error;
mod registry;
mod substitute;

pub use behaviours::Behaviour;
pub use context::{Context, DEFAULT_MOMENT};
pub use error::{DispatchError, SubstituteError};
pub use registry::{Callable, CallableRegistry};
pub use substitute::{DEFAULT_MAX_DEPTH, Lookup, Substituter};
