//! Error types for substitution and behaviour dispatch.

use thiserror::Error;

/// An error raised while substituting placeholders.
#[derive(Debug, Error)]
pub enum SubstituteError {
    /// The description graph expanded past the depth cap. A description
    /// whose expansion re-introduces its own placeholder never reaches a
    /// fixed point; the cap turns that into a fast failure instead of a
    /// stack overflow.
    #[error("substitution exceeded the maximum depth of {limit}")]
    TooDeep { limit: usize },
}

/// An error raised while dispatching a behaviour.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Substituting the behaviour name, target, or arguments failed.
    #[error(transparent)]
    Substitute(#[from] SubstituteError),

    /// The resolved target is neither a callable nor an instantiable
    /// class. Surfaced immediately, never retried.
    #[error("behaviour '{name}' is not invokable")]
    NotInvokable { name: String },

    /// A function behaviour resolved to a name with no registered
    /// function behind it.
    #[error("no function registered under '{name}'")]
    UnknownFunction { name: String },

    /// A class behaviour resolved to a name with no registered
    /// constructor behind it.
    #[error("no class registered under '{name}'")]
    UnknownClass { name: String },

    /// A method behaviour named a method its receiver does not declare.
    #[error("no method '{method}' on '{target}'")]
    UnknownMethod { target: String, method: String },

    /// An application callable failed.
    #[error("behaviour failed: {message}")]
    Invocation { message: String },
}
