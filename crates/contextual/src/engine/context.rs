//! Context state and property accessors.

use std::collections::BTreeMap;

use bon::Builder;

use crate::engine::{Behaviour, CallableRegistry, Lookup, SubstituteError, Substituter};
use crate::types::{ContextId, Value};

/// The moment a context occurs at when none was given.
pub const DEFAULT_MOMENT: Value = Value::Number(10);

/// One unit of contextual state.
///
/// A minimal context is set by a subject and an environment; optionally a
/// moment, named descriptions, and named behaviours. Descriptions drive
/// placeholder replacement in every other property: each accessor routes
/// its value through the substitution engine with the context itself as
/// the lookup source. Template syntax is plain `{name}`, with literal
/// braces written `\{` and `\}`.
///
/// # Example
///
/// ```
/// use contextual::Context;
///
/// let mut context = Context::new("{Subject}", "a test");
/// context
///     .describe("Subject", "the {kind} subject")
///     .describe("kind", "described");
///
/// assert_eq!(context.what().unwrap().to_string(), "the described subject");
/// ```
#[derive(Debug, Builder)]
pub struct Context {
    /// The "what" of the context. Opaque to the engine.
    #[builder(into)]
    subject: Value,

    /// The "where".
    #[builder(into)]
    environment: Value,

    /// The "when". Defaults to [`DEFAULT_MOMENT`].
    #[builder(into, default = DEFAULT_MOMENT)]
    moment: Value,

    /// Named properties available for placeholder resolution.
    #[builder(default)]
    descriptions: BTreeMap<String, Value>,

    /// Named aliases to invokable targets.
    #[builder(default)]
    pub(crate) behaviours: BTreeMap<String, Behaviour>,

    /// Functions and constructors the host application exposed. Ambient
    /// to the context, deliberately outside the identity hash.
    #[builder(default)]
    pub(crate) callables: CallableRegistry,
}

impl Context {
    /// Create a context from a subject and an environment, with the
    /// default moment and nothing described.
    pub fn new(subject: impl Into<Value>, environment: impl Into<Value>) -> Self {
        Context::builder()
            .subject(subject)
            .environment(environment)
            .build()
    }

    /// Set the subject.
    pub fn with(&mut self, subject: impl Into<Value>) -> &mut Self {
        self.subject = subject.into();
        self
    }

    /// Set the environment.
    pub fn within(&mut self, environment: impl Into<Value>) -> &mut Self {
        self.environment = environment.into();
        self
    }

    /// Set the moment.
    pub fn during(&mut self, moment: impl Into<Value>) -> &mut Self {
        self.moment = moment.into();
        self
    }

    /// The subject, substituted within the context.
    pub fn what(&self) -> Result<Value, SubstituteError> {
        self.normalize(&self.subject)
    }

    /// The environment, substituted within the context.
    pub fn whereabouts(&self) -> Result<Value, SubstituteError> {
        self.normalize(&self.environment)
    }

    /// The moment, substituted within the context.
    pub fn when(&self) -> Result<Value, SubstituteError> {
        self.normalize(&self.moment)
    }

    /// Upsert a named description.
    pub fn describe(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.descriptions.insert(name.into(), value.into());
        self
    }

    /// Remove a description. Later `about` calls for the name fall back
    /// to the caller-supplied default.
    pub fn pop_out(&mut self, name: &str) -> &mut Self {
        self.descriptions.remove(name);
        self
    }

    /// The raw stored description, unsubstituted.
    pub fn description(&self, name: &str) -> Option<&Value> {
        self.descriptions.get(name)
    }

    /// A description substituted within the context, or `""` when the
    /// name is undescribed.
    pub fn about(&self, name: &str) -> Result<Value, SubstituteError> {
        self.about_or(name, "")
    }

    /// A description substituted within the context, or the substituted
    /// default when the name is undescribed.
    pub fn about_or(
        &self,
        name: &str,
        default: impl Into<Value>,
    ) -> Result<Value, SubstituteError> {
        let raw = match self.descriptions.get(name) {
            Some(value) => value.clone(),
            None => default.into(),
        };
        self.normalize(&raw)
    }

    /// Substitute a value using this context's descriptions.
    pub fn normalize(&self, value: &Value) -> Result<Value, SubstituteError> {
        Substituter::new(self).apply(value)
    }

    /// A content hash identifying the current state.
    ///
    /// Derived from the serialized subject, environment, moment,
    /// behaviours, and descriptions; recomputed on demand so it always
    /// reflects current state.
    pub fn identify(&self) -> ContextId {
        let state = (
            &self.subject,
            &self.environment,
            &self.moment,
            &self.behaviours,
            &self.descriptions,
        );
        let serialized =
            serde_json::to_string(&state).expect("context state always serializes");
        ContextId::from_serialized(&serialized)
    }

    pub(crate) fn description_value(&self, name: &str) -> Option<Value> {
        self.descriptions.get(name).cloned()
    }

    pub(crate) fn remember(&mut self, name: String, value: Value) {
        self.descriptions.insert(name, value);
    }

    pub(crate) fn has_description(&self, name: &str) -> bool {
        self.descriptions.contains_key(name)
    }
}

impl Lookup for Context {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.description_value(name)
    }
}
