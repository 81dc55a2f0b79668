pub mod engine;
pub mod parser;
pub mod types;

pub use engine::{
    Behaviour, Callable, CallableRegistry, Context, DEFAULT_MAX_DEPTH, DEFAULT_MOMENT,
    DispatchError, Lookup, SubstituteError, Substituter,
};
pub use types::{ContextId, ObjectHandle, Receiver, Shared, Value};

/// Creates a `Value::Record` from key-value pairs.
///
/// Values are automatically converted via `Into<Value>`, so you can pass
/// integers, floats, booleans, or strings directly.
///
/// # Example
///
/// ```
/// use contextual::record;
///
/// let fixture = record! {
///     "aliasIs" => "alias is '{alias}'",
///     "weAreIn" => "we are in {alias}",
/// };
/// assert!(fixture.as_record().is_some());
/// ```
#[macro_export]
macro_rules! record {
    {} => {
        $crate::Value::Record(::std::collections::BTreeMap::<String, $crate::Value>::new())
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut fields = ::std::collections::BTreeMap::<String, $crate::Value>::new();
            $(
                fields.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            $crate::Value::Record(fields)
        }
    };
}
