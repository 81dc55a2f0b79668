mod context_id;
mod object;
mod shared;
mod value;

pub use context_id::ContextId;
pub use object::{ObjectHandle, Receiver};
pub use shared::Shared;
pub use value::Value;
