use const_fnv1a_hash::fnv1a_hash_str_64;
use serde::Serialize;

/// A content-derived identity fingerprint for a context.
///
/// `ContextId` wraps a 64-bit FNV-1a hash of the serialized context state.
/// Two contexts with identical subject, environment, moment, behaviours,
/// and descriptions produce the same id, independent of object identity.
///
/// # Example
///
/// ```
/// use contextual::Context;
///
/// let a = Context::new("{Subject}", "{Environment}");
/// let b = Context::new("{Subject}", "{Environment}");
/// assert_eq!(a.identify(), b.identify());
/// ```
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize)]
pub struct ContextId(u64);

impl ContextId {
    /// Hash a serialized state string.
    pub const fn from_serialized(state: &str) -> Self {
        Self(fnv1a_hash_str_64(state))
    }

    /// Get the raw hash value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContextId({:016x})", self.0)
    }
}
