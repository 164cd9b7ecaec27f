use std::fmt;

use uuid::Uuid;

/// Opaque session identifier echoed back to callers.
///
/// No state is stored against a session and the pipeline never consults
/// one; it exists purely for the caller's own bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a fresh random session identifier.
    pub fn new() -> Self {
        SessionId(Uuid::new_v4().to_string())
    }

    /// Wrap a caller-supplied identifier without interpreting it.
    pub fn from_string(raw: String) -> Self {
        SessionId(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        SessionId::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
