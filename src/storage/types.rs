use serde::{Deserialize, Serialize};

/// Current layout version written into every persisted record.
pub const PERSIST_VERSION: u32 = 0;

/// On-disk envelope around a persisted state record
///
/// Serializes as `{"state": <T>, "version": 0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persisted<T> {
    /// The wrapped state
    pub state: T,
    /// Layout version of `state`
    #[serde(default)]
    pub version: u32,
}

impl<T> Persisted<T> {
    /// Wrap `state` with the current layout version.
    pub fn new(state: T) -> Self {
        Self {
            state,
            version: PERSIST_VERSION,
        }
    }
}
