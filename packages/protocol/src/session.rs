//! Session identifiers and the clock that issues them.

use serde::{Deserialize, Serialize};

/// Identifier of one dispatched formatting request.
///
/// Ids only ever grow. They are compared for equality to decide whether a
/// result is stale, never used to order results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    /// Create a SessionId from a raw integer.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw integer.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Proof that a request was dispatched under a particular session.
///
/// A token is handed out by [`SessionClock::issue`] and follows the request
/// through its whole lifecycle. Whoever holds the latest token decides which
/// result is current by comparing ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken {
    id: SessionId,
}

impl SessionToken {
    /// The id this token was issued for.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// True when `id` belongs to the session this token represents.
    pub fn owns(&self, id: SessionId) -> bool {
        self.id == id
    }
}

/// Monotonic source of session tokens.
///
/// The first token carries id 1. Every call to [`issue`](Self::issue)
/// advances the clock by exactly one, so no id is ever handed out twice.
#[derive(Debug, Default)]
pub struct SessionClock {
    last: u64,
}

impl SessionClock {
    /// Create a clock that has not issued anything yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next token.
    pub fn issue(&mut self) -> SessionToken {
        self.last += 1;
        SessionToken {
            id: SessionId(self.last),
        }
    }
}
