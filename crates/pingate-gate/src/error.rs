//! Error types for the gate layer.

use pingate_protocol::Identity;

/// Errors that can occur during gate operations.
///
/// Note that most login "failures" are *not* errors: a wrong PIN or a
/// rate-limited session is an ordinary
/// [`LoginOutcome`](pingate_protocol::LoginOutcome) the host relays to
/// the player. These variants cover caller mistakes and genuinely broken
/// state.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The PIN is outside the configured length bounds.
    /// User-correctable; no state was changed.
    #[error("PIN must be between {min} and {max} characters")]
    InvalidLength {
        /// Configured minimum PIN length.
        min: usize,
        /// Configured maximum PIN length.
        max: usize,
    },

    /// A PIN reset was requested for a player who never registered.
    /// No-op, reported so the admin sees it.
    #[error("no PIN is set for player {0}")]
    NotFound(Identity),

    /// A login attempt arrived for a player with no live session.
    /// This means the host called `attempt_login` outside a connection's
    /// join/quit window — a collaborator bug, not a player mistake.
    #[error("no session exists for player {0}")]
    NoSession(Identity),

    /// Hashing or hash parsing failed.
    /// On verify this means the *stored* hash is corrupt (e.g. a
    /// hand-edited credential file), since the raw PIN itself can't be
    /// malformed.
    #[error("PIN hash error: {0}")]
    Hash(String),
}
