//! Session types: the data structures that represent a connected player.
//!
//! A "session" is the gate's record of one live connection. It tracks:
//! - WHO the player is (`Identity`)
//! - WHAT they may do (`SessionStatus`)
//! - HOW many login attempts they've burned (`failed_attempts`)
//! - WHERE they connected from (`source_ip`, used to refresh the
//!   trusted-IP record on a successful login)
//!
//! Sessions are ephemeral: created on join, destroyed on quit. Nothing
//! in here is ever persisted.

use std::net::IpAddr;

use pingate_protocol::Identity;

// ---------------------------------------------------------------------------
// GateConfig
// ---------------------------------------------------------------------------

/// Configuration for the gate's PIN policy.
///
/// These are the only tunable knobs — the trust window, the attempt
/// limit, and the exempt-command list are policy constants, not
/// configuration. The caller is responsible for `min ≤ max`.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Minimum accepted PIN length, in bytes. Default: 4.
    pub min_pin_len: usize,

    /// Maximum accepted PIN length, in bytes. Default: 16.
    pub max_pin_len: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_pin_len: 4,
            max_pin_len: 16,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// What a connected player is currently allowed to do.
///
/// This is a state machine with three states:
///
/// ```text
///               (no credential)
///   join ──────────────────────→ Unregistered ──(set PIN)──→ stays put
///     │
///     │ (credential, trusted IP fresh)
///     ├──────────────────────→ Authenticated
///     │
///     │ (credential, PIN required)
///     └──────────────────────→ Frozen ──(correct PIN)──→ Authenticated
/// ```
///
/// - **Unregistered**: No credential on file. The player may act freely
///   but is prompted to register. Never frozen, never authenticated.
/// - **Frozen**: A credential exists and the player hasn't proven it.
///   Movement, chat, inventory, and non-exempt commands are blocked.
/// - **Authenticated**: PIN verified (or trusted IP matched). Full
///   access.
///
/// Representing the status as one enum makes "authenticated and frozen
/// are mutually exclusive" true by construction — there is no pair of
/// booleans to drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No credential on file; free to act, prompted to register.
    Unregistered,

    /// Awaiting PIN entry; world interaction is blocked.
    Frozen,

    /// PIN proven (or trust window matched); full access.
    Authenticated,
}

impl SessionStatus {
    /// Returns `true` if this status blocks world interaction.
    pub fn is_frozen(&self) -> bool {
        matches!(self, Self::Frozen)
    }

    /// Returns `true` if the player has proven their identity.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One connected player's ephemeral state.
///
/// Created by `on_join`, destroyed by `on_quit`. The attempt counter and
/// status live here — not in the credential record — which is why a
/// disconnect always resets them.
#[derive(Debug, Clone)]
pub struct Session {
    /// Which player this session belongs to.
    pub identity: Identity,

    /// What the player may currently do.
    pub status: SessionStatus,

    /// Wrong PINs entered this session. Reset on success, on
    /// disconnect, and on PIN reset.
    pub failed_attempts: u8,

    /// The address the player connected from. A successful login
    /// records this as the trusted IP.
    pub source_ip: IpAddr,

    /// Join generation: a counter that increases with every join the
    /// gate sees. A deferred expiry check captures the epoch at join
    /// time and is a no-op if the session it finds has a different one
    /// — that session belongs to a *later* connection, not the one the
    /// timer was armed for.
    pub epoch: u64,
}
