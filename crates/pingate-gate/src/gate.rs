//! The authentication gate: all player auth state and the decisions
//! made over it.
//!
//! This is the central piece of the gate layer. It's responsible for:
//! - Registering PINs (salted hash, overwrite, trust invalidation)
//! - Deciding what happens on join (register prompt / auto-auth / freeze)
//! - Evaluating login attempts (verify, count failures, rate-limit)
//! - Answering "is this player blocked?" for every intercepted action
//! - Resetting credentials on admin request
//!
//! # Concurrency note
//!
//! `AuthGate` is NOT thread-safe by itself — it uses plain `HashMap`s,
//! not concurrent ones. This is intentional: the gate is owned by the
//! facade and accessed through a mutex at that level, which serializes
//! all operations (and in particular any two operations on the same
//! identity, so the attempt counter can never see a lost update).
//! Keeping it simple here avoids hidden locking overhead.
//!
//! # Time
//!
//! Every freshness decision takes `now` (unix seconds) as a parameter
//! instead of reading a clock. The caller owns time; tests pass whatever
//! instant they need.

use std::collections::HashMap;
use std::net::IpAddr;

use pingate_protocol::{
    CredentialRecord, CredentialTable, Identity, JoinDecision, LoginAnchor,
    LoginOutcome, TrustedIp,
};

use crate::{pin, GateConfig, GateError, Session, SessionStatus};

/// Failed attempts allowed per session before the gate rate-limits.
///
/// The boundary convention is check-then-increment: the third wrong PIN
/// is still reported as `Incorrect { remaining: 0 }`; the *fourth*
/// attempt is refused as `RateLimited`. Reconnecting resets the counter.
pub const MAX_LOGIN_ATTEMPTS: u8 = 3;

/// How long a trusted-IP record stays fresh, in seconds (24 hours).
///
/// A join from the recorded address strictly inside this window skips
/// PIN entry; at or past the boundary the player is frozen again.
pub const TRUST_WINDOW_SECS: u64 = 86_400;

/// Owns all authentication state and exposes the gate's operations.
///
/// Think of this as two registries and a policy: the persistent-ish
/// credential table (flushed to disk by the store after every mutation),
/// the ephemeral session table, and the optional login anchor.
///
/// ## Lifecycle
///
/// ```text
/// on_join() ──→ [Unregistered]  ── register_pin() ──→ credential stored
///          ──→ [Authenticated]  (trusted IP fresh)
///          ──→ [Frozen] ── attempt_login() ──→ [Authenticated]
///                      │                  └──→ [Frozen] (counted)
///                      └── deadline / rate limit ──→ host disconnects
/// on_quit() ──→ session discarded (credentials untouched)
/// ```
pub struct AuthGate {
    /// Persisted credentials, keyed by identity. Absence of a key means
    /// the player never registered.
    credentials: CredentialTable,

    /// Live sessions, keyed by identity. One per connected player.
    sessions: HashMap<Identity, Session>,

    /// The optional login anchor frozen players are relocated to.
    anchor: Option<LoginAnchor>,

    /// PIN length policy.
    config: GateConfig,

    /// Monotonic join counter; each new session gets the next value as
    /// its epoch. See [`Session::epoch`].
    next_epoch: u64,
}

impl AuthGate {
    /// Creates an empty gate with the given config.
    pub fn new(config: GateConfig) -> Self {
        Self::with_state(config, CredentialTable::new(), None)
    }

    /// Creates a gate from previously persisted state.
    ///
    /// The facade calls this once at startup with whatever the store
    /// loaded. Sessions always start empty — they are never persisted.
    pub fn with_state(
        config: GateConfig,
        credentials: CredentialTable,
        anchor: Option<LoginAnchor>,
    ) -> Self {
        Self {
            credentials,
            sessions: HashMap::new(),
            anchor,
            config,
            next_epoch: 0,
        }
    }

    // -----------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------

    /// Registers (or replaces) a player's PIN.
    ///
    /// Stores a freshly salted Argon2id hash, overwriting any prior
    /// credential, and clears any trusted-IP record for the identity —
    /// changing the PIN invalidates prior trust, so a stale address
    /// can't bypass the new credential.
    ///
    /// Deliberately has no effect on the session: a frozen player who
    /// re-registers stays frozen until they log in.
    ///
    /// # Errors
    /// - [`GateError::InvalidLength`] if the PIN is outside the
    ///   configured bounds (nothing is changed).
    /// - [`GateError::Hash`] if hashing fails.
    pub fn register_pin(
        &mut self,
        identity: &Identity,
        raw_pin: &str,
    ) -> Result<(), GateError> {
        let (min, max) = (self.config.min_pin_len, self.config.max_pin_len);
        if raw_pin.len() < min || raw_pin.len() > max {
            return Err(GateError::InvalidLength { min, max });
        }

        let pin_hash = pin::hash(raw_pin)?;
        self.credentials.insert(
            identity.clone(),
            CredentialRecord {
                pin_hash,
                trusted_ip: None,
            },
        );

        tracing::info!(%identity, "PIN registered");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Join / quit
    // -----------------------------------------------------------------

    /// Handles a player joining and returns the gate's decision.
    ///
    /// Always (re)creates the session — a join for an identity that
    /// already has one supersedes it, since the game server only ever
    /// has one live connection per player.
    ///
    /// Decision order:
    /// 1. No credential → [`JoinDecision::Unregistered`] (free to act,
    ///    prompted to register).
    /// 2. Trusted IP equals `source_ip` and `now − refreshed_at` is
    ///    strictly inside the 24-hour window → session authenticated,
    ///    [`JoinDecision::AutoAuthenticated`].
    /// 3. Otherwise → session frozen,
    ///    [`JoinDecision::MustAuthenticate`] carrying the login anchor
    ///    (if set) for the host to relocate the player to. The host is
    ///    expected to arm the deferred expiry check.
    pub fn on_join(
        &mut self,
        identity: &Identity,
        source_ip: IpAddr,
        now: u64,
    ) -> JoinDecision {
        self.next_epoch += 1;
        let epoch = self.next_epoch;

        let status = match self.credentials.get(identity) {
            None => SessionStatus::Unregistered,
            Some(record) => {
                if Self::trust_is_fresh(record, source_ip, now) {
                    SessionStatus::Authenticated
                } else {
                    SessionStatus::Frozen
                }
            }
        };

        self.sessions.insert(
            identity.clone(),
            Session {
                identity: identity.clone(),
                status,
                failed_attempts: 0,
                source_ip,
                epoch,
            },
        );

        match status {
            SessionStatus::Unregistered => {
                tracing::info!(%identity, "joined unregistered");
                JoinDecision::Unregistered
            }
            SessionStatus::Authenticated => {
                tracing::info!(%identity, %source_ip, "auto-authenticated via trusted IP");
                JoinDecision::AutoAuthenticated
            }
            SessionStatus::Frozen => {
                tracing::info!(%identity, "frozen pending PIN entry");
                JoinDecision::MustAuthenticate {
                    anchor: self.anchor.clone(),
                }
            }
        }
    }

    /// Whether `record`'s trusted IP matches `source_ip` and is still
    /// inside the trust window at `now`.
    fn trust_is_fresh(
        record: &CredentialRecord,
        source_ip: IpAddr,
        now: u64,
    ) -> bool {
        match record.trusted_ip {
            Some(TrustedIp { addr, refreshed_at }) => {
                addr == source_ip
                    && now.saturating_sub(refreshed_at) < TRUST_WINDOW_SECS
            }
            None => false,
        }
    }

    /// Discards a player's session. Failed attempts, frozen and
    /// authenticated flags all die with it; credential and trusted-IP
    /// records are untouched.
    ///
    /// Unknown identities are a no-op (the player may have been kicked
    /// before their session was created).
    pub fn on_quit(&mut self, identity: &Identity) {
        if self.sessions.remove(identity).is_some() {
            tracing::info!(%identity, "session discarded");
        }
    }

    // -----------------------------------------------------------------
    // Login
    // -----------------------------------------------------------------

    /// Evaluates a login attempt.
    ///
    /// Outcome order (check-then-increment, see
    /// [`MAX_LOGIN_ATTEMPTS`]):
    /// 1. No credential → [`LoginOutcome::NoCredential`].
    /// 2. Counter already at the limit → [`LoginOutcome::RateLimited`];
    ///    the host must force-disconnect. Terminal for the session.
    /// 3. Hash match → unfreeze, authenticate, reset the counter,
    ///    refresh the trusted-IP record to the session's source address
    ///    at `now`, return [`LoginOutcome::Success`].
    /// 4. Mismatch → count it and return [`LoginOutcome::Incorrect`]
    ///    with the remaining attempts; the session stays frozen.
    ///
    /// # Errors
    /// - [`GateError::NoSession`] if the player isn't connected (host
    ///   bug — logins only arrive from live connections).
    /// - [`GateError::Hash`] if the stored hash is corrupt.
    pub fn attempt_login(
        &mut self,
        identity: &Identity,
        raw_pin: &str,
        now: u64,
    ) -> Result<LoginOutcome, GateError> {
        let Some(record) = self.credentials.get_mut(identity) else {
            return Ok(LoginOutcome::NoCredential);
        };
        let Some(session) = self.sessions.get_mut(identity) else {
            return Err(GateError::NoSession(identity.clone()));
        };

        if session.failed_attempts >= MAX_LOGIN_ATTEMPTS {
            tracing::warn!(%identity, "login refused: rate limited");
            return Ok(LoginOutcome::RateLimited);
        }

        if pin::verify(raw_pin, &record.pin_hash)? {
            session.status = SessionStatus::Authenticated;
            session.failed_attempts = 0;
            record.trusted_ip = Some(TrustedIp {
                addr: session.source_ip,
                refreshed_at: now,
            });
            tracing::info!(%identity, "authenticated");
            Ok(LoginOutcome::Success)
        } else {
            session.failed_attempts += 1;
            let remaining = MAX_LOGIN_ATTEMPTS - session.failed_attempts;
            tracing::info!(%identity, remaining, "incorrect PIN");
            Ok(LoginOutcome::Incorrect { remaining })
        }
    }

    // -----------------------------------------------------------------
    // Reset
    // -----------------------------------------------------------------

    /// Deletes a player's credential and trusted-IP records.
    ///
    /// If the target has a live session it is returned to
    /// `Unregistered` with a zeroed attempt counter, so the "never
    /// frozen without a credential" invariant holds even before the
    /// host performs the mandated disconnect.
    ///
    /// # Errors
    /// [`GateError::NotFound`] if no credential existed (no-op).
    pub fn reset_pin(&mut self, identity: &Identity) -> Result<(), GateError> {
        if self.credentials.remove(identity).is_none() {
            return Err(GateError::NotFound(identity.clone()));
        }

        if let Some(session) = self.sessions.get_mut(identity) {
            session.status = SessionStatus::Unregistered;
            session.failed_attempts = 0;
        }

        tracing::info!(%identity, "PIN reset, credential removed");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Returns `true` iff the player's session is currently frozen.
    ///
    /// The host calls this before allowing movement, chat, inventory
    /// transactions, and non-exempt commands. Unknown identities are
    /// not blocked.
    pub fn is_gate_blocking(&self, identity: &Identity) -> bool {
        self.sessions
            .get(identity)
            .is_some_and(|s| s.status.is_frozen())
    }

    /// Returns `true` iff the player has a session and it is
    /// authenticated.
    pub fn is_authenticated(&self, identity: &Identity) -> bool {
        self.sessions
            .get(identity)
            .is_some_and(|s| s.status.is_authenticated())
    }

    /// Returns `true` iff a credential record exists for the identity.
    pub fn is_registered(&self, identity: &Identity) -> bool {
        self.credentials.contains_key(identity)
    }

    /// The deferred-deadline check: `true` iff the session armed at
    /// `epoch` still exists unauthenticated.
    ///
    /// Three no-op cases, all deliberate:
    /// - no session (the player already disconnected),
    /// - epoch mismatch (the session belongs to a later connection),
    /// - authenticated in the meantime.
    pub fn expire_if_unauthenticated(
        &self,
        identity: &Identity,
        epoch: u64,
    ) -> bool {
        self.sessions
            .get(identity)
            .is_some_and(|s| s.epoch == epoch && !s.status.is_authenticated())
    }

    /// Looks up a session by identity.
    pub fn session(&self, identity: &Identity) -> Option<&Session> {
        self.sessions.get(identity)
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    // -----------------------------------------------------------------
    // Anchor & config
    // -----------------------------------------------------------------

    /// The current login anchor, if one is set.
    pub fn anchor(&self) -> Option<&LoginAnchor> {
        self.anchor.as_ref()
    }

    /// Sets (or replaces) the login anchor.
    pub fn set_anchor(&mut self, anchor: LoginAnchor) {
        tracing::info!(world = %anchor.world, "login anchor updated");
        self.anchor = Some(anchor);
    }

    /// The current PIN policy.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Replaces the PIN policy (the `reload-config` admin operation).
    /// Existing credentials are untouched — bounds apply to future
    /// registrations only.
    pub fn set_config(&mut self, config: GateConfig) {
        self.config = config;
    }

    /// Read access to the credential table, for the store to flush.
    pub fn credentials(&self) -> &CredentialTable {
        &self.credentials
    }
}

// =========================================================================
// Tests
// =========================================================================
