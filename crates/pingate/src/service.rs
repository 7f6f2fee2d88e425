//! `GateService`: the facade the host game server talks to.
//!
//! This ties the layers together: the in-memory [`AuthGate`] behind an
//! async mutex, the [`GateStore`] flushed synchronously after every
//! mutating operation, and the deferred-deadline timers. The host calls
//! one method per intercepted event and enforces whatever comes back.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use pingate_gate::{AuthGate, GateConfig};
use pingate_protocol::{Identity, JoinDecision, LoginAnchor, LoginOutcome};
use pingate_store::GateStore;
use tokio::sync::Mutex;

use crate::expiry::ExpiryTasks;
use crate::{policy, Enforcer, PingateError};

/// Current wall-clock time in unix seconds.
///
/// A system clock before 1970 isn't a supported configuration; we
/// degrade to 0 rather than panic, which makes every trust window look
/// expired — the safe direction.
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// The authentication gate, wired for a running server.
///
/// One instance per server process, constructed at startup (which is
/// when persisted state is loaded) and shared with every event handler.
/// All state lives behind one async mutex, so operations are fully
/// serialized — in particular, two operations on the same identity can
/// never interleave, which is what keeps the attempt counter honest.
///
/// Methods take `&self`; wrap the service in an `Arc` to share it.
pub struct GateService<E: Enforcer> {
    gate: Arc<Mutex<AuthGate>>,
    store: GateStore,
    enforcer: Arc<E>,
    expiry: Arc<ExpiryTasks>,
    auth_deadline: Duration,
}

impl<E: Enforcer> GateService<E> {
    /// Loads persisted state from `store` and builds the service.
    ///
    /// Called once at startup. A fresh data directory is fine (empty
    /// table, no anchor).
    ///
    /// # Errors
    /// [`PingateError::Store`] if a persisted file exists but can't be
    /// read or parsed — better to refuse to start than to run with
    /// players silently unregistered.
    pub fn new(
        store: GateStore,
        config: GateConfig,
        enforcer: E,
    ) -> Result<Self, PingateError> {
        let credentials = store.load_credentials()?;
        let anchor = store.load_anchor()?;
        let gate = AuthGate::with_state(config, credentials, anchor);

        Ok(Self {
            gate: Arc::new(Mutex::new(gate)),
            store,
            enforcer: Arc::new(enforcer),
            expiry: Arc::new(ExpiryTasks::default()),
            auth_deadline: policy::AUTH_TIMEOUT,
        })
    }

    /// Overrides the authentication deadline (default:
    /// [`policy::AUTH_TIMEOUT`], 60 seconds).
    pub fn with_auth_deadline(mut self, deadline: Duration) -> Self {
        self.auth_deadline = deadline;
        self
    }

    // -----------------------------------------------------------------
    // Lifecycle events
    // -----------------------------------------------------------------

    /// Handles a player-joined event.
    ///
    /// Returns the gate's decision for the host to enforce. When the
    /// decision is [`JoinDecision::MustAuthenticate`], the deadline
    /// timer is armed here — the host only needs to relocate the player
    /// to the returned anchor (if any) and relay the prompt.
    pub async fn player_joined(
        &self,
        identity: &Identity,
        source_ip: IpAddr,
    ) -> JoinDecision {
        let mut gate = self.gate.lock().await;
        let decision = gate.on_join(identity, source_ip, unix_now());

        if let JoinDecision::MustAuthenticate { .. } = decision {
            // `on_join` created the session just above, so the lookup
            // can't miss; the destructuring keeps that assumption local.
            if let Some(session) = gate.session(identity) {
                self.expiry.arm(
                    Arc::clone(&self.gate),
                    Arc::clone(&self.enforcer) as Arc<dyn Enforcer>,
                    identity.clone(),
                    session.epoch,
                    self.auth_deadline,
                );
            }
        }

        decision
    }

    /// Handles a player-quit event: discards the session and disarms
    /// any pending deadline.
    pub async fn player_quit(&self, identity: &Identity) {
        {
            let mut gate = self.gate.lock().await;
            gate.on_quit(identity);
        }
        self.expiry.cancel(identity);
    }

    // -----------------------------------------------------------------
    // Interception pre-checks
    // -----------------------------------------------------------------

    /// Whether the player is currently blocked from world interaction.
    ///
    /// The host calls this from its movement, chat, and inventory
    /// hooks and cancels the event when it returns `true`.
    pub async fn is_gate_blocking(&self, identity: &Identity) -> bool {
        self.gate.lock().await.is_gate_blocking(identity)
    }

    /// Whether the player is blocked from running `command`.
    ///
    /// Frozen players may still run the exempt commands
    /// ([`policy::EXEMPT_COMMANDS`]); everything else is blocked.
    pub async fn command_blocked(
        &self,
        identity: &Identity,
        command: &str,
    ) -> bool {
        if policy::is_exempt_command(command) {
            return false;
        }
        self.is_gate_blocking(identity).await
    }

    /// Whether the player has authenticated this session.
    pub async fn is_authenticated(&self, identity: &Identity) -> bool {
        self.gate.lock().await.is_authenticated(identity)
    }

    // -----------------------------------------------------------------
    // Command surface
    // -----------------------------------------------------------------

    /// The `setpin` command: registers (or replaces) the sender's PIN.
    ///
    /// # Errors
    /// - [`GateError::InvalidLength`](pingate_gate::GateError::InvalidLength)
    ///   — relay to the player; nothing changed.
    /// - [`PingateError::Store`] — the PIN *was* set but couldn't be
    ///   flushed; logged, state kept.
    pub async fn set_pin(
        &self,
        identity: &Identity,
        raw_pin: &str,
    ) -> Result<(), PingateError> {
        let mut gate = self.gate.lock().await;
        gate.register_pin(identity, raw_pin)?;
        self.flush_credentials(&gate)
    }

    /// The `login` command: evaluates a PIN attempt.
    ///
    /// On [`LoginOutcome::RateLimited`] the host must force-disconnect
    /// the sender, using
    /// [`DisconnectReason::TooManyAttempts`](pingate_protocol::DisconnectReason::TooManyAttempts)
    /// as the message. On success the deadline timer is disarmed and
    /// the refreshed trusted-IP record is flushed.
    ///
    /// # Errors
    /// [`PingateError::Store`] — the login *succeeded* but the trust
    /// refresh couldn't be flushed; logged, state kept.
    pub async fn login(
        &self,
        identity: &Identity,
        raw_pin: &str,
    ) -> Result<LoginOutcome, PingateError> {
        let flushed = {
            let mut gate = self.gate.lock().await;
            let outcome = gate.attempt_login(identity, raw_pin, unix_now())?;
            match outcome {
                LoginOutcome::Success => {
                    self.flush_credentials(&gate).map(|()| outcome)
                }
                _ => Ok(outcome),
            }
        };

        if matches!(flushed, Ok(LoginOutcome::Success)) {
            self.expiry.cancel(identity);
        }
        flushed
    }

    /// The admin `resetpin` command: deletes the target's credential
    /// and trusted-IP records.
    ///
    /// The host must verify the admin capability *before* calling this
    /// — the gate performs no permission logic — and must forcibly
    /// disconnect the target afterwards
    /// ([`DisconnectReason::PinReset`](pingate_protocol::DisconnectReason::PinReset)):
    /// a PIN reset invalidates any in-progress session.
    ///
    /// # Errors
    /// - [`GateError::NotFound`](pingate_gate::GateError::NotFound) —
    ///   the target never registered; nothing changed.
    /// - [`PingateError::Store`] — removed in memory, flush failed.
    pub async fn reset_pin(
        &self,
        target: &Identity,
    ) -> Result<(), PingateError> {
        let mut gate = self.gate.lock().await;
        gate.reset_pin(target)?;
        self.flush_credentials(&gate)
    }

    /// The admin `setjoinloc` command: places the login anchor at the
    /// admin's position. Host verifies the capability first.
    ///
    /// # Errors
    /// [`PingateError::Store`] — anchor set in memory, flush failed.
    pub async fn set_login_anchor(
        &self,
        anchor: LoginAnchor,
    ) -> Result<(), PingateError> {
        let mut gate = self.gate.lock().await;
        gate.set_anchor(anchor.clone());
        if let Err(e) = self.store.save_anchor(&anchor) {
            tracing::warn!(error = %e, "login anchor not flushed");
            return Err(e.into());
        }
        Ok(())
    }

    /// Applies a new PIN-length policy (the `reload-config`
    /// operation). Takes effect for future registrations; existing
    /// credentials and sessions are untouched.
    pub async fn reload_config(&self, config: GateConfig) {
        self.gate.lock().await.set_config(config);
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    /// Flushes the credential table. On failure the in-memory state is
    /// kept — the next successful flush rewrites the whole table.
    fn flush_credentials(&self, gate: &AuthGate) -> Result<(), PingateError> {
        if let Err(e) = self.store.save_credentials(gate.credentials()) {
            tracing::warn!(error = %e, "credential table not flushed");
            return Err(e.into());
        }
        Ok(())
    }
}
