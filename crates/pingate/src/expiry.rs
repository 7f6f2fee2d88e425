//! Deferred authentication deadlines: one-shot, cancellable, stale-safe.
//!
//! When a join leaves a player frozen, the service arms a timer. If the
//! player is still unauthenticated when it fires, the enforcer is asked
//! to disconnect them. The timer:
//!
//! - sleeps *without* holding the gate lock,
//! - re-checks the session (existence, epoch, authentication) under the
//!   lock before doing anything — a timer armed for a connection that
//!   has since ended must be a no-op,
//! - is aborted outright on quit and on successful login, so the common
//!   case never even wakes up.
//!
//! The epoch check is the real safety net: even if an abort races a
//! rejoin, a stale timer sees a session with a different epoch and
//! stands down.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use pingate_gate::AuthGate;
use pingate_protocol::{DisconnectReason, Identity};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::Enforcer;

/// The registry of armed deadlines, keyed by identity.
///
/// The handle map uses a `std` mutex (never held across an `await`);
/// the gate itself stays behind the service's async mutex.
#[derive(Default)]
pub(crate) struct ExpiryTasks {
    handles: StdMutex<HashMap<Identity, JoinHandle<()>>>,
}

impl ExpiryTasks {
    /// Arms the deadline for `identity`'s current connection,
    /// replacing (and aborting) any timer from a previous one.
    pub(crate) fn arm(
        self: &Arc<Self>,
        gate: Arc<Mutex<AuthGate>>,
        enforcer: Arc<dyn Enforcer>,
        identity: Identity,
        epoch: u64,
        deadline: Duration,
    ) {
        let tasks = Arc::clone(self);
        let key = identity.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(deadline).await;

            // Take the lock only for the check itself.
            let fire = {
                let gate = gate.lock().await;
                gate.expire_if_unauthenticated(&identity, epoch)
            };

            if fire {
                tracing::info!(%identity, "authentication deadline passed");
                enforcer.disconnect(&identity, DisconnectReason::AuthTimeout);
            } else {
                tracing::trace!(%identity, "deadline check: nothing to do");
            }

            // Drop our own registry entry. If a rejoin replaced it
            // already, this removes the newer handle's cancel path —
            // harmless, since that timer's epoch check still protects
            // the newer connection.
            tasks.handles.lock().unwrap().remove(&identity);
        });

        if let Some(old) = self.handles.lock().unwrap().insert(key, handle) {
            old.abort();
        }
    }

    /// Cancels the armed deadline for `identity`, if any. Called on
    /// quit and on successful login.
    pub(crate) fn cancel(&self, identity: &Identity) {
        if let Some(handle) = self.handles.lock().unwrap().remove(identity) {
            handle.abort();
        }
    }
}
