//! Enforcement hook for the host game server.
//!
//! Pingate never kicks anyone itself — it has no connection handles,
//! no packets, no player objects. When the gate needs a player gone
//! (the deferred authentication deadline passed), it calls the
//! [`Enforcer`] the host supplied at construction.
//!
//! # Why a trait?
//!
//! The same reason the rest of the gate is host-agnostic: the trait
//! defines WHAT must happen ("disconnect this player, tell them why")
//! without binding to any engine's API. Production implements it with
//! the real kick call; tests implement it with a recording stub.

use pingate_protocol::{DisconnectReason, Identity};

/// Carries out disconnects on behalf of the gate.
///
/// # Trait bounds
///
/// - `Send + Sync` → the enforcer is called from spawned timer tasks,
///   which Tokio may run on any thread.
/// - `'static` → it doesn't borrow temporary data; it lives as long as
///   the service.
///
/// The method is synchronous and must not block: it should hand the
/// kick to the game engine's own scheduling (most engines require
/// player manipulation on their main thread anyway).
pub trait Enforcer: Send + Sync + 'static {
    /// Forcibly disconnects the player, showing them
    /// `reason.to_string()` as the kick message.
    ///
    /// May be called for a player who is already gone; implementations
    /// should treat that as a no-op.
    fn disconnect(&self, identity: &Identity, reason: DisconnectReason);
}
