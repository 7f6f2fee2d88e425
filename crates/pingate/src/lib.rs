//! # Pingate
//!
//! PIN authentication gate for multiplayer game servers.
//!
//! Pingate owns the *decision*: whether a connecting player must prove a
//! PIN before interacting with the world. The host game server owns the
//! *enforcement*: cancelling movement, blocking chat, teleporting to the
//! login anchor, kicking. The host reports lifecycle events (join, quit,
//! command, movement, chat, inventory) and relays the gate's answers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pingate::{
//!     DisconnectReason, Enforcer, GateConfig, GateService, GateStore,
//!     Identity,
//! };
//!
//! struct Kicker; // your game-server integration
//!
//! impl Enforcer for Kicker {
//!     fn disconnect(&self, identity: &Identity, reason: DisconnectReason) {
//!         // server.kick(identity, reason.to_string())
//!     }
//! }
//!
//! # async fn run() -> Result<(), pingate::PingateError> {
//! let store = GateStore::new("plugin_data/pingate");
//! let service = GateService::new(store, GateConfig::default(), Kicker)?;
//!
//! // On a player-joined event:
//! let decision = service
//!     .player_joined(&Identity::new("steve"), "203.0.113.7".parse().unwrap())
//!     .await;
//! # Ok(())
//! # }
//! ```

mod enforcer;
mod error;
mod expiry;
mod service;

pub mod policy;

pub use enforcer::Enforcer;
pub use error::PingateError;
pub use service::GateService;

// Re-export the sub-crate surface so hosts depend on one crate.
pub use pingate_gate::{
    AuthGate, GateConfig, GateError, Session, SessionStatus,
    MAX_LOGIN_ATTEMPTS, TRUST_WINDOW_SECS,
};
pub use pingate_protocol::{
    CredentialRecord, CredentialTable, DisconnectReason, Identity,
    JoinDecision, LoginAnchor, LoginOutcome, TrustedIp,
};
pub use pingate_store::{GateStore, StoreError};
