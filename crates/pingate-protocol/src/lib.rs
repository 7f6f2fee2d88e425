//! Contract types for Pingate.
//!
//! This crate defines the "language" that the gate and its host game
//! server speak:
//!
//! - **Types** ([`Identity`], [`JoinDecision`], [`LoginOutcome`],
//!   [`CredentialRecord`], [`LoginAnchor`], etc.) — the values that cross
//!   the boundary between the gate and the host, plus the record shapes
//!   that land on disk.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how persisted records
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits below everything else. It doesn't know about
//! sessions, hashing, or files — it only defines shapes and how to
//! serialize them.
//!
//! ```text
//! Store (files) → Protocol (records) → Gate (decisions)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod error;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

// `pub use` makes items from submodules available at the crate root.
// Users can write `use pingate_protocol::Identity` instead of
// `use pingate_protocol::types::Identity`. This is a cleaner public API.

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    CredentialRecord, CredentialTable, DisconnectReason, Identity,
    JoinDecision, LoginAnchor, LoginOutcome, TrustedIp,
};
