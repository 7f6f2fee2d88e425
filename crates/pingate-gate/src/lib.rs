//! Player authentication state for Pingate.
//!
//! This crate owns everything the gate knows about players:
//!
//! 1. **Credentials** — salted PIN hashes and trusted-IP records,
//!    keyed by identity ([`AuthGate`])
//! 2. **Sessions** — who is connected and whether they may act
//!    ([`Session`], [`SessionStatus`])
//! 3. **PIN hashing** — Argon2id hash and constant-time verification
//!    (the [`pin`] module)
//!
//! # How it fits in the stack
//!
//! ```text
//! Facade (above)  ← adds persistence, timers, and the host-server seam
//!     ↕
//! Gate Layer (this crate)  ← decides allow / deny / freeze
//!     ↕
//! Protocol Layer (below)  ← provides Identity, decision/outcome types
//! ```
//!
//! Everything here is pure in-memory state — no files, no clocks, no
//! tasks. Callers pass `now` in explicitly, which is what makes the
//! 24-hour trust window testable without sleeping.

mod error;
mod gate;
mod session;

pub mod pin;

pub use error::GateError;
pub use gate::{AuthGate, MAX_LOGIN_ATTEMPTS, TRUST_WINDOW_SECS};
pub use session::{GateConfig, Session, SessionStatus};
