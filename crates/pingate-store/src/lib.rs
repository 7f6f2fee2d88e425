//! Durable storage for Pingate.
//!
//! Two records land on disk, each independently loadable and saveable:
//!
//! - `players.json` — the credential table (identity → PIN hash +
//!   optional trusted IP)
//! - `loginloc.json` — the optional login anchor
//!
//! The facade loads both once at startup and flushes synchronously
//! after every mutating operation. Writes are atomic (temp file, then
//! rename) so a crash mid-write leaves the previous file intact, and
//! both files are pretty-printed JSON so operators can inspect and
//! repair them by hand.
//!
//! A write failure is reported, not retried here — the in-memory
//! mutation already happened and the next flush rewrites the whole
//! table anyway.

mod error;
mod store;

pub use error::StoreError;
pub use store::{GateStore, ANCHOR_FILE, PLAYERS_FILE};
