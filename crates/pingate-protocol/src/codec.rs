//! Codec trait and implementations for serializing persisted records.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The store layer doesn't care HOW records are serialized — it just
//! needs something that implements the [`Codec`] trait. This is the
//! "strategy pattern": we define an interface, and swap implementations.
//!
//! Currently we provide [`JsonCodec`] (human-readable, hand-editable by
//! server operators). A binary codec could be added later without
//! changing the store.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// ## Trait bounds explained
///
/// - `Send + Sync` → safe to share between threads (Tokio may run the
///   store's callers on any thread in its pool).
/// - `'static` → the codec doesn't borrow temporary data; it owns
///   everything it needs. Required for types stored in long-lived
///   structures.
///
/// The `encode` and `decode` methods are *generic* — they work with any
/// type `T`, as long as `T` implements the right serde trait.
/// `DeserializeOwned` (vs plain `Deserialize`) means the result doesn't
/// borrow from the input bytes, so the input buffer can be dropped after
/// decoding.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses pretty-printed JSON (via `serde_json`).
///
/// The persisted files (`players.json`, `loginloc.json`) are meant to be
/// inspected — and occasionally repaired — by server operators with a
/// text editor, so we pay the extra bytes for indentation. Decoding
/// accepts any valid JSON, pretty or compact.
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use pingate_protocol::{Codec, JsonCodec, LoginAnchor};
///
/// let codec = JsonCodec;
///
/// let anchor = LoginAnchor {
///     world: "lobby".into(),
///     x: 0.0,
///     y: 70.0,
///     z: 0.0,
/// };
///
/// let bytes = codec.encode(&anchor).unwrap();
/// let decoded: LoginAnchor = codec.decode(&bytes).unwrap();
/// assert_eq!(anchor, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec_pretty(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

// =========================================================================
// Tests
// =========================================================================
