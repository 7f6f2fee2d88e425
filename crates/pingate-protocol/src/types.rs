//! Core contract types for the authentication gate.
//!
//! This module defines every value that crosses the boundary between the
//! gate and the host game server, plus the record shapes that are
//! persisted to disk. The persisted shapes must round-trip exactly —
//! including the *absence* of optional fields — because operators edit
//! these files by hand and a rewrite must not change their meaning.

use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A stable player identifier — the key for credential and session
/// records.
///
/// This is a "newtype wrapper" around `String` (the player's account
/// name). Why bother?
///
/// 1. **Type safety**: You can't accidentally pass a world name or a
///    command string where an identity is expected.
/// 2. **Readability**: `fn reset_pin(target: &Identity)` is clearer than
///    `fn reset_pin(target: &str)`.
///
/// `#[serde(transparent)]` tells serde to serialize this as just the
/// inner string, not as `{ "0": "steve" }`. So `Identity("steve")`
/// becomes just `"steve"` in JSON — which is exactly the key format in
/// the persisted credential table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub String);

impl Identity {
    /// Creates an identity from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The underlying account name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identity {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

// ---------------------------------------------------------------------------
// Persisted records
// ---------------------------------------------------------------------------

/// The trusted-IP half of a credential record: where the player last
/// authenticated successfully, and when.
///
/// Reconnecting from `addr` within the trust window skips PIN entry.
/// Matching is exact equality on the raw address — no subnets, no
/// device fingerprinting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedIp {
    /// The source address of the last successful login.
    pub addr: IpAddr,

    /// When that login happened, in unix seconds.
    pub refreshed_at: u64,
}

/// One player's persisted credential.
///
/// A record exists only for players who have set a PIN; absence means
/// unregistered. The plaintext PIN is never stored — only a salted
/// Argon2id hash in PHC string format (the salt is embedded in the
/// string).
///
/// `skip_serializing_if` + `default` on `trusted_ip` means a record
/// without trust data serializes *without* the field at all, and a file
/// without the field parses back to `None`. That's the exact-round-trip
/// guarantee for the absence case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Argon2id hash of the PIN (PHC string, e.g. `$argon2id$v=19$...`).
    pub pin_hash: String,

    /// Last successful authentication origin, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted_ip: Option<TrustedIp>,
}

/// The full persisted credential table: identity → credential.
///
/// This is what `players.json` holds. `#[serde(transparent)]` on
/// [`Identity`] makes the keys plain strings in the file.
pub type CredentialTable = HashMap<Identity, CredentialRecord>;

/// The optional login anchor: a world coordinate frozen players are
/// relocated to on join.
///
/// Process-wide singleton, set by an admin action, persisted across
/// restarts, absent by default. Field names match the on-disk layout
/// (`world`, `x`, `y`, `z`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginAnchor {
    /// Name of the world the anchor lives in.
    pub world: String,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

// ---------------------------------------------------------------------------
// Decisions and outcomes
// ---------------------------------------------------------------------------

/// The gate's answer to a player joining.
///
/// The host enforces whichever variant comes back; the gate itself never
/// teleports, freezes, or messages anyone.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinDecision {
    /// No credential on file. The host should prompt the player to
    /// register; their session is neither frozen nor authenticated.
    Unregistered,

    /// The player's source address matches a trusted-IP record that is
    /// still inside the trust window. Session is authenticated, no PIN
    /// required.
    AutoAuthenticated,

    /// PIN entry required. The session is frozen; the host should
    /// relocate the player to `anchor` (if one is set) and expect a
    /// deferred timeout check to follow.
    MustAuthenticate {
        /// Where to relocate the frozen player, if an anchor is set.
        anchor: Option<LoginAnchor>,
    },
}

/// The gate's answer to a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The player never registered a PIN. User-correctable: tell them
    /// to register first.
    NoCredential,

    /// Too many failed attempts this session. Terminal — the host must
    /// force-disconnect the player; the counter only resets on
    /// reconnect.
    RateLimited,

    /// PIN verified. Session is now authenticated (unfrozen), the
    /// attempt counter is reset, and the trusted-IP record was
    /// refreshed to the session's source address.
    Success,

    /// Wrong PIN. The session stays frozen.
    Incorrect {
        /// How many attempts are left before [`LoginOutcome::RateLimited`].
        remaining: u8,
    },
}

/// Why the gate is asking the host to disconnect a player.
///
/// `Display` gives the player-facing kick message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The deferred deadline passed without authentication.
    AuthTimeout,
    /// The session burned through its login attempts.
    TooManyAttempts,
    /// An admin reset the player's PIN, invalidating the session.
    PinReset,
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthTimeout => write!(f, "Authentication timeout!"),
            Self::TooManyAttempts => {
                write!(f, "Too many failed login attempts!")
            }
            Self::PinReset => {
                write!(f, "Your PIN has been reset by an administrator!")
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Tests for contract types and their JSON serialization.
    //!
    //! The persisted files have exact shapes that must survive a
    //! save/load cycle byte-meaning-for-byte-meaning, so most of these
    //! tests pin down the JSON representation rather than behavior.

    use super::*;

    fn sample_ip() -> IpAddr {
        "203.0.113.7".parse().unwrap()
    }

    // =====================================================================
    // Identity
    // =====================================================================

    #[test]
    fn test_identity_serializes_as_plain_string() {
        // `#[serde(transparent)]` means Identity("steve") → `"steve"`,
        // not `{"0":"steve"}`. This matters because identities are the
        // keys of the credential table file.
        let json = serde_json::to_string(&Identity::new("steve")).unwrap();
        assert_eq!(json, "\"steve\"");
    }

    #[test]
    fn test_identity_deserializes_from_plain_string() {
        let id: Identity = serde_json::from_str("\"alex\"").unwrap();
        assert_eq!(id, Identity::new("alex"));
    }

    #[test]
    fn test_identity_display_is_the_name() {
        assert_eq!(Identity::new("steve").to_string(), "steve");
    }

    // =====================================================================
    // CredentialRecord / TrustedIp
    // =====================================================================

    #[test]
    fn test_credential_record_without_trust_omits_field() {
        // The absence case: no `trusted_ip` key at all, not `null`.
        let record = CredentialRecord {
            pin_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".into(),
            trusted_ip: None,
        };
        let json: serde_json::Value =
            serde_json::to_value(&record).unwrap();

        assert!(json.get("trusted_ip").is_none());
        assert_eq!(
            json["pin_hash"],
            "$argon2id$v=19$m=19456,t=2,p=1$abc$def"
        );
    }

    #[test]
    fn test_credential_record_without_trust_round_trip() {
        let record = CredentialRecord {
            pin_hash: "$argon2id$hash".into(),
            trusted_ip: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        let decoded: CredentialRecord =
            serde_json::from_str(&json).unwrap();
        assert_eq!(record, decoded);
    }

    #[test]
    fn test_credential_record_with_trust_round_trip() {
        let record = CredentialRecord {
            pin_hash: "$argon2id$hash".into(),
            trusted_ip: Some(TrustedIp {
                addr: sample_ip(),
                refreshed_at: 1_700_000_000,
            }),
        };
        let json = serde_json::to_string(&record).unwrap();
        let decoded: CredentialRecord =
            serde_json::from_str(&json).unwrap();
        assert_eq!(record, decoded);
    }

    #[test]
    fn test_credential_record_missing_trust_parses_as_none() {
        // A hand-written file with only the hash must still parse.
        let json = r#"{ "pin_hash": "$argon2id$hash" }"#;
        let record: CredentialRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.trusted_ip, None);
    }

    #[test]
    fn test_trusted_ip_addr_serializes_as_string() {
        let trust = TrustedIp {
            addr: sample_ip(),
            refreshed_at: 42,
        };
        let json: serde_json::Value = serde_json::to_value(&trust).unwrap();
        assert_eq!(json["addr"], "203.0.113.7");
        assert_eq!(json["refreshed_at"], 42);
    }

    // =====================================================================
    // CredentialTable
    // =====================================================================

    #[test]
    fn test_credential_table_keys_are_plain_names() {
        let mut table = CredentialTable::new();
        table.insert(
            Identity::new("steve"),
            CredentialRecord {
                pin_hash: "$argon2id$hash".into(),
                trusted_ip: None,
            },
        );
        let json: serde_json::Value = serde_json::to_value(&table).unwrap();
        assert!(json["steve"].is_object());
    }

    #[test]
    fn test_credential_table_round_trip() {
        let mut table = CredentialTable::new();
        table.insert(
            Identity::new("steve"),
            CredentialRecord {
                pin_hash: "$argon2id$a".into(),
                trusted_ip: Some(TrustedIp {
                    addr: sample_ip(),
                    refreshed_at: 1,
                }),
            },
        );
        table.insert(
            Identity::new("alex"),
            CredentialRecord {
                pin_hash: "$argon2id$b".into(),
                trusted_ip: None,
            },
        );

        let json = serde_json::to_string(&table).unwrap();
        let decoded: CredentialTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, decoded);
    }

    #[test]
    fn test_empty_credential_table_round_trip() {
        let table = CredentialTable::new();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, "{}");
        let decoded: CredentialTable = serde_json::from_str(&json).unwrap();
        assert!(decoded.is_empty());
    }

    // =====================================================================
    // LoginAnchor
    // =====================================================================

    #[test]
    fn test_login_anchor_json_format() {
        // Field names match the on-disk layout.
        let anchor = LoginAnchor {
            world: "lobby".into(),
            x: 128.5,
            y: 64.0,
            z: -32.25,
        };
        let json: serde_json::Value = serde_json::to_value(&anchor).unwrap();
        assert_eq!(json["world"], "lobby");
        assert_eq!(json["x"], 128.5);
        assert_eq!(json["y"], 64.0);
        assert_eq!(json["z"], -32.25);
    }

    #[test]
    fn test_login_anchor_round_trip() {
        let anchor = LoginAnchor {
            world: "spawn".into(),
            x: 0.0,
            y: 70.0,
            z: 0.0,
        };
        let json = serde_json::to_string(&anchor).unwrap();
        let decoded: LoginAnchor = serde_json::from_str(&json).unwrap();
        assert_eq!(anchor, decoded);
    }

    // =====================================================================
    // DisconnectReason
    // =====================================================================

    #[test]
    fn test_disconnect_reason_messages() {
        assert_eq!(
            DisconnectReason::AuthTimeout.to_string(),
            "Authentication timeout!"
        );
        assert_eq!(
            DisconnectReason::TooManyAttempts.to_string(),
            "Too many failed login attempts!"
        );
        assert_eq!(
            DisconnectReason::PinReset.to_string(),
            "Your PIN has been reset by an administrator!"
        );
    }
}
