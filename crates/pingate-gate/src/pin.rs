//! PIN hashing with Argon2id.
//!
//! PINs are short and low-entropy, so the hash has to do the heavy
//! lifting: Argon2id with a per-PIN random salt, stored as a PHC string
//! (`$argon2id$v=19$...` — algorithm, parameters, salt, and digest in
//! one self-describing value). Verification goes through the
//! `password_hash` API, which compares in constant time — never raw
//! equality on digests.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Argon2,
};

use crate::GateError;

/// Hashes a raw PIN with a freshly generated salt.
///
/// Every call produces a different string, even for the same PIN —
/// the salt is random. Equality of hashes therefore means nothing;
/// only [`verify`] can check a PIN against a stored hash.
///
/// # Errors
/// Returns [`GateError::Hash`] if Argon2 rejects the input (should not
/// happen for any realistic PIN length).
pub fn hash(raw_pin: &str) -> Result<String, GateError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(raw_pin.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| GateError::Hash(e.to_string()))
}

/// Verifies a raw PIN against a stored PHC hash string.
///
/// Returns `Ok(true)` on a match, `Ok(false)` on a wrong PIN.
///
/// # Errors
/// Returns [`GateError::Hash`] if the *stored* string doesn't parse as
/// a PHC hash — which means the credential file is corrupt, not that
/// the player typed the wrong PIN.
pub fn verify(raw_pin: &str, stored_hash: &str) -> Result<bool, GateError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| GateError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(raw_pin.as_bytes(), &parsed)
        .is_ok())
}
