//! Unified error type for the Pingate facade.

use pingate_gate::GateError;
use pingate_store::StoreError;

/// Top-level error that wraps the crate-specific errors.
///
/// When using the `pingate` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
///
/// One contract worth spelling out: a [`PingateError::Store`] returned
/// from a mutating [`GateService`](crate::GateService) operation means
/// the in-memory mutation *succeeded* and only the flush to disk
/// failed. The state is kept (the next successful flush rewrites the
/// whole table), never rolled back.
#[derive(Debug, thiserror::Error)]
pub enum PingateError {
    /// A gate-level error (invalid PIN length, unknown identity,
    /// corrupt hash).
    #[error(transparent)]
    Gate(#[from] GateError),

    /// A storage-level error (I/O, unparseable file).
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_gate_error() {
        let err = GateError::InvalidLength { min: 4, max: 16 };
        let pingate_err: PingateError = err.into();
        assert!(matches!(pingate_err, PingateError::Gate(_)));
        assert!(pingate_err.to_string().contains("between 4 and 16"));
    }

    #[test]
    fn test_from_store_error() {
        let err = StoreError::Io(std::io::Error::other("disk gone"));
        let pingate_err: PingateError = err.into();
        assert!(matches!(pingate_err, PingateError::Store(_)));
        assert!(pingate_err.to_string().contains("disk gone"));
    }
}
