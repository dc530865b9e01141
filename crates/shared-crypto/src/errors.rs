//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Public key bytes have the wrong length.
    #[error("Invalid public key length: expected {expected}, got {actual}")]
    InvalidPublicKeyLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Signature bytes have the wrong length.
    #[error("Invalid signature length: expected {expected}, got {actual}")]
    InvalidSignatureLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Public key is not a valid curve point.
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Signature does not verify against the message and key.
    #[error("Signature verification failed")]
    SignatureVerificationFailed,
}
