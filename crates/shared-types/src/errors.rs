//! # Error Types
//!
//! Errors raised while decoding or structurally validating shared types.

use shared_crypto::CryptoError;
use thiserror::Error;

/// Errors from the codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Value could not be encoded.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Bytes could not be decoded into the requested type.
    #[error("Decoding failed: {0}")]
    Decode(String),

    /// `Any` payload carries a different type tag than requested.
    #[error("Type URL mismatch: expected {expected}, got {actual}")]
    TypeUrlMismatch { expected: String, actual: String },
}

/// Stateless structural validation failures.
///
/// These never depend on chain state, so every node reaches the same verdict
/// for the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Transaction nonce is empty.
    #[error("Transaction nonce is empty")]
    EmptyNonce,

    /// Transaction carries no signature.
    #[error("Transaction is not signed")]
    MissingSignature,

    /// Public key is malformed.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(CryptoError),

    /// Signature is malformed or does not verify.
    #[error("Invalid signature: {0}")]
    InvalidSignature(CryptoError),

    /// Amount is empty or not a non-negative base-10 integer.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Relay chain identifier has the wrong shape.
    #[error("Invalid relay chain {chain:?}: expected {expected} characters")]
    InvalidRelayChain { chain: String, expected: usize },

    /// Service URL is malformed.
    #[error("Invalid service URL {url:?}: {reason}")]
    InvalidServiceUrl { url: String, reason: &'static str },

    /// Governance parameter key is empty.
    #[error("Parameter key is empty")]
    EmptyParamKey,

    /// Double-sign evidence is inconsistent.
    #[error("Invalid double-sign evidence: {0}")]
    InvalidEvidence(&'static str),

    /// Payload failed to decode.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
